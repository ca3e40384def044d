use std::fmt::Display;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

use super::UrlEncodable;

/// Represents a SHA-1 hash as an array of 20 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sha1Hash(pub [u8; 20]);

impl UrlEncodable for Sha1Hash {
    fn as_url_encoded(&self) -> String {
        self.0.as_url_encoded()
    }
}

impl Display for Sha1Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Sha1Hash {
    pub fn new(hash: &[u8; 20]) -> Sha1Hash {
        Sha1Hash(*hash)
    }

    pub fn from_hex(hex: &str) -> Result<Sha1Hash> {
        let bytes = hex::decode(hex)?;
        let bytes: [u8; 20] = bytes
            .try_into()
            .map_err(|_| anyhow!("invalid sha1 hash length"))?;

        Ok(Sha1Hash(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

/// Hashes an arbitrary byte slice down to a [`Sha1Hash`].
pub fn sha1_hash(value: &[u8]) -> Sha1Hash {
    let mut hasher = Sha1::new();
    hasher.update(value);

    Sha1Hash(hasher.finalize().into())
}
