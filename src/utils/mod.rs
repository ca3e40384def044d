use anyhow::Result;
use percent_encoding::{percent_encode, AsciiSet, NON_ALPHANUMERIC};

pub mod sha1hash;
pub use sha1hash::{sha1_hash, Sha1Hash};

/// Everything except the RFC 3986 unreserved characters gets escaped.
pub const URL_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub trait UrlEncodable {
    fn as_url_encoded(&self) -> String;
}

impl UrlEncodable for [u8; 20] {
    fn as_url_encoded(&self) -> String {
        percent_encode(self, URL_ENCODE_SET).to_string()
    }
}

impl UrlEncodable for str {
    fn as_url_encoded(&self) -> String {
        percent_encode(self.as_bytes(), URL_ENCODE_SET).to_string()
    }
}

/// Builds a 20 byte peer id from a client prefix padded with random digits.
pub fn create_peer_id(prefix: &str) -> Result<[u8; 20]> {
    let mut peer_id = [0u8; 20];

    let prefix = prefix.as_bytes();
    let prefix_len = prefix.len().min(peer_id.len());
    peer_id[..prefix_len].copy_from_slice(&prefix[..prefix_len]);

    let mut random = [0u8; 20];
    getrandom::getrandom(&mut random)?;

    for (slot, value) in peer_id[prefix_len..].iter_mut().zip(random) {
        *slot = b'0' + value % 10;
    }

    Ok(peer_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_encode_set_keeps_unreserved() {
        assert_eq!("aZ1.-_~", "aZ1.-_~".as_url_encoded());
    }

    #[test]
    fn test_url_encode_set_escapes_the_rest() {
        assert_eq!("a%20b%2Fc", "a b/c".as_url_encoded());
    }

    #[test]
    fn test_create_peer_id_keeps_prefix() {
        let peer_id = create_peer_id("-BM0100-").unwrap();

        assert_eq!(&peer_id[..8], b"-BM0100-");
        assert!(peer_id[8..].iter().all(|b| b.is_ascii_digit()));
    }

    #[test]
    fn test_create_peer_id_truncates_long_prefix() {
        let peer_id = create_peer_id("an unreasonably long client prefix").unwrap();

        assert_eq!(&peer_id[..], &"an unreasonably long".as_bytes()[..20]);
    }
}
