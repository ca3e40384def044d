use thiserror::Error;

use crate::bencode::BencodeError;

use super::TransportError;

/// Everything that can go wrong while talking to a tracker.
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("the announce url scheme is not http")]
    InvalidScheme,

    #[error("the announce url has no /announce segment to rewrite for scraping")]
    ScrapeNotSupported,

    #[error("the tracker response is invalid")]
    InvalidResponse,

    #[error(transparent)]
    Bencode(#[from] BencodeError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
