pub mod bencode;
pub mod torrent;
pub mod tracker;
pub mod utils;

pub const TRACING_LEVEL: tracing::Level = tracing::Level::INFO;

/// Nesting ceiling for a single bencode decode call. Input nested deeper
/// than this is rejected before the decoder recurses any further.
pub const MAX_BENCODE_DEPTH: usize = 256;

pub const PIECE_HASH_LEN: usize = 20;
pub const COMPACT_PEER_LEN: usize = 6;

pub const LISTENING_PORT: u16 = 6881;
pub const DEFAULT_NUMWANT: u32 = 50;
