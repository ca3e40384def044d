pub mod torrent_file;
pub use torrent_file::{FileInfo, FileMode, TorrentFile};

pub mod torrent_parser;
pub use torrent_parser::TorrentParser;

pub mod error;
pub use error::TorrentError;
