use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::utils::Sha1Hash;

/// Layout of the payload described by the info dictionary. A torrent is
/// either one file or a directory of files, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileMode {
    Single { length: u64 },
    Multi { files: Vec<FileInfo> },
}

/// One entry of a multi-file torrent; `path` is relative to the torrent
/// name directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub length: u64,
    pub path: String,
}

/// A fully validated torrent file.
///
/// Built once by [`TorrentParser`](super::TorrentParser) and never mutated
/// afterwards. `info_hash` is the SHA-1 digest of the canonical bencoding
/// of the info dictionary and uniquely identifies the torrent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TorrentFile {
    pub announce: String,
    pub announce_list: Option<Vec<String>>,
    pub name: String,
    pub piece_length: u64,
    pub pieces: Vec<Sha1Hash>,
    pub info_hash: Sha1Hash,
    pub private: bool,
    pub mode: FileMode,
    pub comment: Option<String>,
    pub created_by: Option<String>,
    pub encoding: Option<String>,
    pub creation_date: Option<NaiveDate>,
}

impl TorrentFile {
    /// Total payload size in bytes across both file modes.
    pub fn total_length(&self) -> u64 {
        match &self.mode {
            FileMode::Single { length } => *length,
            FileMode::Multi { files } => files.iter().map(|file| file.length).sum(),
        }
    }

    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    pub fn piece_hash(&self, index: usize) -> Option<&Sha1Hash> {
        self.pieces.get(index)
    }
}
