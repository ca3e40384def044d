use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, NaiveDate};

use crate::bencode::{self, BencodedValue};
use crate::utils::{sha1_hash, Sha1Hash};
use crate::PIECE_HASH_LEN;

use super::{FileInfo, FileMode, TorrentError, TorrentFile};

type Dict = BTreeMap<Vec<u8>, BencodedValue>;

/// Validates raw torrent bytes and extracts a [`TorrentFile`].
///
/// Validation is fail-fast: the first violated precondition is returned
/// and later fields are not inspected. Optional metadata fields are the
/// exception; a mistyped `comment` or `creation date` degrades to `None`
/// instead of failing the parse.
pub struct TorrentParser;

impl TorrentParser {
    /// Reads and parses a `.torrent` file from disk.
    ///
    /// A single trailing newline is stripped before decoding; some tools
    /// append one when saving the file. The strip is logged because it
    /// would eat a real content byte in a truncated file.
    pub fn parse_file(path: impl AsRef<Path>) -> Result<TorrentFile, TorrentError> {
        let path = path.as_ref();
        let mut content = std::fs::read(path)?;

        if content.last() == Some(&b'\n') {
            tracing::warn!(
                "stripping a trailing newline byte from {}",
                path.display()
            );
            content.pop();
        }

        Self::parse(&content)
    }

    /// Validates and extracts torrent metadata from raw bencoded bytes.
    pub fn parse(bytes: &[u8]) -> Result<TorrentFile, TorrentError> {
        let root = bencode::decode(bytes)?;
        let root = root.try_into_dict().ok_or(TorrentError::RootNotDict)?;

        let announce = parse_announce(root)?;
        let info = parse_info(root)?;

        let name = parse_name(info)?;
        let piece_length = parse_piece_length(info)?;
        let pieces = parse_pieces(info)?;
        let mode = parse_file_mode(info)?;

        let private = info
            .get(b"private".as_slice())
            .and_then(BencodedValue::try_into_integer)
            .map_or(false, |flag| flag != 0);

        let announce_list = parse_announce_list(root);
        let comment = string_field(root, b"comment");
        let created_by = string_field(root, b"created by");
        let encoding = string_field(root, b"encoding");
        let creation_date = parse_creation_date(root);

        // hash the canonical re-encoding of the info dictionary; the
        // decoder's sorted storage keeps this byte-identical to canonical
        // input
        let info_value = BencodedValue::Dict(info.clone());
        let info_hash = sha1_hash(&bencode::encode(&info_value));

        tracing::debug!(
            "parsed torrent '{}' with {} pieces, info hash {}",
            name,
            pieces.len(),
            info_hash
        );

        Ok(TorrentFile {
            announce,
            announce_list,
            name,
            piece_length,
            pieces,
            info_hash,
            private,
            mode,
            comment,
            created_by,
            encoding,
            creation_date,
        })
    }
}

fn parse_announce(root: &Dict) -> Result<String, TorrentError> {
    let announce = root
        .get(b"announce".as_slice())
        .ok_or(TorrentError::MissingAnnounceKey)?;

    announce
        .try_into_byte_string()
        .and_then(|bytes| String::from_utf8(bytes.clone()).ok())
        .ok_or(TorrentError::AnnounceNotString)
}

fn parse_info(root: &Dict) -> Result<&Dict, TorrentError> {
    let info = root
        .get(b"info".as_slice())
        .ok_or(TorrentError::MissingInfoKey)?;

    info.try_into_dict().ok_or(TorrentError::InfoNotDict)
}

fn parse_name(info: &Dict) -> Result<String, TorrentError> {
    let name = info
        .get(b"name".as_slice())
        .ok_or(TorrentError::MissingNameField)?;

    name.try_into_byte_string()
        .and_then(|bytes| String::from_utf8(bytes.clone()).ok())
        .ok_or(TorrentError::NameNotString)
}

fn parse_piece_length(info: &Dict) -> Result<u64, TorrentError> {
    let piece_length = info
        .get(b"piece length".as_slice())
        .ok_or(TorrentError::MissingPieceLengthField)?
        .try_into_integer()
        .ok_or(TorrentError::PieceLengthNotInt)?;

    if piece_length < 0 {
        return Err(TorrentError::PieceLengthNegative);
    }
    if piece_length == 0 {
        return Err(TorrentError::PieceLengthZero);
    }

    Ok(piece_length as u64)
}

fn parse_pieces(info: &Dict) -> Result<Vec<Sha1Hash>, TorrentError> {
    let pieces = info
        .get(b"pieces".as_slice())
        .ok_or(TorrentError::MissingPiecesField)?
        .try_into_byte_string()
        .ok_or(TorrentError::PiecesNotString)?;

    if pieces.len() % PIECE_HASH_LEN != 0 {
        return Err(TorrentError::PiecesLengthNotDivisible);
    }

    Ok(pieces
        .chunks_exact(PIECE_HASH_LEN)
        .map(|chunk| {
            let mut hash = [0u8; PIECE_HASH_LEN];
            hash.copy_from_slice(chunk);
            Sha1Hash(hash)
        })
        .collect())
}

fn parse_file_mode(info: &Dict) -> Result<FileMode, TorrentError> {
    let length = info.get(b"length".as_slice());
    let files = info.get(b"files".as_slice());

    match (length, files) {
        (None, None) => Err(TorrentError::BothFileModesMissing),
        (Some(_), Some(_)) => Err(TorrentError::BothFileModesPresent),
        (Some(length), None) => parse_single_mode(length),
        (None, Some(files)) => parse_multi_mode(files),
    }
}

fn parse_single_mode(length: &BencodedValue) -> Result<FileMode, TorrentError> {
    let length = length
        .try_into_integer()
        .ok_or(TorrentError::LengthNotInt)?;

    if length < 0 {
        return Err(TorrentError::SingleLengthNegative);
    }
    if length == 0 {
        return Err(TorrentError::SingleLengthZero);
    }

    Ok(FileMode::Single {
        length: length as u64,
    })
}

fn parse_multi_mode(files: &BencodedValue) -> Result<FileMode, TorrentError> {
    let files = files.try_into_list().ok_or(TorrentError::FilesNotList)?;
    if files.is_empty() {
        return Err(TorrentError::EmptyFilesList);
    }

    let files = files
        .iter()
        .map(|file| {
            let file = file.try_into_dict().ok_or(TorrentError::FileItemNotDict)?;
            parse_file_entry(file)
        })
        .collect::<Result<Vec<FileInfo>, TorrentError>>()?;

    Ok(FileMode::Multi { files })
}

fn parse_file_entry(file: &Dict) -> Result<FileInfo, TorrentError> {
    let length = file
        .get(b"length".as_slice())
        .ok_or(TorrentError::MissingFileLength)?
        .try_into_integer()
        .ok_or(TorrentError::FileLengthNotInt)?;

    if length < 0 {
        return Err(TorrentError::MultiLengthNegative);
    }
    if length == 0 {
        return Err(TorrentError::MultiLengthZero);
    }

    let fragments = file
        .get(b"path".as_slice())
        .ok_or(TorrentError::MissingFilePath)?
        .try_into_list()
        .ok_or(TorrentError::FilePathNotList)?;

    let fragments = fragments
        .iter()
        .map(|fragment| {
            fragment
                .try_into_byte_string()
                .and_then(|bytes| String::from_utf8(bytes.clone()).ok())
                .ok_or(TorrentError::FilePathFragmentNotString)
        })
        .collect::<Result<Vec<String>, TorrentError>>()?;

    Ok(FileInfo {
        length: length as u64,
        path: fragments.join("/"),
    })
}

fn string_field(root: &Dict, key: &[u8]) -> Option<String> {
    root.get(key)
        .and_then(BencodedValue::try_into_byte_string)
        .and_then(|bytes| String::from_utf8(bytes.clone()).ok())
}

fn parse_creation_date(root: &Dict) -> Option<NaiveDate> {
    let seconds = root
        .get(b"creation date".as_slice())?
        .try_into_integer()?;

    DateTime::from_timestamp(seconds, 0).map(|timestamp| timestamp.date_naive())
}

/// Flattens the list-of-lists `announce-list` into one ordered sequence.
/// Any shape violation drops the whole field instead of failing the parse.
fn parse_announce_list(root: &Dict) -> Option<Vec<String>> {
    let tiers = root
        .get(b"announce-list".as_slice())?
        .try_into_list()?;

    let mut trackers = Vec::new();
    for tier in tiers {
        for tracker in tier.try_into_list()? {
            let bytes = tracker.try_into_byte_string()?;
            trackers.push(String::from_utf8(bytes.clone()).ok()?);
        }
    }

    Some(trackers)
}
