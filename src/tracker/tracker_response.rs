use byteorder::{BigEndian, ByteOrder};

use crate::bencode::{self, BencodedValue};
use crate::utils::Sha1Hash;
use crate::COMPACT_PEER_LEN;

use super::TrackerError;

/// One peer as reported by the tracker. The compact format carries no
/// peer id, so it stays optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Peer {
    pub peer_id: Option<String>,
    pub ip: String,
    pub port: u16,
}

/// Decoded tracker reply.
///
/// When `failure` is set the tracker rejected the request and no other
/// field means anything; everything else keeps its default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackerResponse {
    pub failure: Option<String>,
    pub warning: Option<String>,
    pub tracker_id: Option<String>,
    pub interval: u32,
    pub min_interval: u32,
    pub complete: u64,
    pub incomplete: u64,
    pub downloaded: u64,
    pub peers: Vec<Peer>,
}

impl TrackerResponse {
    /// Decodes the body of an announce reply.
    pub fn from_announce_bytes(body: &[u8]) -> Result<TrackerResponse, TrackerError> {
        let root = bencode::decode(body)?;
        if root.try_into_dict().is_none() {
            return Err(TrackerError::InvalidResponse);
        }

        if let Some(failure) = root.get_string_from_dict(b"failure reason") {
            return Ok(TrackerResponse {
                failure: Some(failure),
                ..TrackerResponse::default()
            });
        }

        let interval = required_integer(&root, b"interval")?;
        let interval = u32::try_from(interval).map_err(|_| TrackerError::InvalidResponse)?;

        let complete = required_integer(&root, b"complete")?;
        let complete = u64::try_from(complete).map_err(|_| TrackerError::InvalidResponse)?;

        let incomplete = required_integer(&root, b"incomplete")?;
        let incomplete = u64::try_from(incomplete).map_err(|_| TrackerError::InvalidResponse)?;

        let min_interval = root
            .get_from_dict(b"min interval")
            .and_then(BencodedValue::try_into_integer)
            .and_then(|value| u32::try_from(value).ok())
            .unwrap_or(0);

        let downloaded = root
            .get_from_dict(b"downloaded")
            .and_then(BencodedValue::try_into_integer)
            .and_then(|value| u64::try_from(value).ok())
            .unwrap_or(0);

        let peers = match root.get_from_dict(b"peers") {
            Some(BencodedValue::ByteString(compact)) => parse_compact_peers(compact)?,
            Some(BencodedValue::List(list)) => parse_peer_dicts(list)?,
            _ => return Err(TrackerError::InvalidResponse),
        };

        Ok(TrackerResponse {
            failure: None,
            warning: root.get_string_from_dict(b"warning reason"),
            tracker_id: root.get_string_from_dict(b"tracker id"),
            interval,
            min_interval,
            complete,
            incomplete,
            downloaded,
            peers,
        })
    }

    /// Decodes the body of a scrape reply, reading the swarm counters of
    /// the one torrent addressed by `info_hash` from the `files` map.
    pub fn from_scrape_bytes(
        body: &[u8],
        info_hash: &Sha1Hash,
    ) -> Result<TrackerResponse, TrackerError> {
        let root = bencode::decode(body)?;
        if root.try_into_dict().is_none() {
            return Err(TrackerError::InvalidResponse);
        }

        if let Some(failure) = root.get_string_from_dict(b"failure reason") {
            return Ok(TrackerResponse {
                failure: Some(failure),
                ..TrackerResponse::default()
            });
        }

        let stats = root
            .get_from_dict(b"files")
            .and_then(|files| files.get_from_dict(info_hash.as_bytes()))
            .ok_or(TrackerError::InvalidResponse)?;

        let counter = |key: &[u8]| {
            stats
                .get_from_dict(key)
                .and_then(BencodedValue::try_into_integer)
                .and_then(|value| u64::try_from(value).ok())
                .unwrap_or(0)
        };

        Ok(TrackerResponse {
            complete: counter(b"complete"),
            incomplete: counter(b"incomplete"),
            downloaded: counter(b"downloaded"),
            ..TrackerResponse::default()
        })
    }
}

fn required_integer(root: &BencodedValue, key: &[u8]) -> Result<i64, TrackerError> {
    root.get_from_dict(key)
        .and_then(BencodedValue::try_into_integer)
        .ok_or(TrackerError::InvalidResponse)
}

/// Splits a compact peer string into 6 byte records: 4 octets of IPv4
/// followed by a big-endian port, both in network order per BEP-23.
fn parse_compact_peers(compact: &[u8]) -> Result<Vec<Peer>, TrackerError> {
    if compact.len() % COMPACT_PEER_LEN != 0 {
        return Err(TrackerError::InvalidResponse);
    }

    Ok(compact
        .chunks_exact(COMPACT_PEER_LEN)
        .map(|chunk| Peer {
            peer_id: None,
            ip: format!("{}.{}.{}.{}", chunk[0], chunk[1], chunk[2], chunk[3]),
            port: BigEndian::read_u16(&chunk[4..]),
        })
        .collect())
}

fn parse_peer_dicts(list: &[BencodedValue]) -> Result<Vec<Peer>, TrackerError> {
    list.iter()
        .map(|entry| {
            let peer_id = entry
                .get_string_from_dict(b"peer id")
                .ok_or(TrackerError::InvalidResponse)?;
            let ip = entry
                .get_string_from_dict(b"ip")
                .ok_or(TrackerError::InvalidResponse)?;
            let port = entry
                .get_from_dict(b"port")
                .and_then(BencodedValue::try_into_integer)
                .and_then(|value| u16::try_from(value).ok())
                .ok_or(TrackerError::InvalidResponse)?;

            Ok(Peer {
                peer_id: Some(peer_id),
                ip,
                port,
            })
        })
        .collect()
}
