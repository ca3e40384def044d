use crate::utils::{Sha1Hash, UrlEncodable};
use crate::{DEFAULT_NUMWANT, LISTENING_PORT};

use super::{TrackerError, TrackerEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Announce,
    Scrape,
}

/// One announce or scrape call, fully described.
///
/// Built once through [`TrackerRequestBuilder`] and never mutated
/// afterwards; no partially built request can reach the wire.
#[derive(Debug, Clone)]
pub struct TrackerRequest {
    announce: String,
    kind: RequestKind,
    info_hash: Sha1Hash,
    peer_id: [u8; 20],
    port: u16,
    uploaded: u64,
    downloaded: u64,
    left: u64,
    compact: bool,
    no_peer_id: bool,
    event: TrackerEvent,
    numwant: u32,
    ip: Option<String>,
    key: Option<u32>,
    tracker_id: Option<String>,
}

impl TrackerRequest {
    pub fn builder(
        announce: impl Into<String>,
        info_hash: Sha1Hash,
        peer_id: [u8; 20],
    ) -> TrackerRequestBuilder {
        TrackerRequestBuilder {
            announce: announce.into(),
            kind: RequestKind::Announce,
            info_hash,
            peer_id,
            port: LISTENING_PORT,
            uploaded: 0,
            downloaded: 0,
            left: 0,
            compact: true,
            no_peer_id: false,
            event: TrackerEvent::None,
            numwant: DEFAULT_NUMWANT,
            ip: None,
            key: None,
            tracker_id: None,
        }
    }

    pub fn announce(&self) -> &str {
        &self.announce
    }

    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    pub fn info_hash(&self) -> &Sha1Hash {
        &self.info_hash
    }

    pub fn tracker_id(&self) -> Option<&str> {
        self.tracker_id.as_deref()
    }

    /// Copy of this request carrying the given tracker id. Used by the
    /// manager to echo an id a tracker handed out earlier.
    pub fn with_tracker_id(&self, tracker_id: String) -> TrackerRequest {
        TrackerRequest {
            tracker_id: Some(tracker_id),
            ..self.clone()
        }
    }

    /// Renders the full request URL, query string included.
    pub fn as_url(&self) -> Result<String, TrackerError> {
        match self.kind {
            RequestKind::Announce => self.announce_url(),
            RequestKind::Scrape => self.scrape_url(),
        }
    }

    fn announce_url(&self) -> Result<String, TrackerError> {
        let mut url = format! {
            "{announce}?info_hash={info_hash}\
            &peer_id={peer_id}\
            &port={port}\
            &uploaded={uploaded}\
            &downloaded={downloaded}\
            &left={left}\
            &compact={compact}\
            &no_peer_id={no_peer_id}\
            &event={event}\
            &numwant={numwant}",
            announce = self.announce,
            info_hash = self.info_hash.as_url_encoded(),
            peer_id = self.peer_id.as_url_encoded(),
            port = self.port,
            uploaded = self.uploaded,
            downloaded = self.downloaded,
            left = self.left,
            compact = self.compact as u8,
            no_peer_id = self.no_peer_id as u8,
            event = self.event.as_str(),
            numwant = self.numwant,
        };

        if let Some(ip) = &self.ip {
            url.push_str(&format!("&ip={}", ip.as_url_encoded()));
        }

        if let Some(key) = self.key {
            url.push_str(&format!("&key={}", key));
        }

        if let Some(tracker_id) = &self.tracker_id {
            url.push_str(&format!("&trackerid={}", tracker_id.as_url_encoded()));
        }

        Ok(url)
    }

    /// A scrape hits the same URL as the announce with the final
    /// `/announce` path segment rewritten to `/scrape`; only the info
    /// hash travels along.
    fn scrape_url(&self) -> Result<String, TrackerError> {
        let position = self
            .announce
            .rfind("/announce")
            .ok_or(TrackerError::ScrapeNotSupported)?;

        let (prefix, suffix) = self.announce.split_at(position);
        let suffix = &suffix["/announce".len()..];

        Ok(format!(
            "{}/scrape{}?info_hash={}",
            prefix,
            suffix,
            self.info_hash.as_url_encoded()
        ))
    }
}

/// Plain builder; [`build`](TrackerRequestBuilder::build) hands out the
/// immutable request.
#[derive(Debug)]
pub struct TrackerRequestBuilder {
    announce: String,
    kind: RequestKind,
    info_hash: Sha1Hash,
    peer_id: [u8; 20],
    port: u16,
    uploaded: u64,
    downloaded: u64,
    left: u64,
    compact: bool,
    no_peer_id: bool,
    event: TrackerEvent,
    numwant: u32,
    ip: Option<String>,
    key: Option<u32>,
    tracker_id: Option<String>,
}

impl TrackerRequestBuilder {
    pub fn kind(mut self, kind: RequestKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn uploaded(mut self, uploaded: u64) -> Self {
        self.uploaded = uploaded;
        self
    }

    pub fn downloaded(mut self, downloaded: u64) -> Self {
        self.downloaded = downloaded;
        self
    }

    pub fn left(mut self, left: u64) -> Self {
        self.left = left;
        self
    }

    pub fn compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    pub fn no_peer_id(mut self, no_peer_id: bool) -> Self {
        self.no_peer_id = no_peer_id;
        self
    }

    pub fn event(mut self, event: TrackerEvent) -> Self {
        self.event = event;
        self
    }

    pub fn numwant(mut self, numwant: u32) -> Self {
        self.numwant = numwant;
        self
    }

    pub fn ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    pub fn key(mut self, key: u32) -> Self {
        self.key = Some(key);
        self
    }

    pub fn tracker_id(mut self, tracker_id: impl Into<String>) -> Self {
        self.tracker_id = Some(tracker_id.into());
        self
    }

    pub fn build(self) -> TrackerRequest {
        TrackerRequest {
            announce: self.announce,
            kind: self.kind,
            info_hash: self.info_hash,
            peer_id: self.peer_id,
            port: self.port,
            uploaded: self.uploaded,
            downloaded: self.downloaded,
            left: self.left,
            compact: self.compact,
            no_peer_id: self.no_peer_id,
            event: self.event,
            numwant: self.numwant,
            ip: self.ip,
            key: self.key,
            tracker_id: self.tracker_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_info_hash() -> Sha1Hash {
        Sha1Hash::new(&[
            0x12, 0x34, 0x56, 0x78, 0x9a, 0xbc, 0xde, 0xf1, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd,
            0xef, 0x12, 0x34, 0x56, 0x78, 0x9a,
        ])
    }

    #[test]
    fn test_announce_url_layout() {
        let request = TrackerRequest::builder(
            "http://tracker.example.com/announce",
            sample_info_hash(),
            *b"-BM0100-123456789012",
        )
        .uploaded(10)
        .downloaded(20)
        .left(30)
        .event(TrackerEvent::Started)
        .build();

        let url = request.as_url().unwrap();

        assert_eq!(
            "http://tracker.example.com/announce\
            ?info_hash=%124Vx%9A%BC%DE%F1%23Eg%89%AB%CD%EF%124Vx%9A\
            &peer_id=-BM0100-123456789012\
            &port=6881\
            &uploaded=10\
            &downloaded=20\
            &left=30\
            &compact=1\
            &no_peer_id=0\
            &event=started\
            &numwant=50",
            url
        );
    }

    #[test]
    fn test_announce_url_optional_params() {
        let request = TrackerRequest::builder(
            "http://tracker.example.com/announce",
            sample_info_hash(),
            *b"-BM0100-123456789012",
        )
        .ip("10.0.0.1")
        .key(99)
        .tracker_id("abc xyz")
        .build();

        let url = request.as_url().unwrap();

        assert!(url.contains("&ip=10.0.0.1"));
        assert!(url.contains("&key=99"));
        assert!(url.ends_with("&trackerid=abc%20xyz"));
    }

    #[test]
    fn test_scrape_url_rewrites_last_announce_segment() {
        let request = TrackerRequest::builder(
            "http://tracker.example.com/announce",
            sample_info_hash(),
            *b"-BM0100-123456789012",
        )
        .kind(RequestKind::Scrape)
        .build();

        assert_eq!(
            "http://tracker.example.com/scrape\
            ?info_hash=%124Vx%9A%BC%DE%F1%23Eg%89%AB%CD%EF%124Vx%9A",
            request.as_url().unwrap()
        );
    }

    #[test]
    fn test_scrape_url_keeps_suffix() {
        let request = TrackerRequest::builder(
            "http://tracker.example.com/announce.php",
            sample_info_hash(),
            *b"-BM0100-123456789012",
        )
        .kind(RequestKind::Scrape)
        .build();

        assert!(request
            .as_url()
            .unwrap()
            .starts_with("http://tracker.example.com/scrape.php?info_hash="));
    }

    #[test]
    fn test_scrape_not_supported() {
        let request = TrackerRequest::builder(
            "http://tracker.example.com/other",
            sample_info_hash(),
            *b"-BM0100-123456789012",
        )
        .kind(RequestKind::Scrape)
        .build();

        assert!(matches!(
            request.as_url(),
            Err(TrackerError::ScrapeNotSupported)
        ));
    }
}
