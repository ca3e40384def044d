use std::collections::HashMap;

use tokio::sync::Mutex;

pub mod tracker_event;
pub use tracker_event::TrackerEvent;

pub mod tracker_request;
pub use tracker_request::{RequestKind, TrackerRequest, TrackerRequestBuilder};

pub mod tracker_response;
pub use tracker_response::{Peer, TrackerResponse};

pub mod transport;
pub use transport::{HttpTransport, Transport, TransportError};

pub mod error;
pub use error::TrackerError;

/// Sends announce and scrape requests and decodes the replies.
///
/// The byte exchange itself is delegated to the [`Transport`]; this type
/// only builds URLs, decodes response bodies and remembers the tracker id
/// each announce URL handed out so later requests can echo it.
pub struct TrackerManager<T: Transport> {
    transport: T,
    tracker_ids: Mutex<HashMap<String, String>>,
}

impl TrackerManager<HttpTransport> {
    pub fn new() -> Result<Self, TrackerError> {
        Ok(TrackerManager::with_transport(HttpTransport::new()?))
    }
}

impl<T: Transport> TrackerManager<T> {
    pub fn with_transport(transport: T) -> Self {
        TrackerManager {
            transport,
            tracker_ids: Mutex::new(HashMap::new()),
        }
    }

    /// One full request/response round trip.
    ///
    /// The only suspension point is the transport exchange; everything
    /// before and after is synchronous. The tracker id cache is written
    /// only after a successful decode, so an abandoned call leaves no
    /// half-updated state behind.
    pub async fn send(&self, request: &TrackerRequest) -> Result<TrackerResponse, TrackerError> {
        if !has_http_scheme(request.announce()) {
            return Err(TrackerError::InvalidScheme);
        }

        let request = match request.tracker_id() {
            Some(_) => request.clone(),
            None => {
                let tracker_ids = self.tracker_ids.lock().await;
                match tracker_ids.get(request.announce()) {
                    Some(tracker_id) => request.with_tracker_id(tracker_id.clone()),
                    None => request.clone(),
                }
            }
        };

        let url = request.as_url()?;
        tracing::debug!("sending tracker request: {}", url);

        let body = self.transport.fetch(&url).await?;

        let response = match request.kind() {
            RequestKind::Announce => TrackerResponse::from_announce_bytes(&body)?,
            RequestKind::Scrape => TrackerResponse::from_scrape_bytes(&body, request.info_hash())?,
        };

        if let Some(tracker_id) = &response.tracker_id {
            self.tracker_ids
                .lock()
                .await
                .insert(request.announce().to_string(), tracker_id.clone());
        }

        Ok(response)
    }
}

fn has_http_scheme(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
