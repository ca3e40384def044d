use std::future::Future;
use std::time::Duration;

use thiserror::Error;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything that can go wrong below the tracker protocol: DNS,
/// connecting, writing, reading.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("tracker returned http status {0}")]
    BadStatus(u16),
}

/// Performs the raw byte exchange with a tracker.
///
/// The protocol layer never opens sockets itself; it hands a URL to the
/// transport and gets the response body back.
pub trait Transport {
    fn fetch(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<Vec<u8>, TransportError>> + Send;
}

/// Default transport backed by a shared [`reqwest::Client`].
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;

        Ok(HttpTransport { client })
    }
}

impl Transport for HttpTransport {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::BadStatus(status.as_u16()));
        }

        Ok(response.bytes().await?.to_vec())
    }
}
