//! Retrieving the raw manifest response.

use crate::error::{Error, Result};

/// Status code and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    /// HTTP status code.
    pub status: u16,
    /// Response body bytes, unmodified.
    pub body: Vec<u8>,
}

impl Fetched {
    /// Whether the status is exactly `200 OK`.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Body decoded as UTF-8, with invalid sequences replaced.
    #[must_use]
    pub fn body_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Something that can produce the manifest response on demand.
pub trait ManifestSource {
    /// What: Perform one request for the manifest.
    ///
    /// Output:
    /// - `Fetched` for any completed exchange, whatever its status
    ///
    /// # Errors
    /// - Returns `Err(Error::Request)` when no response could be obtained
    fn fetch(&self) -> Result<Fetched>;

    /// Location reported in log lines.
    fn location(&self) -> &str;
}

/// Blocking HTTP source issuing a plain GET against a fixed URL.
#[derive(Debug, Clone)]
pub struct HttpSource {
    /// Reused blocking client with default settings.
    client: reqwest::blocking::Client,
    /// Endpoint requested on every fetch.
    url: String,
}

impl HttpSource {
    /// What: Build a source for `url` with a default blocking client.
    ///
    /// Inputs:
    /// - `url`: Endpoint to request
    ///
    /// Output:
    /// - `HttpSource` ready to fetch
    ///
    /// # Errors
    /// - Returns `Err(Error::Request)` when the HTTP client cannot be initialized (TLS backend)
    ///
    /// Details:
    /// - No timeout, retry or redirect override; client defaults apply.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|source| Error::Request {
                url: url.clone(),
                source,
            })?;
        Ok(Self::with_client(client, url))
    }

    /// Source for `url` reusing an already configured `client`.
    #[must_use]
    pub fn with_client(client: reqwest::blocking::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

impl ManifestSource for HttpSource {
    fn fetch(&self) -> Result<Fetched> {
        let request_error = |source| Error::Request {
            url: self.url.clone(),
            source,
        };
        let response = self.client.get(&self.url).send().map_err(request_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().map_err(request_error)?.to_vec();
        tracing::debug!(url = %self.url, status, bytes = body.len(), "manifest response received");
        Ok(Fetched { status, body })
    }

    fn location(&self) -> &str {
        &self.url
    }
}
