//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with user agent and timeouts
//! - GET requests without redirect following
//! - Error classification (connection failure, timeout, unexpected status)

use crate::config::HttpSettings;
use crate::NetworkError;
use reqwest::{redirect::Policy, Client, StatusCode};
use url::Url;

/// A successful (HTTP 200) response
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// The requested URL
    pub url: Url,

    /// Response body
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Body decoded as UTF-8, replacing invalid sequences
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are never followed: on the catalog a redirect means "not found"
/// or "no payload" and has to stay visible to the caller.
///
/// # Example
///
/// ```no_run
/// use bookshelf_mirror::config::HttpSettings;
/// use bookshelf_mirror::crawler::build_http_client;
///
/// let client = build_http_client(&HttpSettings::default()).unwrap();
/// ```
pub fn build_http_client(settings: &HttpSettings) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(settings.user_agent.as_str())
        .timeout(settings.timeout())
        .connect_timeout(settings.connect_timeout())
        .redirect(Policy::none())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Performs single GET requests and classifies the outcome
///
/// No retries happen here; retry and backoff policy belongs to the
/// coordinator.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Creates a fetcher with a freshly built client
    pub fn new(settings: &HttpSettings) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(settings)?))
    }

    /// Wraps an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Fetches a URL
    ///
    /// # Outcome Classification
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | HTTP 200 | `Ok(RawResponse)` |
    /// | Any other status (including 3xx) | `BadStatus` |
    /// | Timeout while connecting or reading | `Timeout` |
    /// | Any other transport failure | `Connection` |
    pub async fn fetch(&self, url: &Url) -> Result<RawResponse, NetworkError> {
        tracing::trace!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::debug!("GET {} answered {}", url, status);
            return Err(NetworkError::BadStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| classify_error(url, e))?;

        Ok(RawResponse {
            url: url.clone(),
            body: body.to_vec(),
        })
    }
}

/// Maps a transport error onto the network error taxonomy
fn classify_error(url: &Url, error: reqwest::Error) -> NetworkError {
    if error.is_timeout() {
        NetworkError::Timeout {
            url: url.to_string(),
        }
    } else {
        NetworkError::Connection {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
