//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the shared HTTP client with a proper user agent string
//! - One bounded-timeout GET per page
//! - Error classification (timeout, HTTP/transport, unknown)
//!
//! Fetching is exposed through the [`PageSource`] trait so the crawl logic can
//! run against simulated sites.

use crate::config::{Config, UserAgentConfig};
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;

/// Why a page could not be fetched
///
/// All variants are lane-local: the page is dropped without a continuation
/// and the crawl carries on.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP error for {url}: {cause}")]
    Http {
        url: String,
        /// Response status, absent for transport failures
        status: Option<u16>,
        cause: String,
    },

    #[error("Unknown error ({kind}) for {url}")]
    Unknown { url: String, kind: String },
}

impl FetchError {
    /// The URL that failed
    pub fn url(&self) -> &str {
        match self {
            Self::Timeout { url } | Self::Http { url, .. } | Self::Unknown { url, .. } => url,
        }
    }

    /// Short label of the failure class, used in logs and statistics
    pub fn label(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "timeout",
            Self::Http { .. } => "http",
            Self::Unknown { .. } => "unknown",
        }
    }
}

/// Something that can return the body of a page
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches `url` and returns the page body as text
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// [`PageSource`] backed by a shared `reqwest` client
///
/// Cloning is cheap; all clones share one connection pool.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Builds the client from the user agent section and applies the
    /// configured request timeout
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = build_http_client(&config.user_agent)?;
        Ok(Self::new(
            client,
            Duration::from_secs(config.crawler.request_timeout_secs),
        ))
    }
}

#[async_trait]
impl PageSource for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        fetch_page(&self.client, url, self.timeout).await
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use category_census::config::UserAgentConfig;
/// use category_census::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    // Format: CrawlerName/Version (+ContactURL; ContactEmail)
    let user_agent = format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    );

    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches one page with a per-request deadline
///
/// | Condition                               | Result                          |
/// |-----------------------------------------|---------------------------------|
/// | 2xx                                     | `Ok(body)`                      |
/// | deadline exceeded                       | `FetchError::Timeout`           |
/// | non-2xx status                          | `FetchError::Http` with status  |
/// | connect / request / body / redirect     | `FetchError::Http` without status |
/// | anything else (builder, decode, ...)    | `FetchError::Unknown`           |
///
/// There is no retry.
pub async fn fetch_page(client: &Client, url: &str, timeout: Duration) -> Result<String, FetchError> {
    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Http {
            url: url.to_string(),
            status: Some(status.as_u16()),
            cause: status.to_string(),
        });
    }

    response.text().await.map_err(|e| classify_error(url, e))
}

/// Maps a `reqwest` error onto the three failure classes
fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_status()
        || error.is_connect()
        || error.is_request()
        || error.is_body()
        || error.is_redirect()
    {
        FetchError::Http {
            url: url.to_string(),
            status: error.status().map(|s| s.as_u16()),
            cause: error.to_string(),
        }
    } else {
        FetchError::Unknown {
            url: url.to_string(),
            kind: error_kind(&error).to_string(),
        }
    }
}

fn error_kind(error: &reqwest::Error) -> &'static str {
    if error.is_builder() {
        "builder"
    } else if error.is_decode() {
        "decode"
    } else {
        "other"
    }
}
