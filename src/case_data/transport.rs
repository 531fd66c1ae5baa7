//! Retrieval of raw feed documents.
//!
//! The orchestrator only sees [`FeedTransport`]; production uses
//! [`HttpTransport`] (reqwest), tests plug in canned responses.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::case_data::adapters::{DecodeError, FeedSource};

pub const SCMP_URL: &str = "https://interactive-static.scmp.com/sheet/wuhan/viruscases.json";
pub const BING_URL: &str = "https://www.bing.com/covid/data";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub(crate) const DEFAULT_USER_AGENT: &str = concat!("covid-status-rs/", env!("CARGO_PKG_VERSION"));

/// Failure of one fetch cycle
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl FetchError {
    /// Whether trying again later could plausibly succeed
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Network(_) => true,
            FetchError::Status { status, .. } => *status == 429 || *status >= 500,
            FetchError::Decode(_) => false,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Network(e.to_string())
    }
}

/// Where each feed lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEndpoints {
    pub scmp_url: String,
    pub bing_url: String,
}

impl FeedEndpoints {
    pub fn url_for(&self, source: FeedSource) -> &str {
        match source {
            FeedSource::Scmp => &self.scmp_url,
            FeedSource::Bing => &self.bing_url,
        }
    }
}

impl Default for FeedEndpoints {
    fn default() -> Self {
        Self { scmp_url: SCMP_URL.to_string(), bing_url: BING_URL.to_string() }
    }
}

#[async_trait]
pub trait FeedTransport: Send + Sync {
    // Fetch the whole document at `url`.
    async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

#[async_trait]
impl<T: FeedTransport + ?Sized> FeedTransport for std::sync::Arc<T> {
    async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        (**self).get(url).await
    }
}

pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_options(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    pub fn with_options(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FeedTransport for HttpTransport {
    #[instrument(level = "debug", skip(self))]
    async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let res = self.client.get(url).send().await?;

        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::Status { url: url.to_string(), status: status.as_u16() });
        }

        let body = res.bytes().await?;
        debug!(bytes = body.len(), "feed document received");
        Ok(body.to_vec())
    }
}
