use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

/// Request timeout for page and sitemap fetches.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Source of raw page bodies (allows mocking in tests).
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url` and return its body.
    ///
    /// Anything other than `200 OK` is an error.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// HTTP fetcher for sitemaps and pages
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher sending `user_agent` with the default timeout
    pub fn new(user_agent: &str) -> Result<Self> {
        Self::with_timeout(user_agent, FETCH_TIMEOUT)
    }

    /// Creates a fetcher with a custom request timeout (primarily for tests)
    pub fn with_timeout(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(Error::Network)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status != StatusCode::OK {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content = response.text().await?;
        debug!("Fetched {} bytes from {}", content.len(), url);
        Ok(content)
    }
}
