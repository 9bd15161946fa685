//! HTTP page fetching shared by the ranking sources.

use std::time::Duration;

use employer_core::{Result, ScreenConfig, ScreenError, UserAgentPool};
use reqwest::{StatusCode, header};
use tracing::debug;

/// Default timeout for page requests.
const DEFAULT_PAGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches ranking pages with a rotated user agent.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: reqwest::Client,
    agents: UserAgentPool,
}

impl PageFetcher {
    /// Create a fetcher with the default timeout and user-agent pool.
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_PAGE_TIMEOUT, UserAgentPool::default())
    }

    /// Create a fetcher from the run configuration.
    pub fn from_config(config: &ScreenConfig) -> Result<Self> {
        Self::with_timeout(
            Duration::from_secs(config.page_timeout_secs),
            config.user_agent_pool(),
        )
    }

    /// Create a fetcher with a custom timeout and agent pool.
    pub fn with_timeout(timeout: Duration, agents: UserAgentPool) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ScreenError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, agents })
    }

    /// GET a page and return its body as text.
    pub async fn get_text(&self, url: &str) -> Result<String> {
        debug!("Fetching page: {}", url);

        let response = self
            .client
            .get(url)
            .header(header::USER_AGENT, self.agents.pick())
            .send()
            .await
            .map_err(|e| ScreenError::Network(e.to_string()))?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(ScreenError::RateLimited {
                provider: url.to_string(),
                retry_after: None,
            });
        }

        if !response.status().is_success() {
            return Err(ScreenError::Http {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| ScreenError::Network(e.to_string()))
    }
}
