//! Bounded HTTP client for the portal's content endpoints.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{header, Client, Url};
use tracing::{debug, warn};

use super::{ContentSource, FeedResponse, FetchError};
use crate::models::{BlockKind, ContentItem};

/// User agent sent with every request
const USER_AGENT: &str = concat!("smartfeed/", env!("CARGO_PKG_VERSION"));

/// Connection setup may never take longer than this, whatever the request budget.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Client for the content API.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct FeedClient {
    client: Client,
    base_url: String,
}

impl FeedClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the request URL for a block
    pub fn block_url(&self, block: BlockKind, limit: usize) -> Result<Url, FetchError> {
        let raw = format!("{}{}", self.base_url.trim_end_matches('/'), block.endpoint());
        let mut url = Url::parse(&raw).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", raw, e)))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in block.query() {
                pairs.append_pair(key, &value);
            }
            pairs.append_pair("limit", &limit.to_string());
        }
        Ok(url)
    }

    /// GET `url` and normalize the body, giving up after `timeout`.
    ///
    /// The timeout covers the whole exchange including the body. When it
    /// fires the request future is dropped, which aborts the connection.
    pub async fn fetch_with_timeout(
        &self,
        url: Url,
        timeout: Duration,
    ) -> Result<Vec<ContentItem>, FetchError> {
        let started = Instant::now();
        let result = match tokio::time::timeout(timeout, self.fetch_once(url.clone())).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(timeout)),
        };

        match &result {
            Ok(items) => {
                debug!(url = %url, count = items.len(), elapsed_ms = started.elapsed().as_millis() as u64, "Fetched items");
            }
            Err(e) => {
                warn!(url = %url, kind = e.kind(), error = %e, "Fetch failed");
            }
        }
        result
    }

    async fn fetch_once(&self, url: Url) -> Result<Vec<ContentItem>, FetchError> {
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        let body = response.bytes().await?;

        let parsed: FeedResponse = serde_json::from_slice(&body)
            .map_err(|e| FetchError::InvalidResponse(e.to_string()))?;

        let items = parsed.into_items();
        if items.is_empty() {
            return Err(FetchError::EmptyPayload);
        }
        Ok(items)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, FetchError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(FetchError::from_status(status, &body))
        }
    }
}

#[async_trait]
impl ContentSource for FeedClient {
    async fn fetch_block(
        &self,
        block: BlockKind,
        limit: usize,
        timeout: Duration,
    ) -> Result<Vec<ContentItem>, FetchError> {
        let url = self.block_url(block, limit)?;
        self.fetch_with_timeout(url, timeout).await
    }
}
