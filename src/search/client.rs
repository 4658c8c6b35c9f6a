use rand::Rng;
use reqwest::Client;
use serde::Deserialize;
use std::ops::Range;
use std::time::Duration;

use super::error::{SearchError, ThumbnailError};
use crate::config::SearchConfig;

/// Body of a successful search response
#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<String>,
}

/// HTTP client shared by the search box and every grid cell.
///
/// Requests are stateless, so clones are handed to background tasks freely;
/// they all share the same connection pool.
#[derive(Debug, Clone)]
pub struct ImageSearchClient {
    http: Client,
    endpoint: String,
    simulated_latency: Option<Range<u64>>,
}

impl ImageSearchClient {
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        let http = Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            simulated_latency: config.simulated_latency.clone(),
        })
    }

    /// Query the search endpoint and return the image URLs in response order
    pub async fn search(&self, query: &str) -> Result<Vec<String>, SearchError> {
        log::debug!("🔍 query = {query:?}");

        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("q", query)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status));
        }

        let body = response.bytes().await?;
        if body.is_empty() {
            return Err(SearchError::EmptyBody);
        }

        let parsed: SearchResponse = serde_json::from_slice(&body)?;
        log::debug!("end query = {query:?} ({} results)", parsed.results.len());

        Ok(parsed.results)
    }

    /// Download the raw bytes behind one result URL
    pub async fn fetch_thumbnail(&self, url: &str) -> Result<Vec<u8>, ThumbnailError> {
        if let Some(range) = &self.simulated_latency {
            tokio::time::sleep(jitter(range)).await;
        }

        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ThumbnailError::Status(status));
        }

        let bytes = response.bytes().await?;
        log::trace!("📥 {} bytes from {url}", bytes.len());

        Ok(bytes.to_vec())
    }
}

/// Random delay within `range` (milliseconds)
fn jitter(range: &Range<u64>) -> Duration {
    if range.is_empty() {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::thread_rng().gen_range(range.clone()))
}
