/// Runtime settings for the search client and the grid
///
/// Everything is built in code; there are no config files or flags.
/// Tests override `endpoint` to point at a mock server.
use std::ops::Range;
use std::time::Duration;

/// Public image-search endpoint, queried with a single `q` parameter
pub const DEFAULT_ENDPOINT: &str = "https://imsea.herokuapp.com/api/1";

/// Quiet period after the last keystroke before a search is issued
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Edge length of a grid cell, in pixels
pub const THUMBNAIL_SIZE: u32 = 200;

#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Search endpoint URL (without query string)
    pub endpoint: String,
    /// Debounce window; zero issues a search on every change
    pub debounce: Duration,
    /// Thumbnails are downsized to fit in a square of this size
    pub thumbnail_size: u32,
    /// When set, each thumbnail fetch first sleeps a random number of
    /// milliseconds drawn from this range (staggered arrival)
    pub simulated_latency: Option<Range<u64>>,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            debounce: DEFAULT_DEBOUNCE,
            thumbnail_size: THUMBNAIL_SIZE,
            simulated_latency: None,
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        }
    }
}

impl SearchConfig {
    /// Enable the staggered-arrival prototype (random 500..1000 ms per thumbnail)
    pub fn with_simulated_latency(mut self, millis: Range<u64>) -> Self {
        self.simulated_latency = if millis.is_empty() { None } else { Some(millis) };
        self
    }
}
