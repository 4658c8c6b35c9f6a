use reqwest::StatusCode;
use thiserror::Error;

/// Why a search produced no result set
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("search endpoint answered {0}")]
    Status(StatusCode),

    #[error("search endpoint returned an empty body")]
    EmptyBody,

    #[error("malformed search response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Why a grid cell could not show its image
#[derive(Debug, Error)]
pub enum ThumbnailError {
    #[error("thumbnail request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("thumbnail server answered {0}")]
    Status(StatusCode),

    #[error("could not decode thumbnail: {0}")]
    Decode(#[from] image::ImageError),

    #[error("decode task join error: {0}")]
    Join(String),
}
