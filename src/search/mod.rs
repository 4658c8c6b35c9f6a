/// Network side of the application
///
/// This module handles:
/// - Querying the image-search endpoint (client.rs)
/// - Downloading thumbnail bytes (client.rs)
/// - Error types for both (error.rs)

pub mod client;
pub mod error;

pub use client::ImageSearchClient;
pub use error::ThumbnailError;
