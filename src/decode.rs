/// Thumbnail decoding
///
/// Fetched bytes come in whatever format the image host serves. They are
/// decoded and downsized on the blocking pool so the UI only ever receives
/// small RGBA buffers.
use image::imageops::FilterType;

use crate::search::ThumbnailError;

/// A display-ready thumbnail (RGBA8, row-major)
#[derive(Debug, Clone)]
pub struct DecodedThumbnail {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Decode `bytes` and fit the result into a `size` x `size` square
pub async fn decode_thumbnail(bytes: Vec<u8>, size: u32) -> Result<DecodedThumbnail, ThumbnailError> {
    // Spawn blocking because decoding and resampling are CPU-bound
    tokio::task::spawn_blocking(move || decode_thumbnail_blocking(&bytes, size))
        .await
        .map_err(|e| ThumbnailError::Join(e.to_string()))?
}

fn decode_thumbnail_blocking(bytes: &[u8], size: u32) -> Result<DecodedThumbnail, ThumbnailError> {
    let img = image::load_from_memory(bytes)?;

    // Only shrink; small images are shown as-is
    let img = if img.width() > size || img.height() > size {
        img.resize(size, size, FilterType::Lanczos3)
    } else {
        img
    };

    let rgba = img.to_rgba8();
    Ok(DecodedThumbnail {
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw(),
    })
}
