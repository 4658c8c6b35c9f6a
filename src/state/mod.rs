/// State management module
///
/// This module holds the view-model behind the window:
/// - The search text and the single live search (query.rs)
/// - The grid cells and their thumbnail fetches (thumbnails.rs)

pub mod query;
pub mod thumbnails;
