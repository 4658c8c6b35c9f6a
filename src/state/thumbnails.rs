use iced::task;
use iced::widget::image;
use rand::Rng;

use super::query::Ticket;

/// Number of placeholder shades a loading cell can take
pub const PLACEHOLDER_SHADES: usize = 4;

/// Identifies one grid cell of one result set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellId {
    pub ticket: Ticket,
    pub index: usize,
}

#[derive(Debug, Clone)]
pub enum ThumbnailState {
    Loading,
    Ready(image::Handle),
    Failed(String),
}

/// One grid cell.
///
/// The cell owns its fetch task: dropping the cell aborts the fetch.
#[derive(Debug)]
pub struct Thumbnail {
    pub url: String,
    /// Index into the placeholder palette, picked once per cell
    pub shade: usize,
    pub state: ThumbnailState,
    task: Option<task::Handle>,
}

impl Thumbnail {
    fn new(url: String, shade: usize) -> Self {
        Self {
            url,
            shade,
            state: ThumbnailState::Loading,
            task: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ThumbnailState::Loading)
    }
}

/// The cells of the result set currently on screen
#[derive(Debug, Default)]
pub struct ThumbnailGrid {
    ticket: Option<Ticket>,
    cells: Vec<Thumbnail>,
}

impl ThumbnailGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cells(&self) -> &[Thumbnail] {
        &self.cells
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of cells still waiting for their image
    pub fn loading_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_loading()).count()
    }

    /// Replace the grid with one loading cell per URL.
    ///
    /// Old cells are dropped, which aborts their fetches. Returns the fetch
    /// each new cell needs.
    pub fn populate(&mut self, ticket: Ticket, urls: &[String]) -> Vec<(CellId, String)> {
        let mut rng = rand::thread_rng();

        self.ticket = Some(ticket);
        self.cells = urls
            .iter()
            .map(|url| Thumbnail::new(url.clone(), rng.gen_range(0..PLACEHOLDER_SHADES)))
            .collect();

        urls.iter()
            .enumerate()
            .map(|(index, url)| (CellId { ticket, index }, url.clone()))
            .collect()
    }

    /// Dispose every cell
    pub fn clear(&mut self) {
        self.ticket = None;
        self.cells.clear();
    }

    /// Tie a fetch task to its cell. A handle for a disposed cell is aborted.
    pub fn attach(&mut self, id: CellId, handle: task::Handle) {
        match self.cell_mut(id) {
            Some(cell) => cell.task = Some(handle.abort_on_drop()),
            None => handle.abort(),
        }
    }

    /// Apply a finished fetch. Returns `false` if the cell no longer exists.
    pub fn resolve(&mut self, id: CellId, outcome: Result<image::Handle, String>) -> bool {
        let Some(cell) = self.cell_mut(id) else {
            return false;
        };

        cell.task = None;
        cell.state = match outcome {
            Ok(handle) => ThumbnailState::Ready(handle),
            Err(e) => {
                log::warn!("⚠️  Thumbnail {} failed: {}", cell.url, e);
                ThumbnailState::Failed(e)
            }
        };

        true
    }

    fn cell_mut(&mut self, id: CellId) -> Option<&mut Thumbnail> {
        if self.ticket != Some(id.ticket) {
            return None;
        }
        self.cells.get_mut(id.index)
    }
}
