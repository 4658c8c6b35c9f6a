use env_logger::Env;
use iced::widget::{column, image, scrollable, text, text_input};
use iced::{Element, Length, Task, Theme};

mod config;
mod decode;
mod search;
mod state;
mod ui;

use config::SearchConfig;
use decode::{decode_thumbnail, DecodedThumbnail};
use search::ImageSearchClient;
use state::query::{QueryController, SearchRequest, SearchState, Settled, Ticket};
use state::thumbnails::{CellId, ThumbnailGrid};

/// Main application state
struct ImageSearch {
    config: SearchConfig,
    /// Shared HTTP client, cloned into every background task
    client: ImageSearchClient,
    /// Search text and the single live search
    query: QueryController,
    /// Cells for the current result set
    grid: ThumbnailGrid,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User edited the search box
    QueryChanged(String),
    /// Debounce window for a query change elapsed
    QuerySettled(Ticket),
    /// Search request completed
    SearchFinished(Ticket, Result<Vec<String>, String>),
    /// One cell's thumbnail was fetched and decoded
    ThumbnailLoaded(CellId, Result<DecodedThumbnail, String>),
}

fn search_input_id() -> text_input::Id {
    text_input::Id::new("search")
}

impl ImageSearch {
    fn new(config: SearchConfig, client: ImageSearchClient) -> (Self, Task<Message>) {
        log::info!("🎨 Image search ready ({})", config.endpoint);

        (
            ImageSearch {
                config,
                client,
                query: QueryController::new(),
                grid: ThumbnailGrid::new(),
            },
            text_input::focus(search_input_id()),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::QueryChanged(text) => {
                let Some(ticket) = self.query.set_query(text) else {
                    return Task::none();
                };

                if self.config.debounce.is_zero() {
                    return self.issue_search(ticket);
                }

                // Stale timers are harmless: settle() ignores old tickets
                let debounce = self.config.debounce;
                Task::perform(
                    async move { tokio::time::sleep(debounce).await },
                    move |_| Message::QuerySettled(ticket),
                )
            }
            Message::QuerySettled(ticket) => self.issue_search(ticket),
            Message::SearchFinished(ticket, outcome) => {
                if !self.query.finish(ticket, outcome) {
                    return Task::none();
                }
                self.load_thumbnails(ticket)
            }
            Message::ThumbnailLoaded(id, outcome) => {
                let outcome = outcome
                    .map(|thumb| image::Handle::from_rgba(thumb.width, thumb.height, thumb.pixels));

                if !self.grid.resolve(id, outcome) {
                    log::trace!("Dropped thumbnail for a disposed cell");
                }

                Task::none()
            }
        }
    }

    /// Start the search for `ticket` if it is still the latest query
    fn issue_search(&mut self, ticket: Ticket) -> Task<Message> {
        match self.query.settle(ticket) {
            Settled::Stale => Task::none(),
            Settled::Cleared => {
                self.grid.clear();
                Task::none()
            }
            Settled::Search(SearchRequest { ticket, query }) => {
                // Result set stays empty while the search is pending
                self.grid.clear();

                log::info!("🔎 Searching for {:?}", query);

                let client = self.client.clone();
                let (task, handle) = Task::perform(
                    async move { client.search(&query).await.map_err(|e| e.to_string()) },
                    move |outcome| Message::SearchFinished(ticket, outcome),
                )
                .abortable();

                self.query.track(ticket, handle);
                task
            }
        }
    }

    /// Start one independent fetch per result cell
    fn load_thumbnails(&mut self, ticket: Ticket) -> Task<Message> {
        let jobs = self.grid.populate(ticket, self.query.urls());
        let mut tasks = Vec::with_capacity(jobs.len());

        for (id, url) in jobs {
            let (task, handle) = Task::perform(
                load_thumbnail(self.client.clone(), url, self.config.thumbnail_size),
                move |outcome| Message::ThumbnailLoaded(id, outcome),
            )
            .abortable();

            self.grid.attach(id, handle);
            tasks.push(task);
        }

        Task::batch(tasks)
    }

    /// One-line summary shown under the search box
    fn status(&self) -> String {
        let query = self.query.query().trim();

        // An edit still inside its debounce window already owns the status
        if !self.query.is_settled() {
            return if query.is_empty() {
                "Type to search for images".to_string()
            } else {
                format!("Searching for \"{}\"...", query)
            };
        }

        match self.query.state() {
            SearchState::Idle => "Type to search for images".to_string(),
            SearchState::Pending => format!("Searching for \"{}\"...", query),
            SearchState::Loaded(urls) if urls.is_empty() && query.is_empty() => {
                "Type to search for images".to_string()
            }
            SearchState::Loaded(urls) if urls.is_empty() => "No images found".to_string(),
            SearchState::Loaded(urls) => match self.grid.loading_count() {
                0 => image_count(urls.len()),
                loading => format!("{} ({} loading)", image_count(urls.len()), loading),
            },
            SearchState::Failed(e) => format!("Search failed: {}", e),
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let search = text_input("Search", self.query.query())
            .id(search_input_id())
            .on_input(Message::QueryChanged)
            .padding(10)
            .size(18);

        let results = scrollable(ui::grid::view(
            self.grid.cells(),
            self.config.thumbnail_size as f32,
        ))
        .width(Length::Fill)
        .height(Length::Fill);

        column![search, text(self.status()).size(14), results]
            .spacing(10)
            .padding(10)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Light
    }
}

fn main() -> iced::Result {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = SearchConfig::default();
    let client = match ImageSearchClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            log::error!("❌ Failed to create HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    iced::application("Image Search", ImageSearch::update, ImageSearch::view)
        .theme(ImageSearch::theme)
        .centered()
        .run_with(move || ImageSearch::new(config, client))
}

fn image_count(n: usize) -> String {
    match n {
        1 => "1 image".to_string(),
        n => format!("{} images", n),
    }
}

/// Fetch one cell's image and shrink it for the grid
/// Runs as its own task so a slow host only delays its own cell
async fn load_thumbnail(
    client: ImageSearchClient,
    url: String,
    size: u32,
) -> Result<DecodedThumbnail, String> {
    let bytes = client
        .fetch_thumbnail(&url)
        .await
        .map_err(|e| e.to_string())?;

    decode_thumbnail(bytes, size)
        .await
        .map_err(|e| e.to_string())
}
