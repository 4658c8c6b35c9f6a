use iced::task;

/// Generation number of a query change.
///
/// Every edit of the search text gets a fresh ticket; debounce timers and
/// search responses carry the ticket they were started for, so anything
/// holding an older one is known to be superseded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Ticket(u64);

impl Ticket {
    fn next(self) -> Self {
        Ticket(self.0 + 1)
    }
}

/// Where the current search stands
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchState {
    /// Nothing searched yet
    #[default]
    Idle,
    /// Request issued, waiting for the endpoint
    Pending,
    /// Results of the latest search, in response order
    Loaded(Vec<String>),
    /// The latest search failed; no results
    Failed(String),
}

/// A search to issue once the debounce window has passed
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub ticket: Ticket,
    pub query: String,
}

/// Outcome of a debounce window elapsing
#[derive(Debug, Clone, PartialEq)]
pub enum Settled {
    /// A newer edit arrived during the window
    Stale,
    /// The query is blank; results were cleared without a request
    Cleared,
    /// Issue this request
    Search(SearchRequest),
}

/// Owns the search text and the single live search.
///
/// At most one search is in flight. Editing the text supersedes it: its task
/// is aborted and its response, if one still arrives, is discarded.
#[derive(Debug, Default)]
pub struct QueryController {
    query: String,
    latest: Ticket,
    /// Ticket whose debounce window last elapsed
    settled: Ticket,
    state: SearchState,
    in_flight: Option<task::Handle>,
}

impl QueryController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Result URLs of the latest search; empty while pending or after a failure
    pub fn urls(&self) -> &[String] {
        match &self.state {
            SearchState::Loaded(urls) => urls,
            _ => &[],
        }
    }

    /// Ticket of the most recent query change
    pub fn latest(&self) -> Ticket {
        self.latest
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket == self.latest
    }

    /// `false` while an edit is still waiting out its debounce window
    pub fn is_settled(&self) -> bool {
        self.settled == self.latest
    }

    /// Record new search text.
    ///
    /// Returns the ticket to debounce on, or `None` when the text did not
    /// actually change.
    pub fn set_query(&mut self, text: String) -> Option<Ticket> {
        if text == self.query {
            return None;
        }

        self.query = text;
        self.latest = self.latest.next();

        // Dropping the handle aborts the superseded search
        if self.in_flight.take().is_some() {
            log::debug!("⏹️  Cancelled in-flight search");
        }

        Some(self.latest)
    }

    /// The debounce window for `ticket` has elapsed
    pub fn settle(&mut self, ticket: Ticket) -> Settled {
        if !self.is_current(ticket) {
            return Settled::Stale;
        }
        self.settled = ticket;

        if self.query.trim().is_empty() {
            self.state = SearchState::Loaded(Vec::new());
            return Settled::Cleared;
        }

        self.state = SearchState::Pending;
        Settled::Search(SearchRequest {
            ticket,
            query: self.query.clone(),
        })
    }

    /// Keep the abort handle of the search issued for `ticket`
    pub fn track(&mut self, ticket: Ticket, handle: task::Handle) {
        if self.is_current(ticket) {
            self.in_flight = Some(handle.abort_on_drop());
        } else {
            handle.abort();
        }
    }

    /// Apply a search outcome. Returns `false` if `ticket` was superseded and
    /// the outcome was dropped.
    pub fn finish(&mut self, ticket: Ticket, outcome: Result<Vec<String>, String>) -> bool {
        if !self.is_current(ticket) {
            log::debug!("Discarding superseded search response");
            return false;
        }

        self.in_flight = None;
        self.state = match outcome {
            Ok(urls) => {
                log::info!("✅ {} results for {:?}", urls.len(), self.query);
                SearchState::Loaded(urls)
            }
            Err(e) => {
                log::warn!("⚠️  Search for {:?} failed: {}", self.query, e);
                SearchState::Failed(e)
            }
        };

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iced::Task;

    /// A search task that never completes, plus a handle to observe it.
    /// The observer clone is taken before `abort_on_drop`, so dropping it
    /// does not abort anything.
    fn pending_search() -> (task::Handle, task::Handle) {
        let (_task, handle) = Task::perform(std::future::pending::<()>(), |_| ()).abortable();
        let observer = handle.clone();
        (handle, observer)
    }

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn expect_search(settled: Settled) -> SearchRequest {
        match settled {
            Settled::Search(request) => request,
            other => panic!("expected a search, got {other:?}"),
        }
    }

    #[test]
    fn test_starts_idle() {
        let controller = QueryController::new();
        assert_eq!(controller.query(), "");
        assert_eq!(controller.state(), &SearchState::Idle);
        assert!(controller.urls().is_empty());
    }

    #[test]
    fn test_typing_within_window_issues_one_search() {
        let mut controller = QueryController::new();

        let tickets: Vec<Ticket> = ["c", "ca", "cat"]
            .into_iter()
            .filter_map(|text| controller.set_query(text.to_string()))
            .collect();
        assert_eq!(tickets.len(), 3);

        // All three timers fire; only the last one is still current
        let issued: Vec<SearchRequest> = tickets
            .into_iter()
            .filter_map(|ticket| match controller.settle(ticket) {
                Settled::Search(request) => Some(request),
                _ => None,
            })
            .collect();

        assert_eq!(issued.len(), 1);
        assert_eq!(issued[0].query, "cat");
        assert_eq!(controller.state(), &SearchState::Pending);
    }

    #[test]
    fn test_same_text_is_not_a_change() {
        let mut controller = QueryController::new();
        assert!(controller.set_query("cat".to_string()).is_some());
        assert!(controller.set_query("cat".to_string()).is_none());
        assert!(controller.set_query(String::new()).is_some());
    }

    #[test]
    fn test_blank_query_clears_without_request() {
        let mut controller = QueryController::new();

        let ticket = controller.set_query("dog".to_string()).unwrap();
        let request = expect_search(controller.settle(ticket));
        assert!(controller.finish(request.ticket, Ok(urls(&["d.jpg"]))));

        let ticket = controller.set_query("   ".to_string()).unwrap();
        assert_eq!(controller.settle(ticket), Settled::Cleared);
        assert_eq!(controller.state(), &SearchState::Loaded(Vec::new()));
        assert!(controller.urls().is_empty());
    }

    #[test]
    fn test_exposes_results_of_current_search() {
        let mut controller = QueryController::new();

        let ticket = controller.set_query("cat".to_string()).unwrap();
        let request = expect_search(controller.settle(ticket));
        assert!(controller.urls().is_empty());

        assert!(controller.finish(request.ticket, Ok(urls(&["a.jpg", "b.jpg"]))));
        assert_eq!(controller.urls(), urls(&["a.jpg", "b.jpg"]).as_slice());
    }

    #[test]
    fn test_late_response_never_overwrites_newer_query() {
        let mut controller = QueryController::new();

        let first = controller.set_query("cat".to_string()).unwrap();
        let first = expect_search(controller.settle(first));

        let second = controller.set_query("dog".to_string()).unwrap();
        let second = expect_search(controller.settle(second));

        // "dog" answers first, then the stale "cat" response shows up
        assert!(controller.finish(second.ticket, Ok(urls(&["dog.jpg"]))));
        assert!(!controller.finish(first.ticket, Ok(urls(&["cat.jpg"]))));

        assert_eq!(controller.urls(), urls(&["dog.jpg"]).as_slice());
    }

    #[test]
    fn test_response_arriving_during_next_debounce_is_dropped() {
        let mut controller = QueryController::new();

        let ticket = controller.set_query("ca".to_string()).unwrap();
        let request = expect_search(controller.settle(ticket));

        // User keeps typing before the response lands
        controller.set_query("cat".to_string()).unwrap();
        assert!(!controller.finish(request.ticket, Ok(urls(&["ca.jpg"]))));
        assert_eq!(controller.state(), &SearchState::Pending);
    }

    #[test]
    fn test_failure_becomes_explicit_state() {
        let mut controller = QueryController::new();

        let ticket = controller.set_query("cat".to_string()).unwrap();
        let request = expect_search(controller.settle(ticket));

        assert!(controller.finish(request.ticket, Err("search endpoint answered 500".to_string())));
        assert_eq!(
            controller.state(),
            &SearchState::Failed("search endpoint answered 500".to_string())
        );
        assert!(controller.urls().is_empty());
    }

    #[test]
    fn test_tickets_increase() {
        let mut controller = QueryController::new();
        let a = controller.set_query("a".to_string()).unwrap();
        let b = controller.set_query("b".to_string()).unwrap();
        assert!(b > a);
        assert!(!controller.is_current(a));
        assert!(controller.is_current(b));
    }

    #[test]
    fn test_edit_aborts_in_flight_search() {
        let mut controller = QueryController::new();
        let ticket = controller.set_query("cat".to_string()).unwrap();
        expect_search(controller.settle(ticket));

        let (handle, observer) = pending_search();
        controller.track(ticket, handle);
        assert!(!observer.is_aborted());

        controller.set_query("cats".to_string()).unwrap();
        assert!(observer.is_aborted());
    }

    #[test]
    fn test_stale_handle_is_aborted_on_track() {
        let mut controller = QueryController::new();
        let old = controller.set_query("ca".to_string()).unwrap();
        let current = controller.set_query("cat".to_string()).unwrap();

        let (stale, stale_observer) = pending_search();
        controller.track(old, stale);
        assert!(stale_observer.is_aborted());

        let (live, live_observer) = pending_search();
        controller.track(current, live);
        assert!(!live_observer.is_aborted());
    }

    #[test]
    fn test_settled_tracks_debounce_window() {
        let mut controller = QueryController::new();
        assert!(controller.is_settled());

        let ticket = controller.set_query("cat".to_string()).unwrap();
        assert!(!controller.is_settled());

        controller.settle(ticket);
        assert!(controller.is_settled());

        let stale = ticket;
        controller.set_query("dog".to_string()).unwrap();
        assert_eq!(controller.settle(stale), Settled::Stale);
        assert!(!controller.is_settled());
    }
}
