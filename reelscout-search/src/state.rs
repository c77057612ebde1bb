//! Search state and view selection.
//!
//! The state is the single source the view is rendered from. Selection is a
//! pure function: loading beats error, error beats results.

use reelscout_core::RequestId;

use crate::fetch::FetchOutcome;
use crate::types::MovieSummary;

/// Everything the search view renders from.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    /// Raw text as last entered
    pub search_text: String,
    /// Text the latest fetch was issued for
    pub debounced_text: String,
    /// A fetch is in flight
    pub loading: bool,
    /// User-facing error of the last settled fetch
    pub error: Option<String>,
    /// Results of the last successful fetch
    pub movies: Vec<MovieSummary>,
    /// Latest issued request
    pub request: Option<RequestId>,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            debounced_text: String::new(),
            // The first fetch starts as soon as the cycle does.
            loading: true,
            error: None,
            movies: Vec::new(),
            request: None,
        }
    }
}

impl SearchState {
    /// Marks request `id` for `term` as in flight.
    pub fn begin_fetch(&mut self, id: RequestId, term: &str) {
        self.loading = true;
        self.error = None;
        self.debounced_text = term.to_string();
        self.request = Some(id);
    }

    /// Applies a settled outcome.
    pub fn settle(&mut self, outcome: FetchOutcome) {
        self.loading = false;
        match outcome {
            FetchOutcome::Loaded(movies) => {
                self.movies = movies;
                self.error = None;
            }
            FetchOutcome::Failed(error) => {
                self.movies.clear();
                self.error = Some(error.user_message());
            }
        }
    }

    /// True when the current text has been fetched and nothing is in flight.
    pub fn is_settled(&self) -> bool {
        !self.loading && self.debounced_text == self.search_text
    }

    /// Selects the one view to show.
    pub fn view(&self) -> View<'_> {
        if self.loading {
            View::Loading
        } else if let Some(ref message) = self.error {
            View::Error(message)
        } else {
            View::Results(&self.movies)
        }
    }
}

/// The three mutually exclusive views.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View<'a> {
    /// Spinner while a fetch is in flight
    Loading,
    /// Error text in place of results
    Error(&'a str),
    /// Ordered result cards
    Results(&'a [MovieSummary]),
}

impl View<'_> {
    /// Render keys of the result cards, in display order.
    ///
    /// Cards are keyed by movie id so renderers can keep per-card state
    /// across reorders and insertions.
    pub fn keys(&self) -> Vec<u64> {
        match self {
            View::Results(movies) => movies.iter().map(|movie| movie.id).collect(),
            View::Loading | View::Error(_) => Vec::new(),
        }
    }
}
