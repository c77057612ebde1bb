//! Reelscout Search - Movie discovery against a movie metadata API

#![deny(missing_docs)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![warn(clippy::too_many_lines)]
//!
//! Turns search text into a result list: endpoint selection, the HTTP
//! provider, application-level failure detection, search-count tracking,
//! and the debounced search cycle that ties them to a renderable state.

pub mod cycle;
pub mod endpoint;
pub mod errors;
pub mod fetch;
pub mod providers;
pub mod state;
pub mod tracking;
pub mod types;

#[cfg(test)]
mod test_server;

// Re-export main types
pub use cycle::{SearchCycle, SearchCycleHandle};
pub use endpoint::MovieEndpoint;
pub use errors::MovieSearchError;
pub use fetch::{FetchOutcome, fetch_movies};
pub use providers::{DemoProvider, MovieApi, TmdbProvider};
pub use state::{SearchState, View};
pub use tracking::{AppwriteTracker, InMemoryTracker, SearchTracker, TrendingSearch};
pub use types::{MovieListPayload, MovieSummary};

/// Convenience type alias for Results with MovieSearchError.
pub type Result<T> = std::result::Result<T, MovieSearchError>;
