//! Search-count tracking.
//!
//! Every non-empty search that finds at least one movie is reported to a
//! tracker, which keeps a per-term counter. The counters feed the trending
//! searches listing.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::MovieSearchError;
use crate::types::MovieSummary;

pub mod appwrite;
pub mod memory;

pub use appwrite::AppwriteTracker;
pub use memory::InMemoryTracker;

/// One tracked search term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingSearch {
    /// The search text as typed
    #[serde(rename = "searchTerm")]
    pub search_term: String,
    /// How many times the term found results
    pub count: u64,
    /// Top result the first time the term was recorded
    pub movie_id: u64,
    /// Poster of that top result
    #[serde(default)]
    pub poster_url: Option<String>,
}

/// Trait for search-count tracking backends.
#[async_trait]
pub trait SearchTracker: Send + Sync + std::fmt::Debug {
    /// Increments the counter for `term`, creating it on first use with the
    /// top result's id and poster.
    ///
    /// # Errors
    /// - `MovieSearchError::Tracking` - Backend rejected or failed the update
    async fn record_search(&self, term: &str, top_movie: &MovieSummary) -> Result<(), MovieSearchError>;

    /// Most-searched terms, highest count first.
    ///
    /// # Errors
    /// - `MovieSearchError::Tracking` - Backend could not be queried
    async fn trending(&self, limit: usize) -> Result<Vec<TrendingSearch>, MovieSearchError>;
}
