//! Fetch stage: search text in, result list or failure out.

use crate::endpoint::MovieEndpoint;
use crate::errors::MovieSearchError;
use crate::providers::MovieApi;
use crate::tracking::SearchTracker;
use crate::types::MovieSummary;

/// Settled result of one fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Results to display; possibly empty
    Loaded(Vec<MovieSummary>),
    /// Transport, HTTP or application-level failure
    Failed(MovieSearchError),
}

impl FetchOutcome {
    /// Movies carried by a successful outcome.
    pub fn movies(&self) -> &[MovieSummary] {
        match self {
            FetchOutcome::Loaded(movies) => movies,
            FetchOutcome::Failed(_) => &[],
        }
    }

    /// The failure, if the fetch failed.
    pub fn error(&self) -> Option<&MovieSearchError> {
        match self {
            FetchOutcome::Loaded(_) => None,
            FetchOutcome::Failed(error) => Some(error),
        }
    }
}

/// Fetches movies for `query` and reports successful searches to `tracker`.
///
/// Empty text lists popular movies; anything else is searched. A non-empty
/// query that finds at least one movie notifies the tracker exactly once with
/// the query and the first result. Tracking failures are logged and never
/// change the outcome. No step is retried.
pub async fn fetch_movies(
    api: &dyn MovieApi,
    tracker: Option<&dyn SearchTracker>,
    query: &str,
) -> FetchOutcome {
    let endpoint = MovieEndpoint::for_query(query);
    tracing::debug!(%endpoint, "Fetching movies");

    let payload = match api.fetch(&endpoint).await {
        Ok(payload) => payload,
        Err(error) => {
            tracing::error!(%endpoint, %error, "Error fetching movies");
            return FetchOutcome::Failed(error);
        }
    };

    if let Some(error) = payload.application_error() {
        tracing::warn!(%endpoint, %error, "Movie API reported failure");
        return FetchOutcome::Failed(error);
    }

    let movies = payload.into_results();
    tracing::info!(%endpoint, count = movies.len(), "Movies loaded");

    if let (Some(tracker), Some(top_movie)) = (tracker, movies.first())
        && !query.is_empty()
        && let Err(error) = tracker.record_search(query, top_movie).await
    {
        tracing::warn!(query, %error, "Failed to record search count");
    }

    FetchOutcome::Loaded(movies)
}
