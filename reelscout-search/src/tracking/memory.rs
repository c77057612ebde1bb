//! In-process tracker for demo mode and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use reelscout_core::ApiConfig;

use super::{SearchTracker, TrendingSearch};
use crate::errors::MovieSearchError;
use crate::types::MovieSummary;

/// Tracker keeping counters in memory for the lifetime of the process.
///
/// Also records every `(term, top movie id)` call so tests can assert on the
/// exact notifications a fetch produced.
#[derive(Debug)]
pub struct InMemoryTracker {
    image_base_url: String,
    counters: Mutex<HashMap<String, TrendingSearch>>,
    calls: Mutex<Vec<(String, u64)>>,
    fail_with: Mutex<Option<String>>,
}

impl Default for InMemoryTracker {
    fn default() -> Self {
        Self::new(ApiConfig::default().image_base_url)
    }
}

impl InMemoryTracker {
    /// Creates an empty tracker storing posters under `image_base_url`.
    pub fn new(image_base_url: impl Into<String>) -> Self {
        Self {
            image_base_url: image_base_url.into(),
            counters: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            fail_with: Mutex::new(None),
        }
    }

    /// Makes every following `record_search` fail with `reason`.
    pub fn fail_with(&self, reason: impl Into<String>) {
        *self.fail_with.lock() = Some(reason.into());
    }

    /// Every `record_search` call as `(term, top movie id)`, in call order.
    pub fn calls(&self) -> Vec<(String, u64)> {
        self.calls.lock().clone()
    }

    /// Current counter for `term`.
    pub fn count(&self, term: &str) -> u64 {
        self.counters
            .lock()
            .get(term)
            .map_or(0, |entry| entry.count)
    }
}

#[async_trait]
impl SearchTracker for InMemoryTracker {
    async fn record_search(&self, term: &str, top_movie: &MovieSummary) -> Result<(), MovieSearchError> {
        self.calls.lock().push((term.to_string(), top_movie.id));

        if let Some(reason) = self.fail_with.lock().clone() {
            return Err(MovieSearchError::Tracking { reason });
        }

        self.counters
            .lock()
            .entry(term.to_string())
            .and_modify(|entry| entry.count += 1)
            .or_insert_with(|| TrendingSearch {
                search_term: term.to_string(),
                count: 1,
                movie_id: top_movie.id,
                poster_url: top_movie.poster_url(&self.image_base_url),
            });
        Ok(())
    }

    async fn trending(&self, limit: usize) -> Result<Vec<TrendingSearch>, MovieSearchError> {
        let mut entries: Vec<TrendingSearch> = self.counters.lock().values().cloned().collect();
        entries.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.search_term.cmp(&b.search_term))
        });
        entries.truncate(limit);
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::mock::sample_movie;

    #[tokio::test]
    async fn test_counts_accumulate_per_term() {
        let tracker = InMemoryTracker::new("https://img");
        let batman = sample_movie(268, "Batman");

        tracker.record_search("batman", &batman).await.unwrap();
        tracker.record_search("batman", &sample_movie(1, "Other")).await.unwrap();
        tracker.record_search("matrix", &sample_movie(603, "The Matrix")).await.unwrap();

        assert_eq!(tracker.count("batman"), 2);
        assert_eq!(tracker.count("matrix"), 1);
        assert_eq!(tracker.count("unknown"), 0);

        let trending = tracker.trending(10).await.unwrap();
        assert_eq!(trending[0].search_term, "batman");
        // First top result sticks.
        assert_eq!(trending[0].movie_id, 268);
        assert_eq!(trending[0].poster_url.as_deref(), Some("https://img/268.jpg"));
    }

    #[tokio::test]
    async fn test_trending_respects_limit() {
        let tracker = InMemoryTracker::default();
        for term in ["a", "b", "c"] {
            tracker.record_search(term, &sample_movie(1, "x")).await.unwrap();
        }

        let trending = tracker.trending(2).await.unwrap();
        let terms: Vec<&str> = trending.iter().map(|t| t.search_term.as_str()).collect();
        assert_eq!(terms, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_failure_mode_still_records_call() {
        let tracker = InMemoryTracker::default();
        tracker.fail_with("backend down");

        let err = tracker
            .record_search("dune", &sample_movie(438631, "Dune"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            MovieSearchError::Tracking {
                reason: "backend down".to_string()
            }
        );
        assert_eq!(tracker.calls(), vec![("dune".to_string(), 438631)]);
        assert_eq!(tracker.count("dune"), 0);
    }
}
