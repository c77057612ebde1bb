//! Mock provider implementation for testing.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::MovieApi;
use crate::endpoint::MovieEndpoint;
use crate::errors::MovieSearchError;
use crate::types::{MovieListPayload, MovieSummary};

#[derive(Debug, Clone)]
struct Scripted {
    response: Result<MovieListPayload, MovieSearchError>,
    delay: Duration,
}

/// Scripted provider for tests.
///
/// Answers each endpoint with a configured payload or error, optionally after
/// a delay, and records every endpoint it was asked for. Unscripted endpoints
/// answer with an empty result page.
#[derive(Debug, Default)]
pub struct MockProvider {
    scripts: Mutex<HashMap<MovieEndpoint, Scripted>>,
    requests: Mutex<Vec<MovieEndpoint>>,
}

impl MockProvider {
    /// Creates a mock with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts `endpoint` to answer with `response`.
    pub fn with_response(
        self,
        endpoint: MovieEndpoint,
        response: Result<MovieListPayload, MovieSearchError>,
    ) -> Self {
        self.scripts
            .lock()
            .entry(endpoint)
            .and_modify(|scripted| scripted.response = response.clone())
            .or_insert(Scripted {
                response,
                delay: Duration::ZERO,
            });
        self
    }

    /// Scripts `endpoint` to answer with a page of `movies`.
    pub fn with_movies(self, endpoint: MovieEndpoint, movies: Vec<MovieSummary>) -> Self {
        self.with_response(endpoint, Ok(MovieListPayload::with_results(movies)))
    }

    /// Delays every answer for `endpoint` by `delay`.
    pub fn with_delay(self, endpoint: MovieEndpoint, delay: Duration) -> Self {
        self.scripts
            .lock()
            .entry(endpoint)
            .and_modify(|scripted| scripted.delay = delay)
            .or_insert(Scripted {
                response: Ok(MovieListPayload::with_results(Vec::new())),
                delay,
            });
        self
    }

    /// Every endpoint requested so far, in call order.
    pub fn requests(&self) -> Vec<MovieEndpoint> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl MovieApi for MockProvider {
    async fn fetch(&self, endpoint: &MovieEndpoint) -> Result<MovieListPayload, MovieSearchError> {
        self.requests.lock().push(endpoint.clone());

        let scripted = self.scripts.lock().get(endpoint).cloned();
        match scripted {
            Some(scripted) => {
                if !scripted.delay.is_zero() {
                    tokio::time::sleep(scripted.delay).await;
                }
                scripted.response
            }
            None => Ok(MovieListPayload::with_results(Vec::new())),
        }
    }
}

/// Builds a minimal movie for tests.
pub fn sample_movie(id: u64, title: &str) -> MovieSummary {
    MovieSummary {
        id,
        title: title.to_string(),
        poster_path: Some(format!("/{id}.jpg")),
        vote_average: Some(7.5),
        original_language: Some("en".to_string()),
        release_date: Some("2020-01-01".to_string()),
    }
}
