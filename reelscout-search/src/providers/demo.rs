//! Demo provider implementation for offline use.

use async_trait::async_trait;
use strsim::normalized_levenshtein;

use super::MovieApi;
use crate::endpoint::MovieEndpoint;
use crate::errors::MovieSearchError;
use crate::types::{MovieListPayload, MovieSummary};

/// Minimum title similarity for a fuzzy match.
const FUZZY_THRESHOLD: f64 = 0.6;

/// (id, title, poster, rating, language, release date, popularity)
const CATALOGUE: &[(u64, &str, &str, f64, &str, &str, f64)] = &[
    (155, "The Dark Knight", "/qJ2tW6WMUDux911r6m7haRef0WH.jpg", 8.5, "en", "2008-07-16", 98.1),
    (27205, "Inception", "/oYuLEt3zVCKq57qu2F8dT7NIa6f.jpg", 8.4, "en", "2010-07-15", 91.7),
    (157336, "Interstellar", "/gEU2QniE6E77NI6lCU6MxlNBvIx.jpg", 8.4, "en", "2014-11-05", 89.3),
    (603, "The Matrix", "/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg", 8.2, "en", "1999-03-30", 80.4),
    (129, "Spirited Away", "/39wmItIWsg5sZMyRUHLkWBcuVCM.jpg", 8.5, "ja", "2001-07-20", 76.9),
    (496243, "Parasite", "/7IiTTgloJzvGI1TAYymCfbfl3vT.jpg", 8.5, "ko", "2019-05-30", 72.2),
    (238, "The Godfather", "/3bhkrj58Vtu7enYsRolD1fZdja1.jpg", 8.7, "en", "1972-03-14", 70.5),
    (680, "Pulp Fiction", "/d5iIlFn5s0ImszYzBPb8JPIfbXD.jpg", 8.5, "en", "1994-09-10", 65.8),
    (49026, "The Dark Knight Rises", "/hr0L2aueqlP2BYUblTTjmtn0hw4.jpg", 7.8, "en", "2012-07-17", 61.0),
    (194, "Amélie", "/nSxDa3M9aMvGVLoItzWTepQ5h5d.jpg", 7.9, "fr", "2001-04-25", 40.2),
];

/// Demo provider returning a built-in catalogue without network access.
///
/// Discover lists the catalogue by popularity. Search matches titles by
/// case-insensitive substring, or fuzzily so that small typos still hit.
#[derive(Debug, Default)]
pub struct DemoProvider;

impl DemoProvider {
    /// Creates a new demo provider.
    pub fn new() -> Self {
        Self
    }

    fn catalogue() -> Vec<(MovieSummary, f64)> {
        CATALOGUE
            .iter()
            .map(|&(id, title, poster, rating, language, released, popularity)| {
                let movie = MovieSummary {
                    id,
                    title: title.to_string(),
                    poster_path: Some(poster.to_string()),
                    vote_average: Some(rating),
                    original_language: Some(language.to_string()),
                    release_date: Some(released.to_string()),
                };
                (movie, popularity)
            })
            .collect()
    }

    /// Catalogue entries matching `query`, best popularity first.
    fn search(query: &str) -> Vec<MovieSummary> {
        let query = query.trim().to_lowercase();
        let mut matches: Vec<(MovieSummary, f64)> = Self::catalogue()
            .into_iter()
            .filter(|(movie, _)| {
                let title = movie.title.to_lowercase();
                title.contains(&query) || normalized_levenshtein(&query, &title) >= FUZZY_THRESHOLD
            })
            .collect();

        matches.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        matches.into_iter().map(|(movie, _)| movie).collect()
    }

    fn discover() -> Vec<MovieSummary> {
        let mut all = Self::catalogue();
        all.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        all.into_iter().map(|(movie, _)| movie).collect()
    }
}

#[async_trait]
impl MovieApi for DemoProvider {
    async fn fetch(&self, endpoint: &MovieEndpoint) -> Result<MovieListPayload, MovieSearchError> {
        let results = match endpoint {
            MovieEndpoint::Search { query } => Self::search(query),
            MovieEndpoint::Discover => Self::discover(),
        };
        Ok(MovieListPayload::with_results(results))
    }
}
