//! Endpoint selection for the movie metadata API.

use std::fmt;

/// Sort order used by the discover listing.
pub const DISCOVER_SORT: &str = "popularity.desc";

/// The two list operations the search cycle can call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MovieEndpoint {
    /// Free-text search
    Search {
        /// Raw, unencoded query text
        query: String,
    },
    /// Popularity-ordered listing used when there is no search text
    Discover,
}

impl MovieEndpoint {
    /// Chooses search for non-empty text and discover for empty text.
    ///
    /// Whitespace-only text counts as non-empty and is searched as typed.
    pub fn for_query(query: &str) -> Self {
        if query.is_empty() {
            MovieEndpoint::Discover
        } else {
            MovieEndpoint::Search {
                query: query.to_string(),
            }
        }
    }

    /// Path and query string relative to the API base URL.
    pub fn path_and_query(&self) -> String {
        match self {
            MovieEndpoint::Search { query } => {
                format!("/search/movie?query={}", urlencoding::encode(query))
            }
            MovieEndpoint::Discover => format!("/discover/movie?sort_by={DISCOVER_SORT}"),
        }
    }

    /// Absolute URL under `base_url`.
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path_and_query())
    }

    /// The search text, when this is a search.
    pub fn query(&self) -> Option<&str> {
        match self {
            MovieEndpoint::Search { query } => Some(query),
            MovieEndpoint::Discover => None,
        }
    }
}

impl fmt::Display for MovieEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MovieEndpoint::Search { query } => write!(f, "search '{query}'"),
            MovieEndpoint::Discover => write!(f, "discover"),
        }
    }
}
