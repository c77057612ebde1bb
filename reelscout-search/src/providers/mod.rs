//! Provider implementations for the movie metadata API.

use async_trait::async_trait;

use crate::endpoint::MovieEndpoint;
use crate::errors::MovieSearchError;
use crate::types::MovieListPayload;

pub mod demo;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod tmdb;

pub use demo::DemoProvider;
#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockProvider;
pub use tmdb::TmdbProvider;

/// Trait for movie metadata backends.
///
/// One call is one HTTP exchange: implementations return the decoded payload
/// of a successful response and leave application-level failure detection to
/// the fetch stage.
#[async_trait]
pub trait MovieApi: Send + Sync + std::fmt::Debug {
    /// Fetches one list page from `endpoint`.
    ///
    /// # Errors
    /// - `MovieSearchError::HttpStatus` - Non-success HTTP status
    /// - `MovieSearchError::Network` - Transport failure
    /// - `MovieSearchError::Parse` - Body is not a valid list payload
    async fn fetch(&self, endpoint: &MovieEndpoint) -> Result<MovieListPayload, MovieSearchError>;
}
