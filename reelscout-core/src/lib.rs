//! Reelscout Core - Shared building blocks for movie discovery
//!
//! This crate provides the pieces of the search pipeline that know nothing
//! about movies: central configuration, tracing setup, the debounce stage
//! and request sequencing for last-issued-wins fetch ordering.

pub mod config;
pub mod debounce;
pub mod sequence;
pub mod tracing_setup;

// Re-export main types for convenient access
pub use config::{ApiConfig, DebounceConfig, ReelscoutConfig, TrackingConfig};
pub use debounce::Debouncer;
pub use sequence::{RequestId, RequestSequence};

/// Core errors that can bubble up from any Reelscout subsystem.
///
/// High-level error types representing failures in core functionality.
#[derive(Debug, thiserror::Error)]
pub enum ReelscoutError {
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("Search error: {reason}")]
    Search { reason: String },

    #[error("Tracing setup error: {reason}")]
    Tracing { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReelscoutError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            ReelscoutError::Configuration { reason } => format!("Configuration error: {reason}"),
            ReelscoutError::Search { reason } => reason.clone(),
            ReelscoutError::Tracing { .. } => "Could not initialize logging".to_string(),
            ReelscoutError::Io(_) => "File system error occurred".to_string(),
        }
    }

    /// Checks if this error is due to user input validation.
    pub fn is_user_error(&self) -> bool {
        matches!(self, ReelscoutError::Configuration { .. })
    }

    /// Wraps any displayable search failure.
    pub fn from_search_error(error: impl std::fmt::Display) -> Self {
        ReelscoutError::Search {
            reason: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReelscoutError>;
