//! Error types for movie search functionality.

use thiserror::Error;

/// Message shown for every transport-class failure.
pub const GENERIC_FETCH_ERROR: &str = "Error fetching movies. Please try again later.";

/// Fallback when the API reports a failure without a message.
pub const GENERIC_API_ERROR: &str = "Failed to fetch movies";

/// Errors that can occur during movie search operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MovieSearchError {
    /// The API answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}")]
    HttpStatus {
        /// Numeric status code
        status: u16,
        /// URL that was requested
        url: String,
    },

    /// Network communication failed before a response arrived.
    #[error("Network error: {reason}")]
    Network {
        /// The reason for the network error
        reason: String,
    },

    /// Response body could not be decoded.
    #[error("Parse error: {reason}")]
    Parse {
        /// The reason for the parse error
        reason: String,
    },

    /// A 2xx response whose payload flags an application-level failure.
    #[error("API reported failure: {message}")]
    Api {
        /// Message taken from the payload
        message: String,
    },

    /// The search-count tracking backend rejected or failed a call.
    #[error("Tracking error: {reason}")]
    Tracking {
        /// The reason for the tracking failure
        reason: String,
    },

    /// The search cycle task has stopped and no longer accepts commands.
    #[error("Search cycle has shut down")]
    CycleClosed,
}

impl MovieSearchError {
    /// Message suitable for showing in place of the result list.
    ///
    /// Transport-class failures collapse to one generic message; API-reported
    /// failures keep the payload's own message.
    pub fn user_message(&self) -> String {
        match self {
            MovieSearchError::Api { message } => message.clone(),
            _ => GENERIC_FETCH_ERROR.to_string(),
        }
    }

    /// True for failures reported inside a successful HTTP response.
    pub fn is_application_error(&self) -> bool {
        matches!(self, MovieSearchError::Api { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_errors_share_generic_message() {
        let errors = [
            MovieSearchError::HttpStatus {
                status: 401,
                url: "https://example.test".to_string(),
            },
            MovieSearchError::Network {
                reason: "connection refused".to_string(),
            },
            MovieSearchError::Parse {
                reason: "expected value".to_string(),
            },
        ];

        for error in errors {
            assert_eq!(error.user_message(), GENERIC_FETCH_ERROR);
            assert!(!error.is_application_error());
        }
    }

    #[test]
    fn test_api_error_keeps_payload_message() {
        let error = MovieSearchError::Api {
            message: "Invalid API key".to_string(),
        };
        assert_eq!(error.user_message(), "Invalid API key");
        assert!(error.is_application_error());
    }
}
