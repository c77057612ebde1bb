//! Data types for movie search functionality.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{GENERIC_API_ERROR, MovieSearchError};

/// Summary of one movie as returned by list endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    /// Stable movie identifier; used as the render key
    pub id: u64,
    /// Display title
    pub title: String,
    /// Poster path relative to the image base URL
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Average user rating (0.0-10.0)
    #[serde(default)]
    pub vote_average: Option<f64>,
    /// ISO 639-1 original language code
    #[serde(default)]
    pub original_language: Option<String>,
    /// Release date as `YYYY-MM-DD`, possibly empty
    #[serde(default)]
    pub release_date: Option<String>,
}

impl MovieSummary {
    /// Full poster URL, or `None` when the movie has no poster.
    pub fn poster_url(&self, image_base_url: &str) -> Option<String> {
        self.poster_path
            .as_deref()
            .filter(|path| !path.is_empty())
            .map(|path| format!("{}{}", image_base_url.trim_end_matches('/'), path))
    }

    /// Release year parsed from the release date.
    pub fn release_year(&self) -> Option<i32> {
        let date = self.release_date.as_deref()?.trim();
        if date.is_empty() {
            return None;
        }

        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map(|parsed| parsed.year())
            .ok()
            .or_else(|| date.split('-').next().and_then(|year| year.parse().ok()))
    }
}

/// Body of a list response, before application-level failure checks.
///
/// Both failure shapes seen in the wild are accepted: the `response`/`error`
/// pair (in either capitalisation) and TMDB's own `success`/`status_message`
/// pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieListPayload {
    /// Result page; absent on failures
    #[serde(default)]
    pub results: Option<Vec<MovieSummary>>,
    /// One-based page index
    #[serde(default)]
    pub page: Option<u32>,
    /// Total results across every page
    #[serde(default)]
    pub total_results: Option<u64>,
    /// Number of pages available
    #[serde(default)]
    pub total_pages: Option<u32>,
    /// `"False"` when the request failed; accepted as `response` or `Response`
    #[serde(
        rename = "Response",
        alias = "response",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub response: Option<String>,
    /// Failure message paired with the response flag
    #[serde(rename = "Error", alias = "error", default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// `false` when the request failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    /// Failure message paired with `success`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
}

impl MovieListPayload {
    /// Payload carrying a successful result page.
    pub fn with_results(results: Vec<MovieSummary>) -> Self {
        let total = results.len() as u64;
        Self {
            results: Some(results),
            page: Some(1),
            total_results: Some(total),
            total_pages: Some(1),
            ..Self::default()
        }
    }

    /// Payload flagging an application-level failure.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            response: Some("False".to_string()),
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Returns the application-level failure, if the payload reports one.
    pub fn application_error(&self) -> Option<MovieSearchError> {
        let flagged_false = self
            .response
            .as_deref()
            .is_some_and(|flag| flag.eq_ignore_ascii_case("false"));
        let unsuccessful = self.success == Some(false);

        if !flagged_false && !unsuccessful {
            return None;
        }

        let message = self
            .error
            .clone()
            .or_else(|| self.status_message.clone())
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| GENERIC_API_ERROR.to_string());

        Some(MovieSearchError::Api { message })
    }

    /// Consumes the payload and returns its results, empty when absent.
    pub fn into_results(self) -> Vec<MovieSummary> {
        self.results.unwrap_or_default()
    }
}
