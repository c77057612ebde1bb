//! Centralized configuration for Reelscout.
//!
//! All tunable parameters and settings are defined here to avoid
//! hard-coded values scattered throughout the codebase. Every value can be
//! overridden from the environment through [`ReelscoutConfig::from_env`].

use std::time::Duration;

use url::Url;

use crate::{ReelscoutError, Result};

/// Central configuration for all Reelscout components.
#[derive(Debug, Clone, Default)]
pub struct ReelscoutConfig {
    pub api: ApiConfig,
    pub debounce: DebounceConfig,
    /// Search-count tracking backend; `None` keeps counts in memory only.
    pub tracking: Option<TrackingConfig>,
}

/// Movie metadata API configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    /// Base URL without trailing slash
    pub base_url: String,
    /// Prefix prepended to poster paths
    pub image_base_url: String,
    /// Bearer credential sent with every request
    pub bearer_token: Option<String>,
    /// Whole-request timeout for the HTTP client
    pub request_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.themoviedb.org/3".to_string(),
            image_base_url: "https://image.tmdb.org/t/p/w500".to_string(),
            bearer_token: None,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Debounce stage configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DebounceConfig {
    /// How long the search text must stay unchanged before a fetch
    pub quiet_interval: Duration,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            quiet_interval: Duration::from_millis(1000),
        }
    }
}

/// Appwrite-compatible document store used for search-count tracking.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingConfig {
    pub endpoint: String,
    pub project_id: String,
    pub database_id: String,
    pub collection_id: String,
    pub api_key: String,
}

impl ReelscoutConfig {
    /// Builds configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// - `ReelscoutError::Configuration` - A URL or duration variable is malformed
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    ///
    /// Unset or blank keys keep their defaults. Tracking is enabled only when
    /// every `APPWRITE_*` key is present.
    ///
    /// # Errors
    ///
    /// - `ReelscoutError::Configuration` - A URL or duration variable is malformed
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(base_url) = get("TMDB_API_BASE_URL") {
            config.api.base_url = validate_url("TMDB_API_BASE_URL", &base_url)?;
        }
        if let Some(image_base) = get("TMDB_IMAGE_BASE_URL") {
            config.api.image_base_url = validate_url("TMDB_IMAGE_BASE_URL", &image_base)?;
        }
        config.api.bearer_token = get("TMDB_API_KEY");

        if let Some(millis) = get("REELSCOUT_DEBOUNCE_MS") {
            let millis: u64 =
                millis
                    .trim()
                    .parse()
                    .map_err(|_| ReelscoutError::Configuration {
                        reason: format!("REELSCOUT_DEBOUNCE_MS must be milliseconds, got '{millis}'"),
                    })?;
            config.debounce.quiet_interval = Duration::from_millis(millis);
        }

        config.tracking = match (
            get("APPWRITE_ENDPOINT"),
            get("APPWRITE_PROJECT_ID"),
            get("APPWRITE_DATABASE_ID"),
            get("APPWRITE_COLLECTION_ID"),
            get("APPWRITE_API_KEY"),
        ) {
            (Some(endpoint), Some(project_id), Some(database_id), Some(collection_id), Some(api_key)) => {
                Some(TrackingConfig {
                    endpoint: validate_url("APPWRITE_ENDPOINT", &endpoint)?,
                    project_id,
                    database_id,
                    collection_id,
                    api_key,
                })
            }
            _ => None,
        };

        Ok(config)
    }
}

/// Parses `value` as an absolute URL and strips any trailing slash.
fn validate_url(key: &str, value: &str) -> Result<String> {
    let trimmed = value.trim().trim_end_matches('/');
    Url::parse(trimmed).map_err(|e| ReelscoutError::Configuration {
        reason: format!("{key} is not a valid URL: {e}"),
    })?;
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = ReelscoutConfig::from_lookup(|_| None).unwrap();

        assert_eq!(config.api.base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.api.bearer_token, None);
        assert_eq!(config.debounce.quiet_interval, Duration::from_millis(1000));
        assert!(config.tracking.is_none());
    }

    #[test]
    fn test_overrides_from_lookup() {
        let config = ReelscoutConfig::from_lookup(lookup_from(&[
            ("TMDB_API_KEY", "secret"),
            ("TMDB_API_BASE_URL", "http://localhost:9000/3/"),
            ("REELSCOUT_DEBOUNCE_MS", "500"),
        ]))
        .unwrap();

        assert_eq!(config.api.bearer_token.as_deref(), Some("secret"));
        assert_eq!(config.api.base_url, "http://localhost:9000/3");
        assert_eq!(config.debounce.quiet_interval, Duration::from_millis(500));
    }

    #[test]
    fn test_blank_token_is_treated_as_missing() {
        let config = ReelscoutConfig::from_lookup(lookup_from(&[("TMDB_API_KEY", "  ")])).unwrap();
        assert_eq!(config.api.bearer_token, None);
    }

    #[test]
    fn test_invalid_debounce_is_rejected() {
        let err = ReelscoutConfig::from_lookup(lookup_from(&[("REELSCOUT_DEBOUNCE_MS", "soon")]))
            .unwrap_err();
        assert!(err.is_user_error());
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let result = ReelscoutConfig::from_lookup(lookup_from(&[("TMDB_API_BASE_URL", "not a url")]));
        assert!(matches!(result, Err(ReelscoutError::Configuration { .. })));
    }

    #[test]
    fn test_tracking_requires_every_key() {
        let partial = ReelscoutConfig::from_lookup(lookup_from(&[
            ("APPWRITE_ENDPOINT", "https://cloud.appwrite.io/v1"),
            ("APPWRITE_PROJECT_ID", "project"),
        ]))
        .unwrap();
        assert!(partial.tracking.is_none());

        let full = ReelscoutConfig::from_lookup(lookup_from(&[
            ("APPWRITE_ENDPOINT", "https://cloud.appwrite.io/v1"),
            ("APPWRITE_PROJECT_ID", "project"),
            ("APPWRITE_DATABASE_ID", "db"),
            ("APPWRITE_COLLECTION_ID", "metrics"),
            ("APPWRITE_API_KEY", "key"),
        ]))
        .unwrap();
        let tracking = full.tracking.unwrap();
        assert_eq!(tracking.endpoint, "https://cloud.appwrite.io/v1");
        assert_eq!(tracking.collection_id, "metrics");
    }
}
