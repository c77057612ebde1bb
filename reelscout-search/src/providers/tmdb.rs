//! TMDB-compatible HTTP provider for production use.

use async_trait::async_trait;
use reelscout_core::ApiConfig;
use reqwest::header::ACCEPT;

use super::MovieApi;
use crate::endpoint::MovieEndpoint;
use crate::errors::MovieSearchError;
use crate::types::MovieListPayload;

/// HTTP provider for a TMDB-compatible movie metadata API.
///
/// Sends `accept: application/json` and, when a credential is configured,
/// a bearer `Authorization` header with every request. A missing credential
/// is not an error here: the API rejects the request and the caller sees an
/// HTTP status failure.
#[derive(Debug, Clone)]
pub struct TmdbProvider {
    client: reqwest::Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl TmdbProvider {
    /// Creates a provider with a client built from `config`.
    ///
    /// # Errors
    /// - `MovieSearchError::Network` - HTTP client could not be constructed
    pub fn new(config: &ApiConfig) -> Result<Self, MovieSearchError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| MovieSearchError::Network {
                reason: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self::with_client(client, config))
    }

    /// Creates a provider around an existing client.
    pub fn with_client(client: reqwest::Client, config: &ApiConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            bearer_token: config.bearer_token.clone(),
        }
    }
}

#[async_trait]
impl MovieApi for TmdbProvider {
    async fn fetch(&self, endpoint: &MovieEndpoint) -> Result<MovieListPayload, MovieSearchError> {
        let url = endpoint.url(&self.base_url);
        tracing::debug!(%endpoint, %url, "Requesting movie list");

        let mut request = self.client.get(&url).header(ACCEPT, "application/json");
        if let Some(ref token) = self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| MovieSearchError::Network {
                reason: format!("Movie API request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MovieSearchError::HttpStatus {
                status: status.as_u16(),
                url,
            });
        }

        response
            .json::<MovieListPayload>()
            .await
            .map_err(|e| MovieSearchError::Parse {
                reason: format!("Movie API JSON parsing failed: {e}"),
            })
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use tokio::net::TcpListener;

    use super::*;
    use crate::test_server::serve;

    fn provider(server: &str, token: Option<&str>) -> TmdbProvider {
        let config = ApiConfig {
            base_url: format!("{server}/3"),
            bearer_token: token.map(str::to_string),
            ..ApiConfig::default()
        };
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        TmdbProvider::with_client(client, &config)
    }

    #[tokio::test]
    async fn test_search_request_shape() {
        let server = serve(vec![(
            StatusCode::OK,
            r#"{"page":1,"results":[{"id":155,"title":"The Dark Knight"}],"total_pages":1,"total_results":1}"#,
        )])
        .await;

        let payload = provider(server.url(), Some("secret"))
            .fetch(&MovieEndpoint::for_query("the dark knight"))
            .await
            .unwrap();
        let requests = server.requests();

        assert_eq!(requests[0].method, Method::GET);
        assert_eq!(requests[0].path, "/3/search/movie");
        assert_eq!(requests[0].query.as_deref(), Some("query=the%20dark%20knight"));
        assert_eq!(requests[0].header("authorization"), Some("Bearer secret"));
        assert_eq!(requests[0].header("accept"), Some("application/json"));
        assert_eq!(payload.into_results()[0].title, "The Dark Knight");
    }

    #[tokio::test]
    async fn test_missing_token_sends_no_authorization() {
        let server = serve(vec![(StatusCode::OK, r#"{"results":[]}"#)]).await;

        provider(server.url(), None)
            .fetch(&MovieEndpoint::Discover)
            .await
            .unwrap();
        let requests = server.requests();

        assert_eq!(requests[0].path, "/3/discover/movie");
        assert_eq!(requests[0].query.as_deref(), Some("sort_by=popularity.desc"));
        assert_eq!(requests[0].header("authorization"), None);
    }

    #[tokio::test]
    async fn test_non_success_status_is_http_error() {
        let server = serve(vec![(
            StatusCode::UNAUTHORIZED,
            r#"{"success":false,"status_message":"Invalid API key"}"#,
        )])
        .await;

        let err = provider(server.url(), None)
            .fetch(&MovieEndpoint::Discover)
            .await
            .unwrap_err();

        assert!(matches!(err, MovieSearchError::HttpStatus { status: 401, .. }));
        assert_eq!(err.user_message(), crate::errors::GENERIC_FETCH_ERROR);
        assert_eq!(server.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_body_is_parse_error() {
        let server = serve(vec![(StatusCode::OK, "<html>oops</html>")]).await;

        let err = provider(server.url(), None)
            .fetch(&MovieEndpoint::Discover)
            .await
            .unwrap_err();

        assert!(matches!(err, MovieSearchError::Parse { .. }));
    }

    #[tokio::test]
    async fn test_lowercase_failure_body_decodes_with_flag() {
        let server = serve(vec![(
            StatusCode::OK,
            r#"{"response":"False","error":"Movie not found!"}"#,
        )])
        .await;

        let payload = provider(server.url(), None)
            .fetch(&MovieEndpoint::for_query("zzzz"))
            .await
            .unwrap();

        assert_eq!(
            payload.application_error(),
            Some(MovieSearchError::Api {
                message: "Movie not found!".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = provider(&format!("http://{addr}"), None)
            .fetch(&MovieEndpoint::Discover)
            .await
            .unwrap_err();

        assert!(matches!(err, MovieSearchError::Network { .. }));
    }
}
