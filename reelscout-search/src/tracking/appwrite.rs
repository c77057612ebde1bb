//! Appwrite document-store tracker for production use.

use async_trait::async_trait;
use reelscout_core::TrackingConfig;
use serde::Deserialize;
use serde_json::json;

use super::{SearchTracker, TrendingSearch};
use crate::errors::MovieSearchError;
use crate::types::MovieSummary;

/// Tracker backed by an Appwrite database collection.
///
/// Each document holds `searchTerm`, `count`, `movie_id` and `poster_url`.
/// Recording a search looks the term up, then either bumps its count or
/// creates the document.
#[derive(Debug, Clone)]
pub struct AppwriteTracker {
    client: reqwest::Client,
    config: TrackingConfig,
    image_base_url: String,
}

/// Response from the list-documents endpoint.
#[derive(Debug, Deserialize)]
struct DocumentList {
    documents: Vec<SearchDocument>,
}

#[derive(Debug, Deserialize)]
struct SearchDocument {
    #[serde(rename = "$id")]
    id: String,
    #[serde(flatten)]
    search: TrendingSearch,
}

impl AppwriteTracker {
    /// Creates a tracker for the collection described by `config`.
    pub fn new(config: TrackingConfig, image_base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), config, image_base_url)
    }

    /// Creates a tracker around an existing client.
    pub fn with_client(
        client: reqwest::Client,
        config: TrackingConfig,
        image_base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            config,
            image_base_url: image_base_url.into(),
        }
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.config.endpoint.trim_end_matches('/'),
            self.config.database_id,
            self.config.collection_id
        )
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header("X-Appwrite-Project", self.config.project_id.as_str())
            .header("X-Appwrite-Key", self.config.api_key.as_str())
    }

    async fn list(&self, queries: &[serde_json::Value]) -> Result<DocumentList, MovieSearchError> {
        let params: Vec<(&str, String)> = queries
            .iter()
            .map(|query| ("queries[]", query.to_string()))
            .collect();

        let response = self
            .request(reqwest::Method::GET, &self.documents_url())
            .query(&params)
            .send()
            .await
            .map_err(|e| tracking_error("list documents", e))?;

        check_status("list documents", &response)?;
        response
            .json()
            .await
            .map_err(|e| tracking_error("decode documents", e))
    }

    async fn send_json(
        &self,
        method: reqwest::Method,
        url: &str,
        body: serde_json::Value,
        action: &str,
    ) -> Result<(), MovieSearchError> {
        let response = self
            .request(method, url)
            .json(&body)
            .send()
            .await
            .map_err(|e| tracking_error(action, e))?;
        check_status(action, &response)
    }
}

fn tracking_error(action: &str, error: impl std::fmt::Display) -> MovieSearchError {
    MovieSearchError::Tracking {
        reason: format!("Appwrite {action} failed: {error}"),
    }
}

fn check_status(action: &str, response: &reqwest::Response) -> Result<(), MovieSearchError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(tracking_error(action, format!("HTTP {}", response.status())))
    }
}

#[async_trait]
impl SearchTracker for AppwriteTracker {
    async fn record_search(&self, term: &str, top_movie: &MovieSummary) -> Result<(), MovieSearchError> {
        let existing = self
            .list(&[json!({"method": "equal", "attribute": "searchTerm", "values": [term]})])
            .await?;

        match existing.documents.into_iter().next() {
            Some(document) => {
                let url = format!("{}/{}", self.documents_url(), document.id);
                let count = document.search.count + 1;
                tracing::debug!(term, count, "Incrementing search count");
                self.send_json(
                    reqwest::Method::PATCH,
                    &url,
                    json!({"data": {"count": count}}),
                    "update document",
                )
                .await
            }
            None => {
                tracing::debug!(term, movie_id = top_movie.id, "Creating search count");
                let document_id = uuid::Uuid::new_v4().simple().to_string();
                self.send_json(
                    reqwest::Method::POST,
                    &self.documents_url(),
                    json!({
                        "documentId": document_id,
                        "data": {
                            "searchTerm": term,
                            "count": 1,
                            "movie_id": top_movie.id,
                            "poster_url": top_movie.poster_url(&self.image_base_url),
                        }
                    }),
                    "create document",
                )
                .await
            }
        }
    }

    async fn trending(&self, limit: usize) -> Result<Vec<TrendingSearch>, MovieSearchError> {
        let list = self
            .list(&[
                json!({"method": "orderDesc", "attribute": "count"}),
                json!({"method": "limit", "values": [limit]}),
            ])
            .await?;

        Ok(list
            .documents
            .into_iter()
            .map(|document| document.search)
            .collect())
    }
}
