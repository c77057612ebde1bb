//! Scripted HTTP server for provider and tracker tests.

use std::collections::VecDeque;
use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::IntoResponse;
use parking_lot::Mutex;
use tokio::net::TcpListener;

/// One request as seen by the server.
#[derive(Debug, Clone)]
pub(crate) struct CapturedRequest {
    pub method: Method,
    pub path: String,
    /// Raw query string, still percent-encoded
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: String,
}

impl CapturedRequest {
    /// Header value as text, if present.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Body decoded as JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

#[derive(Debug, Clone, Default)]
struct Script {
    responses: Arc<Mutex<VecDeque<(StatusCode, String)>>>,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

/// Running server answering every request with the next scripted response.
pub(crate) struct TestServer {
    base_url: String,
    script: Script,
}

impl TestServer {
    /// `http://127.0.0.1:<port>`
    pub fn url(&self) -> &str {
        &self.base_url
    }

    /// Requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.script.requests.lock().clone()
    }
}

/// Starts a server on an ephemeral port. Once the script runs out every
/// request gets a 500.
pub(crate) async fn serve(responses: Vec<(StatusCode, &str)>) -> TestServer {
    let script = Script {
        responses: Arc::new(Mutex::new(
            responses
                .into_iter()
                .map(|(status, body)| (status, body.to_string()))
                .collect(),
        )),
        ..Script::default()
    };

    let app = Router::new().fallback(respond).with_state(script.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    TestServer {
        base_url: format!("http://{addr}"),
        script,
    }
}

async fn respond(
    State(script): State<Script>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    script.requests.lock().push(CapturedRequest {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers,
        body,
    });

    let (status, body) = script
        .responses
        .lock()
        .pop_front()
        .unwrap_or((StatusCode::INTERNAL_SERVER_ERROR, "{}".to_string()));
    (status, [(header::CONTENT_TYPE, "application/json")], body)
}
