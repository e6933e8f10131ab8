//! Local stand-ins for the Telegram and Bark endpoints.

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
};
use serde_json::Value;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
pub struct Hit {
    pub path: String,
    pub content_type: String,
    pub body: Value,
}

pub type Hits = Arc<Mutex<Vec<Hit>>>;

#[derive(Clone)]
struct Endpoint {
    status: StatusCode,
    hits: Hits,
}

async fn record(State(endpoint): State<Endpoint>, uri: Uri, headers: HeaderMap, body: Bytes) -> StatusCode {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    endpoint.hits.lock().await.push(Hit {
        path: uri.path().to_string(),
        content_type,
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });
    endpoint.status
}

/// Serves every request with `status`, recording what was sent. Returns the base URL.
pub async fn spawn_endpoint(status: StatusCode) -> (String, Hits) {
    let hits: Hits = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new().fallback(record).with_state(Endpoint {
        status,
        hits: hits.clone(),
    });
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), hits)
}

/// A URL nothing listens on.
pub async fn closed_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/push")
}
