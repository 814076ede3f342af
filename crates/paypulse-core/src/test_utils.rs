//! Test utilities for paypulse-core
//!
//! A mock AI server speaking just enough of the Gemini and Ollama HTTP APIs
//! for backend tests and CLI development. Every generation request is
//! recorded and answered with the configured reply.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::sync::oneshot;

/// How the mock server answers generation requests
#[derive(Debug, Clone)]
pub enum MockReply {
    /// 200 with this model text, wrapped in the backend's envelope
    Text(String),
    /// Error status with a raw body
    Status { status: u16, body: String },
    /// 200 with this raw body, bypassing the envelope
    Raw(String),
}

impl MockReply {
    pub fn text(text: &str) -> Self {
        Self::Text(text.to_string())
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self::Status {
            status,
            body: body.to_string(),
        }
    }

    pub fn raw(body: &str) -> Self {
        Self::Raw(body.to_string())
    }
}

/// A generation request received by the mock server
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    /// `x-goog-api-key` header, if sent
    pub api_key: Option<String>,
    /// JSON body (`Null` if it was not JSON)
    pub body: Value,
}

#[derive(Default)]
struct MockState {
    reply: Option<MockReply>,
    requests: Vec<RecordedRequest>,
}

type SharedState = Arc<Mutex<MockState>>;

/// Mock Gemini/Ollama server for tests
pub struct MockAiServer {
    addr: SocketAddr,
    state: SharedState,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockAiServer {
    /// Start the mock server on an available port
    pub async fn start(reply: MockReply) -> Self {
        let state: SharedState = Arc::new(Mutex::new(MockState {
            reply: Some(reply),
            requests: Vec::new(),
        }));

        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Change the reply for subsequent requests
    pub fn set_reply(&self, reply: MockReply) {
        self.state.lock().unwrap().reply = Some(reply);
    }

    /// Generation requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockAiServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn handle(
    State(state): State<SharedState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();

    if method == Method::GET {
        return match path.as_str() {
            "/api/tags" => Json(json!({
                "models": [{ "name": "llama3.2:latest", "size": 4_000_000_000u64 }]
            }))
            .into_response(),
            p if p.starts_with("/v1beta/models/") => Json(json!({
                "name": p.trim_start_matches("/v1beta/"),
                "supportedGenerationMethods": ["generateContent"]
            }))
            .into_response(),
            _ => StatusCode::NOT_FOUND.into_response(),
        };
    }

    let is_gemini = path.starts_with("/v1beta/models/") && path.ends_with(":generateContent");
    let is_ollama = path == "/api/generate";
    if method != Method::POST || !(is_gemini || is_ollama) {
        return StatusCode::NOT_FOUND.into_response();
    }

    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let reply = {
        let mut state = state.lock().unwrap();
        state.requests.push(RecordedRequest {
            path: path.clone(),
            api_key: headers
                .get("x-goog-api-key")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            body: body.clone(),
        });
        state.reply.clone()
    };

    match reply {
        Some(MockReply::Text(text)) if is_gemini => Json(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }]
        }))
        .into_response(),
        Some(MockReply::Text(text)) => Json(json!({
            "model": body["model"],
            "response": text,
            "done": true
        }))
        .into_response(),
        Some(MockReply::Status { status, body }) => (
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body,
        )
            .into_response(),
        Some(MockReply::Raw(raw)) => (
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            raw,
        )
            .into_response(),
        None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}
