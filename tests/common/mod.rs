//! Fake Cloudflare API for integration tests
//!
//! Serves one canned response for every request and records what it received.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use cloudflare_fabric::{CloudflareClient, CloudflareConfig};
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub const TOKEN: &str = "test-token";

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Decoded query pairs, sorted by key
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .query
            .as_deref()
            .unwrap_or_default()
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode(key), decode(value))
            })
            .collect();
        pairs.sort();
        pairs
    }

    pub fn json_body(&self) -> Value {
        serde_json::from_str(&self.body).expect("request body is JSON")
    }
}

fn decode(raw: &str) -> String {
    urlencoding::decode(&raw.replace('+', " "))
        .expect("valid percent-encoding")
        .into_owned()
}

#[derive(Clone)]
struct FakeState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    status: StatusCode,
    content_type: &'static str,
    body: String,
}

pub struct FakeCloudflare {
    pub base: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeCloudflare {
    pub async fn start(status: u16, content_type: &'static str, body: impl Into<String>) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = FakeState {
            requests: requests.clone(),
            status: StatusCode::from_u16(status).expect("valid status"),
            content_type,
            body: body.into(),
        };

        let app = Router::new().fallback(record).with_state(state);
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind fake API");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake API server");
        });

        Self {
            base: format!("http://{}/client/v4", addr),
            requests,
        }
    }

    /// 200 with a successful envelope around `result`
    pub async fn ok(result: Value) -> Self {
        Self::json(200, json!({"success": true, "errors": [], "messages": [], "result": result}))
            .await
    }

    pub async fn json(status: u16, body: Value) -> Self {
        Self::start(status, "application/json", body.to_string()).await
    }

    pub async fn text(status: u16, body: &str) -> Self {
        Self::start(status, "text/plain", body).await
    }

    pub fn config(&self) -> CloudflareConfig {
        CloudflareConfig::new(TOKEN).with_api_base(&self.base)
    }

    pub fn client(&self) -> CloudflareClient {
        CloudflareClient::new(self.config()).expect("client")
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last(&self) -> RecordedRequest {
        self.requests().pop().expect("at least one request")
    }
}

async fn record(
    State(state): State<FakeState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.requests.lock().unwrap().push(RecordedRequest {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    (
        state.status,
        [(header::CONTENT_TYPE, state.content_type)],
        state.body.clone(),
    )
        .into_response()
}
