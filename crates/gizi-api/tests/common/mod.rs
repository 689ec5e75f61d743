//! Test utilities for gizi-api
//!
//! Runs the real router on an ephemeral port, backed by the in-memory store
//! and a fake predictor that records every call.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use gizi_api::{create_router, AppState};
use gizi_core::TokenResolver;
use gizi_predict::PredictorClient;
use gizi_store::MemoryAnalysisStore;
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub const SECRET: &str = "test-secret";

/// A server that shuts down when dropped
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl TestServer {
    pub async fn start(router: Router) -> Self {
        // Bind to any available port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// What the fake predictor answers
#[derive(Clone)]
pub struct PredictorReply {
    pub status: StatusCode,
    pub body: Value,
    pub delay: Option<Duration>,
}

impl PredictorReply {
    pub fn label(label: &str) -> Self {
        Self {
            status: StatusCode::OK,
            body: json!({ "status_gizi": label }),
            delay: None,
        }
    }

    pub fn body(body: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body,
            delay: None,
        }
    }

    pub fn failure(status: StatusCode) -> Self {
        Self {
            status,
            body: json!({ "detail": "model unavailable" }),
            delay: None,
        }
    }
}

#[derive(Default)]
struct PredictorLog {
    calls: AtomicUsize,
    last_request: Mutex<Option<Value>>,
}

#[derive(Clone)]
struct FakePredictorState {
    reply: Arc<Mutex<PredictorReply>>,
    log: Arc<PredictorLog>,
}

async fn predict(
    State(state): State<FakePredictorState>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.log.calls.fetch_add(1, Ordering::SeqCst);
    *state.log.last_request.lock().unwrap() = Some(body);

    let reply = state.reply.lock().unwrap().clone();
    if let Some(delay) = reply.delay {
        tokio::time::sleep(delay).await;
    }
    (reply.status, Json(reply.body))
}

/// Stand-in for the external `/predict` service
pub struct FakePredictor {
    server: TestServer,
    state: FakePredictorState,
}

impl FakePredictor {
    pub async fn start(reply: PredictorReply) -> Self {
        let state = FakePredictorState {
            reply: Arc::new(Mutex::new(reply)),
            log: Arc::new(PredictorLog::default()),
        };
        let router = Router::new()
            .route("/predict", post(predict))
            .with_state(state.clone());

        Self {
            server: TestServer::start(router).await,
            state,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.server.addr)
    }

    pub fn set_reply(&self, reply: PredictorReply) {
        *self.state.reply.lock().unwrap() = reply;
    }

    pub fn calls(&self) -> usize {
        self.state.log.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<Value> {
        self.state.log.last_request.lock().unwrap().clone()
    }
}

/// Full API under test
pub struct Harness {
    pub server: TestServer,
    pub predictor: FakePredictor,
    pub store: Arc<MemoryAnalysisStore>,
    pub tokens: TokenResolver,
    pub http: reqwest::Client,
}

impl Harness {
    pub async fn new(reply: PredictorReply) -> Self {
        Self::build(reply, false, Duration::from_secs(5)).await
    }

    pub async fn with_ownership_check(reply: PredictorReply) -> Self {
        Self::build(reply, true, Duration::from_secs(5)).await
    }

    pub async fn with_predictor_timeout(reply: PredictorReply, timeout: Duration) -> Self {
        Self::build(reply, false, timeout).await
    }

    async fn build(reply: PredictorReply, enforce_ownership: bool, timeout: Duration) -> Self {
        let predictor = FakePredictor::start(reply).await;
        let store = Arc::new(MemoryAnalysisStore::new());
        let tokens = TokenResolver::new(SECRET);

        let client =
            PredictorClient::with_config(&predictor.base_url(), timeout, Duration::from_secs(2))
                .unwrap();
        let state = AppState::new(store.clone(), client, tokens.clone())
            .with_ownership_check(enforce_ownership);

        Self {
            server: TestServer::start(create_router(state)).await,
            predictor,
            store,
            tokens,
            http: reqwest::Client::new(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        self.server.url(path)
    }

    /// Register a user and return (id, bearer header value)
    pub fn user(&self, name: &str) -> (i32, String) {
        let user = self
            .store
            .insert_user(name, &format!("{}@example.com", name.to_lowercase()));
        let token = self.tokens.issue(user.id).unwrap();
        (user.id, format!("Bearer {}", token))
    }

    pub async fn post_analysis(&self, auth: Option<&str>, body: Value) -> (StatusCode, Value) {
        let mut request = self.http.post(self.url("/analyst")).json(&body);
        if let Some(auth) = auth {
            request = request.header("Authorization", auth);
        }
        read(request.send().await.unwrap()).await
    }

    /// POST an arbitrary body, sent as JSON content without encoding
    pub async fn post_raw(&self, auth: Option<&str>, body: &'static str) -> (StatusCode, Value) {
        let mut request = self
            .http
            .post(self.url("/analyst"))
            .header("Content-Type", "application/json")
            .body(body);
        if let Some(auth) = auth {
            request = request.header("Authorization", auth);
        }
        read(request.send().await.unwrap()).await
    }

    pub async fn get_history(&self, auth: Option<&str>) -> (StatusCode, Value) {
        let mut request = self.http.get(self.url("/analyst"));
        if let Some(auth) = auth {
            request = request.header("Authorization", auth);
        }
        read(request.send().await.unwrap()).await
    }

    pub async fn delete_analysis(&self, auth: Option<&str>, body: Value) -> (StatusCode, Value) {
        let mut request = self.http.delete(self.url("/analyst")).json(&body);
        if let Some(auth) = auth {
            request = request.header("Authorization", auth);
        }
        read(request.send().await.unwrap()).await
    }
}

async fn read(response: reqwest::Response) -> (StatusCode, Value) {
    let status = StatusCode::from_u16(response.status().as_u16()).unwrap();
    let body = response.json().await.unwrap_or(Value::Null);
    (status, body)
}

/// The form submission used throughout the tests
pub fn child() -> Value {
    json!({
        "name": "A",
        "age": 24,
        "gender": "laki-laki",
        "height": 69.3,
        "weight": 8.2
    })
}
