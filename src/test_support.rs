//! In-process JSON-RPC node used by the unit tests.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
enum Reply {
    Result(Value),
    Error(i64, String),
}

#[derive(Default)]
struct StubState {
    replies: Mutex<HashMap<String, Reply>>,
    calls: Mutex<Vec<Value>>,
    status: Mutex<Option<u16>>,
    delay: Mutex<Duration>,
}

#[derive(Clone, Default)]
pub struct StubNode {
    state: Arc<StubState>,
}

impl StubNode {
    /// A node answering the five dashboard queries with fixed values:
    /// 1.23456789 ETH, block 19_000_000, chain 1, nonce 42, 21.5 gwei.
    pub fn mainnet_like() -> Self {
        Self::default()
            .responding("eth_getBalance", json!("0x112210f4768db400"))
            .responding("eth_blockNumber", json!("0x121eac0"))
            .responding("eth_chainId", json!("0x1"))
            .responding("eth_getTransactionCount", json!("0x2a"))
            .responding("eth_gasPrice", json!("0x5017ff700"))
    }

    pub fn responding(self, method: &str, result: Value) -> Self {
        self.respond(method, result);
        self
    }

    pub fn failing(self, method: &str, code: i64, message: &str) -> Self {
        self.fail(method, code, message);
        self
    }

    /// Answers every request with this HTTP status instead of 200.
    pub fn with_status(self, status: u16) -> Self {
        *self.state.status.lock().unwrap() = Some(status);
        self
    }

    /// Holds every response back for `delay`.
    pub fn with_delay(self, delay: Duration) -> Self {
        *self.state.delay.lock().unwrap() = delay;
        self
    }

    pub fn respond(&self, method: &str, result: Value) {
        self.state
            .replies
            .lock()
            .unwrap()
            .insert(method.to_string(), Reply::Result(result));
    }

    pub fn fail(&self, method: &str, code: i64, message: &str) {
        self.state
            .replies
            .lock()
            .unwrap()
            .insert(method.to_string(), Reply::Error(code, message.to_string()));
    }

    /// Request bodies received so far, in arrival order.
    pub fn calls(&self) -> Vec<Value> {
        self.state.calls.lock().unwrap().clone()
    }

    pub fn methods(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|call| call["method"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    /// Serves the stub on an ephemeral local port and returns its URL.
    pub async fn spawn(&self) -> String {
        let app = Router::new()
            .route("/", post(handle))
            .with_state(Arc::clone(&self.state));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }
}

async fn handle(
    State(state): State<Arc<StubState>>,
    Json(request): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.calls.lock().unwrap().push(request.clone());

    let delay = *state.delay.lock().unwrap();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let status = state
        .status
        .lock()
        .unwrap()
        .and_then(|code| StatusCode::from_u16(code).ok())
        .unwrap_or(StatusCode::OK);

    let method = request["method"].as_str().unwrap_or_default();
    let reply = state.replies.lock().unwrap().get(method).cloned();

    let body = match reply {
        Some(Reply::Result(result)) => json!({
            "jsonrpc": "2.0",
            "id": request["id"],
            "result": result,
        }),
        Some(Reply::Error(code, message)) => json!({
            "jsonrpc": "2.0",
            "id": request["id"],
            "error": { "code": code, "message": message },
        }),
        None => json!({
            "jsonrpc": "2.0",
            "id": request["id"],
            "error": { "code": -32601, "message": "the method does not exist/is not available" },
        }),
    };

    (status, Json(body))
}
