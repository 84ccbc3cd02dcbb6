//! End-to-end tests against a mock chat service over real HTTP
//!
//! Spins up an axum stand-in for the application API and the indexer, then
//! drives the full client through it: account generation, bundled token
//! requests, energy-gated sends, and session persistence on disk.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use ember_client::{ChatClient, ClientBuilder, HttpGateway, OutgoingMessage, PresetCaptcha};
use ember_core::{ChatConfig, JsonFileStore, SecretKey, SendPath};

static PORT_COUNTER: AtomicU16 = AtomicU16::new(19300);

fn next_port() -> u16 {
    PORT_COUNTER.fetch_add(1, Ordering::SeqCst)
}

#[derive(Default)]
struct ServiceState {
    energy: u64,
    fail_message: Option<String>,
    fail_status: Option<u16>,
    token_requests: Vec<Value>,
    sends: Vec<Value>,
}

type Shared = Arc<Mutex<ServiceState>>;

async fn health() -> &'static str {
    "ok"
}

async fn request_token(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().unwrap();
    if let Some(status) = state.fail_status {
        return (
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            "service unavailable",
        )
            .into_response();
    }
    if let Some(message) = &state.fail_message {
        return Json(json!({ "success": false, "message": message })).into_response();
    }
    state.token_requests.push(body);
    Json(json!({ "success": true })).into_response()
}

async fn send_message(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    state.lock().unwrap().sends.push(body);
    Json(json!({ "success": true }))
}

async fn save_file(State(_state): State<Shared>, Json(_body): Json<Value>) -> Json<Value> {
    Json(json!({ "success": true, "cid": "bafyharness" }))
}

async fn energy(State(state): State<Shared>, Path(_address): Path<String>) -> Json<Value> {
    Json(json!({ "energy": state.lock().unwrap().energy }))
}

async fn chats(State(_state): State<Shared>, Path(_space_id): Path<String>) -> Json<Value> {
    Json(json!({
        "chats": [
            { "chatId": "rust", "title": "Rust talk", "latestMessageAt": 500 },
            { "chatId": "general", "title": "General", "latestMessageAt": 900 },
            { "chatId": "announcements", "title": "Announcements" },
        ]
    }))
}

/// Test harness running the mock service on a local port
struct TestHarness {
    server_url: String,
    state: Shared,
    temp_dir: PathBuf,
    _shutdown: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestHarness {
    async fn new() -> Self {
        let port = next_port();
        let temp_dir = std::env::temp_dir().join(format!("ember-e2e-{}", port));
        let _ = std::fs::remove_dir_all(&temp_dir);

        let state: Shared = Arc::new(Mutex::new(ServiceState::default()));

        let router = Router::new()
            .route("/health", get(health))
            .route("/api/request-token", post(request_token))
            .route("/api/send-message", post(send_message))
            .route("/api/save-file", post(save_file))
            .route("/energy/:address", get(energy))
            .route("/spaces/:space_id/chats", get(chats))
            .with_state(state.clone());

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let listener = TcpListener::bind(("127.0.0.1", port))
            .await
            .expect("Bind should succeed");
        let server_url = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        for _ in 0..20 {
            if reqwest::Client::new()
                .get(format!("{}/health", server_url))
                .send()
                .await
                .is_ok()
            {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        Self {
            server_url,
            state,
            temp_dir,
            _shutdown: Some(shutdown_tx),
        }
    }

    fn config(&self) -> ChatConfig {
        ChatConfig::from_base_dir(&self.temp_dir)
            .with_api_url(&self.server_url)
            .with_indexer_url(&self.server_url)
            .with_space("1")
            .with_message_cost(5)
    }

    fn client(&self) -> ChatClient<HttpGateway, PresetCaptcha, JsonFileStore> {
        ClientBuilder::new(self.config())
            .captcha_token("harness-tok")
            .build()
    }

    fn state(&self) -> MutexGuard<'_, ServiceState> {
        self.state.lock().unwrap()
    }
}

impl Drop for TestHarness {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.temp_dir);
    }
}

#[tokio::test]
async fn test_first_message_flow_over_http() {
    let harness = TestHarness::new().await;
    let mut client = harness.client();

    let receipt = client
        .send(&OutgoingMessage::new("100", "gm"))
        .await
        .expect("send");

    assert_eq!(receipt.path, SendPath::RequestToken);
    assert!(receipt.account_created);

    let state = harness.state();
    assert_eq!(state.token_requests.len(), 1);
    assert!(state.sends.is_empty());

    let request = &state.token_requests[0];
    assert_eq!(request["captchaToken"], "harness-tok");
    assert_eq!(request["message"], "gm");
    assert_eq!(request["rootPostId"], "100");
    assert_eq!(
        request["address"],
        client.address().expect("address").to_hex()
    );
}

#[tokio::test]
async fn test_session_persists_across_clients() {
    let harness = TestHarness::new().await;

    let mut first = harness.client();
    first
        .send(&OutgoingMessage::new("100", "hello"))
        .await
        .expect("send");
    let address = first.address().expect("address");

    let mut second = harness.client();
    second.restore().await;
    assert_eq!(second.address(), Some(address));
    assert!(second.session().is_anonymous());
}

#[tokio::test]
async fn test_energy_quota_drives_direct_sends() {
    let harness = TestHarness::new().await;
    harness.state().energy = 1_000;

    let mut client = harness.client();
    let key = SecretKey::from_bytes([11u8; 32]);
    assert!(client.login_with_key(&key.to_hex()).await);
    assert_eq!(client.energy(), Some(1_000));

    let receipt = client
        .send(&OutgoingMessage::new("100", "funded"))
        .await
        .expect("send");

    assert_eq!(receipt.path, SendPath::Direct);

    let state = harness.state();
    assert_eq!(state.sends.len(), 1);
    assert!(state.token_requests.is_empty());
    assert_eq!(state.sends[0]["message"], "funded");
}

#[tokio::test]
async fn test_window_closes_after_service_grants_energy() {
    let harness = TestHarness::new().await;
    let mut client = harness.client();

    // the mock grants quota as soon as the token request lands, so the
    // follow-up refresh closes the window within the same send
    harness.state().energy = 0;
    client
        .send(&OutgoingMessage::new("100", "first"))
        .await
        .expect("send");
    assert!(client.is_requesting_energy());

    harness.state().energy = 1_000;
    client.refresh_energy().await.expect("refresh");
    assert!(!client.is_requesting_energy());

    let receipt = client
        .send(&OutgoingMessage::new("100", "second"))
        .await
        .expect("send");
    assert_eq!(receipt.path, SendPath::Direct);
    assert_eq!(harness.state().token_requests.len(), 1);
}

#[tokio::test]
async fn test_service_failure_message_is_surfaced() {
    let harness = TestHarness::new().await;
    harness.state().fail_message = Some("Captcha expired".to_string());

    let mut client = harness.client();
    let err = client
        .send(&OutgoingMessage::new("100", "hello"))
        .await
        .expect_err("send should fail");

    match err {
        ember_client::ClientError::Service { message } => {
            assert_eq!(message, "Captcha expired");
        }
        other => panic!("expected service error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_http_failure_maps_to_server_error() {
    let harness = TestHarness::new().await;
    harness.state().fail_status = Some(503);

    let mut client = harness.client();
    let err = client
        .send(&OutgoingMessage::new("100", "hello"))
        .await
        .expect_err("send should fail");

    match err {
        ember_client::ClientError::Server { status, .. } => assert_eq!(status, 503),
        other => panic!("expected server error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_chat_listing_sorted_over_http() {
    let harness = TestHarness::new().await;
    let client = harness.client();

    let chats = client.list_chats().await.expect("chats");
    let ids: Vec<_> = chats.iter().map(|c| c.chat_id.as_str()).collect();
    assert_eq!(ids, ["general", "rust", "announcements"]);
}

#[tokio::test]
async fn test_save_file_returns_cid() {
    let harness = TestHarness::new().await;
    let gateway = HttpGateway::new(&harness.server_url, &harness.server_url);

    let cid = ember_client::ChatGateway::save_file(
        &gateway,
        &json!({ "title": "Rust talk", "body": "weekly sync" }),
    )
    .await
    .expect("save");

    assert_eq!(cid, "bafyharness");
}
