//! In-process stand-in for the backend's `/pastor-messages` resource.
//!
//! Serves the same routes and response shapes as the real backend on a random
//! local port, keeps the single-active invariant, checks bearer tokens, counts
//! requests, and can hold responses in flight.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, patch, put},
    Json, Router,
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::{json, Value};
use tokio::sync::{Notify, Semaphore};
use tokio::task::JoinHandle;

use pastor_messages::models::auth::Claims;
use pastor_messages::models::message::{MessageDraft, PastorMessage};
use pastor_messages::services::auth::Session;
use pastor_messages::services::pastor_messages::PastorMessageApi;

const SECRET: &[u8] = b"test_secret_key";
const TITLE_MAX: usize = 200;

type ApiResult = Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)>;

#[derive(Default)]
struct Store {
    next_id: i64,
    messages: Vec<PastorMessage>,
}

#[derive(Clone)]
pub struct FakeBackend {
    store: Arc<Mutex<Store>>,
    requests: Arc<AtomicUsize>,
    fail_list: Arc<AtomicBool>,
    ack_only: Arc<AtomicBool>,
    holding: Arc<AtomicBool>,
    gate: Arc<Semaphore>,
    arrived: Arc<Notify>,
}

pub struct TestServer {
    pub url: String,
    pub backend: FakeBackend,
    shutdown: Arc<Notify>,
    task: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        let backend = FakeBackend::new();
        let app = router(backend.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Arc::new(Notify::new());
        let task = tokio::spawn({
            let shutdown = shutdown.clone();
            async move {
                axum::serve(listener, app)
                    .with_graceful_shutdown(async move { shutdown.notified().await })
                    .await
                    .unwrap();
            }
        });

        Self {
            url: format!("http://{addr}"),
            backend,
            shutdown,
            task,
        }
    }

    pub fn api(&self) -> PastorMessageApi {
        PastorMessageApi::new(&self.url)
    }

    /// Client that opens a new connection per request, so it notices `stop` at once.
    pub fn unpooled_api(&self) -> PastorMessageApi {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .build()
            .unwrap();
        PastorMessageApi::with_client(client, &self.url)
    }

    /// Shut the server down; afterwards connections to `url` are refused.
    pub async fn stop(self) -> FakeBackend {
        self.shutdown.notify_one();
        self.task.await.unwrap();
        self.backend
    }
}

impl FakeBackend {
    fn new() -> Self {
        Self {
            store: Arc::new(Mutex::new(Store::default())),
            requests: Arc::new(AtomicUsize::new(0)),
            fail_list: Arc::new(AtomicBool::new(false)),
            ack_only: Arc::new(AtomicBool::new(false)),
            holding: Arc::new(AtomicBool::new(false)),
            gate: Arc::new(Semaphore::new(0)),
            arrived: Arc::new(Notify::new()),
        }
    }

    /// Insert directly into storage, bypassing HTTP and the request counter.
    pub fn seed(&self, title: &str, message: &str, is_active: bool) -> i64 {
        let mut store = self.store.lock().unwrap();
        if is_active {
            store.messages.iter_mut().for_each(|m| m.is_active = false);
        }
        store.next_id += 1;
        let id = store.next_id;
        store.messages.push(PastorMessage {
            id,
            title: title.into(),
            message: message.into(),
            is_active,
        });
        id
    }

    /// Remove a row behind the client's back (another admin deleting it).
    pub fn remove(&self, id: i64) {
        self.store.lock().unwrap().messages.retain(|m| m.id != id);
    }

    pub fn messages(&self) -> Vec<PastorMessage> {
        self.store.lock().unwrap().messages.clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    /// Answer create/update with only `{ "message": .. }`, leaving out `data`.
    pub fn ack_only(&self, on: bool) {
        self.ack_only.store(on, Ordering::SeqCst);
    }

    /// Make every following request wait until `release`.
    pub fn hold(&self) {
        self.holding.store(true, Ordering::SeqCst);
    }

    pub fn release(&self) {
        self.holding.store(false, Ordering::SeqCst);
        self.gate.add_permits(64);
    }

    /// Resolves once a held request has reached the backend.
    pub async fn wait_for_request(&self) {
        self.arrived.notified().await;
    }

    async fn hit(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if self.holding.load(Ordering::SeqCst) {
            self.arrived.notify_one();
            if let Ok(permit) = self.gate.acquire().await {
                permit.forget();
            }
        }
    }
}

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize
}

pub fn token_for(role: &str) -> String {
    let claims = Claims {
        sub: "1".into(),
        role: role.into(),
        exp: now() + 3600,
        iat: now(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET),
    )
    .unwrap()
}

pub fn admin_session() -> Session {
    Session::with_token(token_for("admin"))
}

pub fn user_session() -> Session {
    Session::with_token(token_for("user"))
}

/// Base URL on which nothing is listening.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

fn router(backend: FakeBackend) -> Router {
    Router::new()
        .route("/pastor-messages", get(list).post(create))
        .route("/pastor-messages/active", get(active))
        .route("/pastor-messages/{id}", put(update).delete(remove))
        .route("/pastor-messages/{id}/activate", patch(activate))
        .with_state(backend)
}

fn error(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "message": message })))
}

fn require_admin(headers: &HeaderMap) -> Result<(), (StatusCode, Json<Value>)> {
    let token = headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "Token is missing."))?;

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(SECRET),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|_| error(StatusCode::UNAUTHORIZED, "Invalid token."))?
    .claims;

    if claims.role != "admin" {
        return Err(error(StatusCode::FORBIDDEN, "Admin access required."));
    }
    Ok(())
}

fn validate(draft: &MessageDraft) -> Result<(), (StatusCode, Json<Value>)> {
    // Field errors carry no top-level "message", like a schema validation failure.
    if draft.title.len() > TITLE_MAX {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "title": ["Longer than maximum length 200."] })),
        ));
    }
    Ok(())
}

async fn list(State(backend): State<FakeBackend>) -> ApiResult {
    backend.hit().await;
    if backend.fail_list.load(Ordering::SeqCst) {
        return Err(error(StatusCode::INTERNAL_SERVER_ERROR, "database unavailable"));
    }
    let messages = backend.messages();
    Ok((StatusCode::OK, Json(json!(messages))))
}

async fn active(State(backend): State<FakeBackend>) -> ApiResult {
    backend.hit().await;
    let store = backend.store.lock().unwrap();
    match store.messages.iter().find(|m| m.is_active) {
        Some(m) => Ok((StatusCode::OK, Json(json!(m)))),
        None => Err(error(StatusCode::NOT_FOUND, "No active pastor message found.")),
    }
}

async fn create(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Json(draft): Json<MessageDraft>,
) -> ApiResult {
    backend.hit().await;
    require_admin(&headers)?;
    validate(&draft)?;

    let id = backend.seed(&draft.title, &draft.message, draft.is_active);
    if backend.ack_only.load(Ordering::SeqCst) {
        return Ok((
            StatusCode::CREATED,
            Json(json!({ "message": "Pastor message created successfully." })),
        ));
    }
    let created = backend
        .messages()
        .into_iter()
        .find(|m| m.id == id)
        .unwrap();
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Pastor message created successfully.", "data": created })),
    ))
}

async fn update(
    State(backend): State<FakeBackend>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(draft): Json<MessageDraft>,
) -> ApiResult {
    backend.hit().await;
    require_admin(&headers)?;
    validate(&draft)?;

    let mut store = backend.store.lock().unwrap();
    if !store.messages.iter().any(|m| m.id == id) {
        return Err(error(StatusCode::NOT_FOUND, "Pastor message not found."));
    }
    if draft.is_active {
        store.messages.iter_mut().for_each(|m| m.is_active = false);
    }
    let updated = store.messages.iter_mut().find(|m| m.id == id).unwrap();
    updated.title = draft.title;
    updated.message = draft.message;
    updated.is_active = draft.is_active;
    let updated = updated.clone();

    if backend.ack_only.load(Ordering::SeqCst) {
        return Ok((
            StatusCode::OK,
            Json(json!({ "message": "Pastor message updated successfully." })),
        ));
    }
    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Pastor message updated successfully.", "data": updated })),
    ))
}

async fn remove(
    State(backend): State<FakeBackend>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> ApiResult {
    backend.hit().await;
    require_admin(&headers)?;

    let mut store = backend.store.lock().unwrap();
    let before = store.messages.len();
    store.messages.retain(|m| m.id != id);
    if store.messages.len() == before {
        return Err(error(StatusCode::NOT_FOUND, "Pastor message not found."));
    }
    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Pastor message deleted successfully." })),
    ))
}

async fn activate(
    State(backend): State<FakeBackend>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> ApiResult {
    backend.hit().await;
    require_admin(&headers)?;

    let mut store = backend.store.lock().unwrap();
    if !store.messages.iter().any(|m| m.id == id) {
        return Err(error(StatusCode::NOT_FOUND, "Pastor message not found."));
    }
    for m in store.messages.iter_mut() {
        m.is_active = m.id == id;
    }
    let activated = store.messages.iter().find(|m| m.id == id).cloned();
    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Pastor message activated successfully.", "data": activated })),
    ))
}
