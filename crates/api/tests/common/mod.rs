//! Shared helpers for API integration tests: fake collaborators, router
//! construction mirroring `main.rs`, and request plumbing.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use sprig_api::auth::jwt::{generate_token, JwtConfig};
use sprig_api::config::ServerConfig;
use sprig_api::routes;
use sprig_api::state::AppState;
use sprig_core::date::{parse_zone, REFERENCE_TIMEZONE};
use sprig_push::{PushDelivery, PushError, PushMessage};
use sprig_reminder::scheduler::DEFAULT_REMINDER_HOUR;
use sprig_reminder::ReminderJob;
use sprig_store::{AdminMirror, DocumentStore, PlantRecord, StoreError, UserRecord};

pub const TEST_JWT_SECRET: &str = "test-secret";

// ---------------------------------------------------------------------------
// Fake collaborators
// ---------------------------------------------------------------------------

/// In-memory store recording every write for assertions.
#[derive(Default)]
pub struct FakeStore {
    pub plants: Mutex<Vec<PlantRecord>>,
    pub users: Mutex<HashMap<String, UserRecord>>,
    pub claim_writes: Mutex<Vec<(String, bool)>>,
    pub mirrors: Mutex<Vec<AdminMirror>>,
    pub added_tokens: Mutex<Vec<(String, String)>>,
    pub removed_tokens: Mutex<Vec<(String, String)>>,
    pub fail_listing: bool,
}

impl FakeStore {
    pub fn insert_user(&self, user: UserRecord) {
        self.users.lock().unwrap().insert(user.id.clone(), user);
    }

    pub fn insert_plant(&self, plant: PlantRecord) {
        self.plants.lock().unwrap().push(plant);
    }
}

#[async_trait]
impl DocumentStore for FakeStore {
    async fn list_plants(&self) -> Result<Vec<PlantRecord>, StoreError> {
        if self.fail_listing {
            return Err(StoreError::Status {
                status: 500,
                message: "backend unavailable".to_string(),
            });
        }
        Ok(self.plants.lock().unwrap().clone())
    }

    async fn get_user(&self, id: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.users.lock().unwrap().get(id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email.as_deref() == Some(email))
            .cloned())
    }

    async fn add_token(&self, user_id: &str, token: &str) -> Result<(), StoreError> {
        self.added_tokens
            .lock()
            .unwrap()
            .push((user_id.to_string(), token.to_string()));
        Ok(())
    }

    async fn remove_token(&self, user_id: &str, token: &str) -> Result<(), StoreError> {
        self.removed_tokens
            .lock()
            .unwrap()
            .push((user_id.to_string(), token.to_string()));
        Ok(())
    }

    async fn set_admin_claim(&self, user_id: &str, admin: bool) -> Result<(), StoreError> {
        self.claim_writes
            .lock()
            .unwrap()
            .push((user_id.to_string(), admin));
        Ok(())
    }

    async fn upsert_admin_mirror(&self, mirror: &AdminMirror) -> Result<(), StoreError> {
        self.mirrors.lock().unwrap().push(mirror.clone());
        Ok(())
    }
}

/// Delivery fake: tokens listed in `failures` are rejected with the given
/// provider code, everything else succeeds.
#[derive(Default)]
pub struct FakeDelivery {
    pub failures: HashMap<String, String>,
    pub attempts: Mutex<Vec<PushMessage>>,
}

#[async_trait]
impl PushDelivery for FakeDelivery {
    async fn send(&self, message: &PushMessage) -> Result<(), PushError> {
        self.attempts.lock().unwrap().push(message.clone());
        match self.failures.get(&message.token) {
            Some(code) => Err(PushError::Rejected {
                code: code.clone(),
                message: "rejected by fake provider".to_string(),
            }),
            None => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
        },
        reminder_timezone: parse_zone(REFERENCE_TIMEZONE).unwrap(),
        reminder_hour: DEFAULT_REMINDER_HOUR,
        gcp_project_id: "sprig-test".to_string(),
        firestore_base_url: None,
        fcm_base_url: None,
    }
}

/// Build the full application router with all middleware layers, using
/// the given fake collaborators.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout,
/// tracing, panic recovery) that production uses.
pub fn build_test_app(store: Arc<FakeStore>, delivery: Arc<FakeDelivery>) -> Router {
    let config = test_config();

    let store: Arc<dyn DocumentStore> = store;
    let reminder_job = Arc::new(ReminderJob::new(
        Arc::clone(&store),
        delivery,
        config.reminder_timezone,
    ));

    let state = AppState {
        config: Arc::new(config),
        store,
        reminder_job,
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true);

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            std::time::Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request plumbing
// ---------------------------------------------------------------------------

/// Mint a bearer header value with the given privilege claims.
pub fn bearer(admin: bool, superadmin: bool) -> String {
    let token = generate_token(
        "caller-1",
        Some("root@example.com"),
        admin,
        superadmin,
        &test_config().jwt,
    )
    .unwrap();
    format!("Bearer {token}")
}

pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_json(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    auth: Option<&str>,
) -> Response {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(value) = auth {
        builder = builder.header(AUTHORIZATION, value);
    }
    app.oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

pub async fn post_empty(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn delete(app: Router, uri: &str, auth: Option<&str>) -> Response {
    let mut builder = Request::builder().method(Method::DELETE).uri(uri);
    if let Some(value) = auth {
        builder = builder.header(AUTHORIZATION, value);
    }
    app.oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Collect and parse a JSON response body.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn plant(id: &str, owner: &str, name: &str) -> PlantRecord {
    PlantRecord {
        id: id.to_string(),
        owner_id: Some(owner.to_string()),
        name: Some(name.to_string()),
        last_watered_at: None,
    }
}

pub fn user(id: &str, email: Option<&str>, tokens: &[&str]) -> UserRecord {
    UserRecord {
        id: id.to_string(),
        email: email.map(String::from),
        tokens: tokens.iter().map(|t| t.to_string()).collect(),
        legacy_token: None,
        admin: false,
    }
}
