//! Integration tests for device push-token registration.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{bearer, build_test_app, post_json, FakeDelivery, FakeStore};
use serde_json::json;

#[tokio::test]
async fn registration_requires_authentication() {
    let store = Arc::new(FakeStore::default());
    let app = build_test_app(Arc::clone(&store), Arc::new(FakeDelivery::default()));

    let response = post_json(app, "/api/v1/devices/tokens", json!({ "token": "tok1" }), None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(store.added_tokens.lock().unwrap().is_empty());
}

#[tokio::test]
async fn registers_token_for_the_caller() {
    let store = Arc::new(FakeStore::default());
    let app = build_test_app(Arc::clone(&store), Arc::new(FakeDelivery::default()));

    let response = post_json(
        app,
        "/api/v1/devices/tokens",
        json!({ "token": "tok-new" }),
        Some(&bearer(false, false)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        *store.added_tokens.lock().unwrap(),
        vec![("caller-1".to_string(), "tok-new".to_string())]
    );
}

#[tokio::test]
async fn rejects_a_blank_token() {
    let store = Arc::new(FakeStore::default());
    let app = build_test_app(Arc::clone(&store), Arc::new(FakeDelivery::default()));

    let response = post_json(
        app,
        "/api/v1/devices/tokens",
        json!({ "token": "   " }),
        Some(&bearer(false, false)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(store.added_tokens.lock().unwrap().is_empty());
}
