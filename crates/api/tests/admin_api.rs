//! Integration tests for the claims-gated admin operations.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{
    bearer, body_json, build_test_app, delete, post_json, user, FakeDelivery, FakeStore,
};
use serde_json::json;

fn app_with_user(store: &Arc<FakeStore>) -> axum::Router {
    store.insert_user(user("u1", Some("grower@example.com"), &[]));
    build_test_app(Arc::clone(store), Arc::new(FakeDelivery::default()))
}

// ---------------------------------------------------------------------------
// Authorization gate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn promote_rejects_unauthenticated_callers() {
    let store = Arc::new(FakeStore::default());
    let app = app_with_user(&store);

    let response = post_json(
        app,
        "/api/v1/admin/admins",
        json!({ "email": "grower@example.com" }),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(store.claim_writes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn promote_rejects_admin_without_superadmin_claim() {
    let store = Arc::new(FakeStore::default());
    let app = app_with_user(&store);

    let response = post_json(
        app,
        "/api/v1/admin/admins",
        json!({ "email": "grower@example.com" }),
        Some(&bearer(true, false)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["ok"], false);
    assert_eq!(json["code"], "FORBIDDEN");
    assert!(store.claim_writes.lock().unwrap().is_empty());
    assert!(store.mirrors.lock().unwrap().is_empty());
}

#[tokio::test]
async fn demote_rejects_superadmin_without_admin_claim() {
    let store = Arc::new(FakeStore::default());
    let app = app_with_user(&store);

    let response = delete(app, "/api/v1/admin/admins/u1", Some(&bearer(false, true))).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(store.claim_writes.lock().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Promote
// ---------------------------------------------------------------------------

#[tokio::test]
async fn promote_writes_claim_and_mirror_exactly_once() {
    let store = Arc::new(FakeStore::default());
    let app = app_with_user(&store);

    let response = post_json(
        app,
        "/api/v1/admin/admins",
        json!({ "email": "grower@example.com" }),
        Some(&bearer(true, true)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["ok"], true);
    assert_eq!(json["uid"], "u1");

    assert_eq!(
        *store.claim_writes.lock().unwrap(),
        vec![("u1".to_string(), true)]
    );

    let mirrors = store.mirrors.lock().unwrap();
    assert_eq!(mirrors.len(), 1);
    assert_eq!(mirrors[0].uid, "u1");
    assert_eq!(mirrors[0].email.as_deref(), Some("grower@example.com"));
    assert!(mirrors[0].admin);
    assert_eq!(mirrors[0].updated_by, "root@example.com");
}

#[tokio::test]
async fn promote_normalizes_padded_mixed_case_email() {
    let store = Arc::new(FakeStore::default());
    let app = app_with_user(&store);

    let response = post_json(
        app,
        "/api/v1/admin/admins",
        json!({ "email": "  Grower@Example.COM  " }),
        Some(&bearer(true, true)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["uid"], "u1");
}

#[tokio::test]
async fn promote_unknown_email_returns_404() {
    let store = Arc::new(FakeStore::default());
    let app = app_with_user(&store);

    let response = post_json(
        app,
        "/api/v1/admin/admins",
        json!({ "email": "nobody@example.com" }),
        Some(&bearer(true, true)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(store.claim_writes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn promote_rejects_malformed_email() {
    let store = Arc::new(FakeStore::default());
    let app = app_with_user(&store);

    let response = post_json(
        app,
        "/api/v1/admin/admins",
        json!({ "email": "not-an-email" }),
        Some(&bearer(true, true)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(store.claim_writes.lock().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Demote
// ---------------------------------------------------------------------------

#[tokio::test]
async fn demote_writes_claim_and_mirror_exactly_once() {
    let store = Arc::new(FakeStore::default());
    let app = app_with_user(&store);

    let response = delete(app, "/api/v1/admin/admins/u1", Some(&bearer(true, true))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["ok"], true);

    assert_eq!(
        *store.claim_writes.lock().unwrap(),
        vec![("u1".to_string(), false)]
    );

    let mirrors = store.mirrors.lock().unwrap();
    assert_eq!(mirrors.len(), 1);
    assert_eq!(mirrors[0].uid, "u1");
    assert!(!mirrors[0].admin);
    assert_eq!(mirrors[0].email, None);
    assert_eq!(mirrors[0].updated_by, "root@example.com");
}
