//! Root-only administrative operations.
//!
//! Both operations require the caller to carry the `admin` and
//! `superadmin` claims (enforced by [`RequireRoot`]) and perform exactly
//! one privilege-claim write on the user record plus one merge-upsert of
//! the `admins/{uid}` mirror record.

use axum::extract::{Path, State};
use axum::routing::{delete, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use sprig_core::error::CoreError;
use sprig_store::AdminMirror;
use validator::ValidateEmail;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireRoot;
use crate::state::AppState;

/// Request body for `POST /admin/admins`.
#[derive(Debug, Deserialize)]
pub struct PromoteRequest {
    /// Email of the user to promote.
    pub email: String,
}

/// Email (preferred) or uid of the acting caller, recorded on the mirror.
fn acting_caller(caller: &AuthUser) -> String {
    caller
        .email
        .clone()
        .unwrap_or_else(|| caller.user_id.clone())
}

/// POST /api/v1/admin/admins
///
/// Promote a user to admin by email and mirror the change to
/// `admins/{uid}`.
pub async fn promote(
    RequireRoot(caller): RequireRoot,
    State(state): State<AppState>,
    Json(request): Json<PromoteRequest>,
) -> AppResult<Json<Value>> {
    // Normalize before validating: clients send padded and mixed-case
    // addresses.
    let email = request.email.trim().to_lowercase();
    if !email.validate_email() {
        return Err(AppError::BadRequest("'email' must be a valid email".into()));
    }

    let user = state
        .store
        .find_user_by_email(&email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "User",
                id: email.clone(),
            })
        })?;

    state.store.set_admin_claim(&user.id, true).await?;
    state
        .store
        .upsert_admin_mirror(&AdminMirror {
            uid: user.id.clone(),
            email: Some(email.clone()),
            admin: true,
            updated_by: acting_caller(&caller),
        })
        .await?;

    tracing::info!(uid = %user.id, email = %email, "Promoted to admin");
    Ok(Json(json!({ "ok": true, "uid": user.id })))
}

/// DELETE /api/v1/admin/admins/{uid}
///
/// Demote an admin by uid and update `admins/{uid}`.
pub async fn demote(
    RequireRoot(caller): RequireRoot,
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> AppResult<Json<Value>> {
    let uid = uid.trim().to_string();
    if uid.is_empty() {
        return Err(AppError::BadRequest("'uid' is required".into()));
    }

    state.store.set_admin_claim(&uid, false).await?;
    state
        .store
        .upsert_admin_mirror(&AdminMirror {
            uid: uid.clone(),
            email: None,
            admin: false,
            updated_by: acting_caller(&caller),
        })
        .await?;

    tracing::info!(uid = %uid, "Demoted admin");
    Ok(Json(json!({ "ok": true })))
}

/// Routes mounted at `/admin`.
///
/// All routes require both privilege claims (enforced by handler
/// extractors).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admins", post(promote))
        .route("/admins/{uid}", delete(demote))
}
