//! Device push-token registration.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `POST /devices/tokens`.
#[derive(Debug, Deserialize)]
pub struct RegisterTokenRequest {
    /// The device push token obtained from the messaging SDK.
    pub token: String,
}

/// POST /api/v1/devices/tokens
///
/// Register a push token for the authenticated caller. The store write is
/// an idempotent array union, so re-registering the same token is a
/// no-op. Returns 204 No Content.
async fn register_token(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<RegisterTokenRequest>,
) -> AppResult<StatusCode> {
    let token = request.token.trim();
    if token.is_empty() {
        return Err(AppError::BadRequest("'token' is required".into()));
    }

    state.store.add_token(&auth.user_id, token).await?;

    tracing::debug!(user_id = %auth.user_id, "Device token registered");
    Ok(StatusCode::NO_CONTENT)
}

/// Routes mounted at `/devices`.
pub fn router() -> Router<AppState> {
    Router::new().route("/tokens", post(register_token))
}
