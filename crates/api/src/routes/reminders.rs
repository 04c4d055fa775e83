//! Manual trigger for the grouped reminder job.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::error::AppResult;
use crate::state::AppState;

/// POST /api/v1/reminders/run
///
/// Run one reminder pass immediately and report the number of successful
/// token deliveries. Per-token failures are routine and absorbed inside
/// the run; only a failed plant enumeration surfaces here as an error
/// response.
async fn run_now(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let sent = state.reminder_job.run_once().await?;
    Ok(Json(json!({ "ok": true, "sent": sent })))
}

/// Routes mounted at `/reminders`.
pub fn router() -> Router<AppState> {
    Router::new().route("/run", post(run_now))
}
