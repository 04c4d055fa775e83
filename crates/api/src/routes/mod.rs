pub mod admin;
pub mod devices;
pub mod health;
pub mod reminders;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /reminders/run            manual reminder trigger (POST, public)
///
/// /admin/admins             promote a user to admin (POST, root only)
/// /admin/admins/{uid}       demote an admin (DELETE, root only)
///
/// /devices/tokens           register the caller's push token (POST, auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/reminders", reminders::router())
        .nest("/admin", admin::router())
        .nest("/devices", devices::router())
}
