use std::sync::Arc;

use sprig_reminder::ReminderJob;
use sprig_store::DocumentStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; collaborators are behind `Arc` trait objects so
/// integration tests can substitute fakes.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Document store collaborator (plants, users, admin mirror).
    pub store: Arc<dyn DocumentStore>,
    /// The grouped reminder job, shared with the scheduler task.
    pub reminder_job: Arc<ReminderJob>,
}
