//! Document-store collaborator.
//!
//! The plant and user records live in a managed document database
//! (Firestore). This crate provides:
//!
//! - [`models`] — the record types the rest of the workspace consumes,
//!   with wire-format normalization done at the read boundary.
//! - [`DocumentStore`] — the object-safe trait the reminder job and API
//!   handlers depend on, so tests can substitute in-memory fakes.
//! - [`FirestoreStore`] — the production implementation over the
//!   Firestore REST surface.

pub mod firestore;
pub mod models;
mod value;

pub use firestore::FirestoreStore;
pub use models::{AdminMirror, PlantRecord, UserRecord};

use async_trait::async_trait;

/// Error type for document-store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The underlying HTTP request failed (network, DNS, timeout).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The store returned a non-success status.
    #[error("document store returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// A document could not be decoded into its record type.
    #[error("failed to decode document: {0}")]
    Decode(String),

    /// Access-token minting failed.
    #[error(transparent)]
    Auth(#[from] sprig_gcp::GcpError),
}

/// The document-store surface consumed by this service.
///
/// Implementations must guarantee per-document atomicity for the token
/// array mutations; no cross-document transaction is ever required.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read every plant record.
    async fn list_plants(&self) -> Result<Vec<PlantRecord>, StoreError>;

    /// Read one user record. A missing document is `Ok(None)`.
    async fn get_user(&self, id: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Look up a user record by exact email.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Add a device token to a user's token list (idempotent array union).
    async fn add_token(&self, user_id: &str, token: &str) -> Result<(), StoreError>;

    /// Remove exactly one token from a user's token list.
    async fn remove_token(&self, user_id: &str, token: &str) -> Result<(), StoreError>;

    /// Write the `admin` privilege claim field on a user record.
    async fn set_admin_claim(&self, user_id: &str, admin: bool) -> Result<(), StoreError>;

    /// Merge-upsert the `admins/{uid}` mirror record.
    async fn upsert_admin_mirror(&self, mirror: &AdminMirror) -> Result<(), StoreError>;
}
