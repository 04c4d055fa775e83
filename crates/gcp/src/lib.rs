//! Google Cloud service-account plumbing.
//!
//! Both managed collaborators (the Firestore document store and FCM push
//! messaging) authenticate with OAuth2 access tokens minted from a
//! service-account key. This crate owns that concern:
//!
//! - [`ServiceAccountKey`] — the JSON key file.
//! - [`TokenProvider`] — per-scope access-token minting with cached,
//!   expiry-aware refresh.

pub mod credentials;
pub mod token;

pub use credentials::ServiceAccountKey;
pub use token::TokenProvider;

/// Error type for credential loading and token exchange.
#[derive(Debug, thiserror::Error)]
pub enum GcpError {
    /// The key file could not be read.
    #[error("failed to read service account key: {0}")]
    KeyRead(#[from] std::io::Error),

    /// The key file is not valid JSON or is missing fields.
    #[error("failed to parse service account key: {0}")]
    KeyParse(#[from] serde_json::Error),

    /// The RS256 assertion could not be signed.
    #[error("failed to sign OAuth assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    /// The token endpoint could not be reached.
    #[error("token exchange request failed: {0}")]
    Exchange(#[from] reqwest::Error),

    /// The token endpoint rejected the assertion.
    #[error("token endpoint returned HTTP {status}: {body}")]
    ExchangeStatus { status: u16, body: String },
}
