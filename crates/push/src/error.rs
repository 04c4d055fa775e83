//! Delivery failure classification.

/// Provider code meaning the token is malformed or not a registration
/// token at all.
pub const CODE_INVALID_TOKEN: &str = "messaging/invalid-registration-token";

/// Provider code meaning the token was valid once but the registration no
/// longer exists (app uninstalled, token rotated).
pub const CODE_TOKEN_NOT_REGISTERED: &str = "messaging/registration-token-not-registered";

/// Sentinel used when no recognizable provider code is present.
pub const CODE_UNKNOWN: &str = "unknown";

/// Error type for a single delivery attempt.
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    /// The HTTP request never produced a provider verdict.
    #[error("push request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider rejected the message.
    #[error("push rejected ({code}): {message}")]
    Rejected { code: String, message: String },

    /// Access-token minting failed.
    #[error(transparent)]
    Auth(#[from] sprig_gcp::GcpError),
}

impl PushError {
    /// The provider error code, or [`CODE_UNKNOWN`] when the failure has
    /// no recognizable code (transport errors, auth errors).
    pub fn code(&self) -> &str {
        match self {
            PushError::Rejected { code, .. } => code,
            _ => CODE_UNKNOWN,
        }
    }

    /// Whether this failure proves the target token is permanently
    /// invalid and should be pruned from its owner's token list.
    pub fn is_invalid_token(&self) -> bool {
        matches!(self.code(), CODE_INVALID_TOKEN | CODE_TOKEN_NOT_REGISTERED)
    }
}
