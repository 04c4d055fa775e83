//! Push-delivery collaborator.
//!
//! One message targets exactly one device token; fan-out across a user's
//! tokens is the caller's concern. The provider reports per-call outcomes,
//! and [`PushError::code`] classifies failures so the caller can
//! distinguish permanently-invalid tokens (prune) from transient trouble
//! (log only).

pub mod error;
pub mod fcm;
pub mod message;

pub use error::PushError;
pub use fcm::FcmDelivery;
pub use message::{PushMessage, WebPushOptions};

use async_trait::async_trait;

/// The delivery surface consumed by the reminder job.
///
/// Implementations must keep concurrent calls independent: one call's
/// failure never affects another's outcome or timing.
#[async_trait]
pub trait PushDelivery: Send + Sync {
    /// Deliver one message to its single target token.
    async fn send(&self, message: &PushMessage) -> Result<(), PushError>;
}
