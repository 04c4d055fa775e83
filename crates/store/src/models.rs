//! Record types read from and written to the document store.

use sprig_core::types::{DocId, Timestamp};

// ---------------------------------------------------------------------------
// PlantRecord
// ---------------------------------------------------------------------------

/// A plant document from the `plants` collection.
///
/// The store never guarantees shape: the owner may be absent (such records
/// are skipped by the reminder job), the name may be absent, and the
/// last-watered value arrives in several wire representations. Decoding
/// normalizes all of them; by the time a `PlantRecord` exists, the
/// last-watered value is either a UTC instant or `None` (never watered).
#[derive(Debug, Clone, PartialEq)]
pub struct PlantRecord {
    pub id: DocId,
    pub owner_id: Option<String>,
    pub name: Option<String>,
    pub last_watered_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// UserRecord
// ---------------------------------------------------------------------------

/// A user document from the `users` collection.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub id: DocId,
    pub email: Option<String>,
    /// Registered device push tokens.
    pub tokens: Vec<String>,
    /// Legacy singular token field (`fcmToken`), consulted only when
    /// `tokens` is empty.
    pub legacy_token: Option<String>,
    /// Store-side mirror of the admin privilege claim.
    pub admin: bool,
}

impl UserRecord {
    /// The token set actually targeted for this user in one reminder run:
    /// the list field if non-empty, else the legacy singular token wrapped
    /// as a one-element set, else empty.
    pub fn effective_tokens(&self) -> Vec<String> {
        if !self.tokens.is_empty() {
            return self.tokens.clone();
        }
        self.legacy_token.iter().cloned().collect()
    }
}

// ---------------------------------------------------------------------------
// AdminMirror
// ---------------------------------------------------------------------------

/// The `admins/{uid}` side record maintained by promote/demote.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminMirror {
    pub uid: DocId,
    pub email: Option<String>,
    pub admin: bool,
    /// Email (preferred) or uid of the caller that performed the change.
    pub updated_by: String,
}
