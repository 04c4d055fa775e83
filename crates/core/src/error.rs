/// Domain-level error taxonomy shared across the workspace.
///
/// HTTP handlers wrap this in their own error type to produce JSON
/// responses; see `sprig-api`.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A named entity does not exist in the store.
    #[error("{entity} {id} not found")]
    NotFound {
        entity: &'static str,
        id: String,
    },

    /// Invalid input or configuration value.
    #[error("{0}")]
    Validation(String),

    /// The caller is not authenticated.
    #[error("{0}")]
    Unauthorized(String),

    /// The caller is authenticated but lacks the required privilege.
    #[error("{0}")]
    Forbidden(String),

    /// An unexpected internal failure.
    #[error("{0}")]
    Internal(String),
}
