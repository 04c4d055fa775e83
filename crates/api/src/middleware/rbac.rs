//! Privilege-claim extractors.
//!
//! Wraps [`AuthUser`] and rejects requests whose token does not carry the
//! required privilege claims. Use these in route handlers to enforce
//! authorization at the type level.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sprig_core::claims::{CLAIM_ADMIN, CLAIM_SUPERADMIN};
use sprig_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires both the `admin` and `superadmin` claims. Rejects with
/// 403 Forbidden otherwise.
///
/// ```ignore
/// async fn root_only(RequireRoot(user): RequireRoot) -> AppResult<Json<()>> {
///     // user is guaranteed to carry both privilege claims here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireRoot(pub AuthUser);

impl FromRequestParts<AppState> for RequireRoot {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.admin || !user.superadmin {
            return Err(AppError::Core(CoreError::Forbidden(format!(
                "Superadmins only (requires the {CLAIM_ADMIN} and {CLAIM_SUPERADMIN} claims)"
            ))));
        }
        Ok(RequireRoot(user))
    }
}
