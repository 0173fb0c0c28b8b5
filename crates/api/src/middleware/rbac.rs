//! Role-based access control extractors.
//!
//! Handlers taking [`RequireAdmin`] form the administrative tier: they call
//! the engine's admin entry points, which never run the ownership check.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use backlog_core::error::CoreError;
use backlog_core::roles::ROLE_ADMIN;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role. Rejects with 403 otherwise.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN {
            tracing::warn!(user_id = user.user_id, role = %user.role, "Admin role required");
            return Err(AppError::Core(CoreError::AccessDenied(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}
