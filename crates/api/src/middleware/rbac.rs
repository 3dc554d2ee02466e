//! Role-based access control extractors.
//!
//! The role check happens here, once; handlers receive an
//! [`AccessContext`] and never look at role names.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use pressgrid_core::access::{can_manage_categories, AccessContext};
use pressgrid_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `manager` or `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn handler(RequireManager(ctx): RequireManager) -> AppResult<Json<()>> {
///     tracing::info!(tenant_id = ctx.tenant_id(), "scoped to the caller's tenant");
///     Ok(Json(()))
/// }
/// ```
pub struct RequireManager(pub AccessContext);

impl FromRequestParts<AppState> for RequireManager {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !can_manage_categories(&user.role) {
            tracing::debug!(user_id = user.user_id, role = %user.role, "Category access denied");
            return Err(AppError::Core(CoreError::Forbidden(
                "Manager or Admin role required".into(),
            )));
        }
        Ok(RequireManager(AccessContext::grant(
            user.tenant_id,
            user.user_id,
        )))
    }
}
