//! Role-based access control extractors.
//!
//! Any known role may work the attendance grid through [`AuthUser`]. People
//! administration is narrower and goes through [`RequirePeopleAdmin`].

use asistencia_core::error::CoreError;
use asistencia_core::roles::can_manage_people;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires a role allowed to manage the people roster. Rejects with 403
/// Forbidden otherwise.
///
/// ```ignore
/// async fn delete_person(RequirePeopleAdmin(admin): RequirePeopleAdmin) -> AppResult<StatusCode> {
///     Ok(StatusCode::NO_CONTENT)
/// }
/// ```
pub struct RequirePeopleAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequirePeopleAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !can_manage_people(&user.role) {
            tracing::warn!(
                user_id = user.user_id,
                role = %user.role,
                path = %parts.uri.path(),
                "People administration refused"
            );
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required to manage people".into(),
            )));
        }
        Ok(RequirePeopleAdmin(user))
    }
}
