//! Authorization guard: bearer-token authentication and role checks.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use uuid::Uuid;

use crate::api::AppState;
use crate::domain::Role;
use crate::errors::AppError;

/// Identity established from a verified session token
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Uuid,
    pub role: Role,
}

/// Bearer-token authentication middleware.
///
/// Verifies the token from the `Authorization` header and injects the
/// [`CurrentUser`] into the request extensions. Never consults the account store.
pub async fn require_authenticated(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let bearer = request
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or(AppError::Unauthorized)?;

    let claims = state.tokens.verify(bearer.token())?;

    request.extensions_mut().insert(CurrentUser {
        id: claims.sub,
        role: claims.role,
    });

    Ok(next.run(request).await)
}

/// Require an exact role, returns Forbidden otherwise.
pub fn require_role(user: &CurrentUser, required: Role) -> Result<(), AppError> {
    if user.role.satisfies(required) {
        Ok(())
    } else {
        tracing::debug!(user_id = %user.id, role = %user.role, required = %required, "Role check failed");
        Err(AppError::Forbidden)
    }
}

/// Extractor for admin-only handlers.
///
/// Must come before any body extractor so a non-admin caller gets 403 even
/// when the body is also invalid.
#[derive(Clone, Copy, Debug)]
pub struct AdminUser(pub CurrentUser);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<CurrentUser>()
            .copied()
            .ok_or(AppError::Unauthorized)?;

        require_role(&user, Role::Admin)?;
        Ok(AdminUser(user))
    }
}
