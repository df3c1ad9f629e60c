//! Bearer-token authentication and role checks

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use tracing::debug;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{AuthUser, Role},
    state::AppState,
};

/// Authentication middleware
///
/// Verifies the `Authorization: Bearer` token and attaches the resulting
/// [`AuthUser`] to the request extensions. Requests without a valid token
/// never reach the handler.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let bearer = match req.headers().typed_get::<Authorization<Bearer>>() {
        Some(header) => header,
        None if req.headers().contains_key(AUTHORIZATION) => {
            return Err(ApiError::Unauthenticated(
                "Malformed authorization header".to_string(),
            ));
        }
        None => {
            return Err(ApiError::Unauthenticated(
                "Missing bearer token".to_string(),
            ));
        }
    };

    let user = state.jwt_service.verify(bearer.token())?;
    debug!("Authenticated {} as {}", user.id, user.role);

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Whether `user` holds at least the `minimum` role
pub fn has_role(user: &AuthUser, minimum: Role) -> bool {
    user.role.at_least(minimum)
}

/// Require at least the `minimum` role
pub fn require_role(user: &AuthUser, minimum: Role) -> Result<(), ApiError> {
    if has_role(user, minimum) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(format!(
            "Requires the {} role or higher",
            minimum
        )))
    }
}

/// Require that `user` owns the resource or holds at least `minimum`
pub fn require_owner_or_role(
    user: &AuthUser,
    owner_id: Uuid,
    minimum: Role,
) -> Result<(), ApiError> {
    if user.id == owner_id || has_role(user, minimum) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(format!(
            "Only the owner or a {} may do this",
            minimum
        )))
    }
}
