//! Registration and login handlers

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::WithRejection;

use crate::{
    error::{ApiError, ApiResult},
    models::{ApiResponse, LoginRequest, RegisterRequest},
    state::AppState,
    validation::{FieldErrors, validate_email, validate_password, validate_username},
};

/// Create an account with the `user` role
pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<RegisterRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let mut errors = FieldErrors::new();
    errors.check("email", validate_email(payload.email.trim()));
    errors.check("username", validate_username(payload.username.trim()));
    errors.check("password", validate_password(&payload.password));
    let payload = errors.finish(payload)?;

    let user = state.auth_service.register(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("User registered successfully", user)),
    ))
}

/// Exchange email (or username) and password for a bearer token
pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let mut errors = FieldErrors::new();
    if payload.email.trim().is_empty() {
        errors.add("email", "Email or username is required");
    }
    if payload.password.is_empty() {
        errors.add("password", "Password is required");
    }
    let payload = errors.finish(payload)?;

    let session = state.auth_service.login(payload).await?;

    Ok(Json(ApiResponse::new("Login successful", session)))
}
