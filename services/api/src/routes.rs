//! API service routes

use std::time::Duration;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, patch, post},
};
use serde_json::json;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::{middleware::auth_middleware, state::AppState};

pub mod auth;
pub mod complaints;
pub mod joints;

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_seconds);

    let protected_routes = Router::new()
        .route("/joints", post(joints::create_joint))
        .route(
            "/joints/:id",
            patch(joints::update_joint).delete(joints::delete_joint),
        )
        .route("/joints/:id/vote", post(joints::vote))
        .route("/joints/:id/approval", patch(joints::set_approval))
        .route(
            "/joints/:id/complaints",
            post(complaints::file_complaint).get(complaints::joint_complaints),
        )
        .route("/complaints", get(complaints::list_complaints))
        .route("/complaints/me", get(complaints::my_complaints))
        .route("/complaints/:id", get(complaints::get_complaint))
        .route("/complaints/:id/resolve", patch(complaints::resolve_complaint))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/joints", get(joints::list_joints))
        .route("/joints/search", get(joints::search_joints))
        .route("/joints/nearby", get(joints::nearby_joints))
        .route("/joints/:id", get(joints::get_joint))
        .route("/joints/:id/voters", get(joints::joint_voters))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database_up = common::database::health_check(&state.db_pool)
        .await
        .unwrap_or(false);

    let status = if database_up {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if database_up { "ok" } else { "degraded" },
            "service": "chow-api",
            "database": if database_up { "up" } else { "down" },
        })),
    )
}
