//! Complaint handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    middleware::{has_role, require_role},
    models::{ApiResponse, AuthUser, CreateComplaintRequest, Page, PaginationQuery, Role},
    state::AppState,
    validation::{FieldErrors, check_page, validate_reason},
};

type ResourceId = WithRejection<Path<Uuid>, ApiError>;
type Pagination = WithRejection<Query<PaginationQuery>, ApiError>;

fn page_of(query: PaginationQuery) -> ApiResult<Page> {
    let mut errors = FieldErrors::new();
    let page = check_page(&mut errors, query.page, query.page_size);
    Ok(errors.finish(page)?)
}

/// File a complaint against a joint
pub async fn file_complaint(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(joint_id), _): ResourceId,
    WithRejection(Json(payload), _): WithRejection<Json<CreateComplaintRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let mut errors = FieldErrors::new();
    errors.check("reason", validate_reason(&payload.reason));
    let payload = errors.finish(payload)?;

    let complaint = state
        .complaint_service
        .file(user.id, joint_id, &payload.reason)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Complaint filed successfully", complaint)),
    ))
}

/// Complaints on a joint; plain users only see their own
pub async fn joint_complaints(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(joint_id), _): ResourceId,
    WithRejection(Query(query), _): Pagination,
) -> ApiResult<impl IntoResponse> {
    let page = page_of(query)?;
    let author = (!has_role(&user, Role::Moderator)).then_some(user.id);

    let complaints = state
        .complaint_service
        .list_by_joint(joint_id, author, page)
        .await?;

    Ok(Json(ApiResponse::new("Complaints retrieved", complaints)))
}

pub async fn list_complaints(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Query(query), _): Pagination,
) -> ApiResult<impl IntoResponse> {
    require_role(&user, Role::Moderator)?;
    let page = page_of(query)?;

    let complaints = state.complaint_service.list_all(page).await?;

    Ok(Json(ApiResponse::new("Complaints retrieved", complaints)))
}

pub async fn my_complaints(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Query(query), _): Pagination,
) -> ApiResult<impl IntoResponse> {
    let page = page_of(query)?;

    let complaints = state.complaint_service.list_by_user(user.id, page).await?;

    Ok(Json(ApiResponse::new("Complaints retrieved", complaints)))
}

pub async fn get_complaint(
    State(state): State<AppState>,
    WithRejection(Path(id), _): ResourceId,
) -> ApiResult<impl IntoResponse> {
    let complaint = state.complaint_service.get(id).await?;

    Ok(Json(ApiResponse::new("Complaint retrieved", complaint)))
}

/// Mark an open complaint resolved
pub async fn resolve_complaint(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(id), _): ResourceId,
) -> ApiResult<impl IntoResponse> {
    require_role(&user, Role::Moderator)?;

    let complaint = state.complaint_service.resolve(id, user.id).await?;

    Ok(Json(ApiResponse::new("Complaint resolved", complaint)))
}
