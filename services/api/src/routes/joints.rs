//! Joint handlers: listings, search, proximity, editing, moderation and votes

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
    middleware::{require_owner_or_role, require_role},
    models::{
        ApiResponse, ApprovalRequest, AuthUser, CreateJointRequest, NearbyQuery,
        PaginationQuery, Role, SearchQuery, UpdateJointRequest, VoteOutcome, VoteRequest,
    },
    state::AppState,
    validation::{
        FieldErrors, check_coordinate, check_page, validate_description, validate_joint_name,
        validate_latitude, validate_longitude, validate_radius,
    },
};

type JointId = WithRejection<Path<Uuid>, ApiError>;

/// Approved joints, newest first
pub async fn list_joints(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<PaginationQuery>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let mut errors = FieldErrors::new();
    let page = check_page(&mut errors, query.page, query.page_size);
    let page = errors.finish(page)?;

    let joints = state.joint_service.list(page).await?;

    Ok(Json(ApiResponse::new("Joints retrieved", joints)))
}

/// Case-insensitive substring search over name and description
pub async fn search_joints(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<SearchQuery>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let mut errors = FieldErrors::new();
    let term = query.q.trim();
    if term.is_empty() {
        errors.add("q", "Search query is required");
    } else if term.chars().count() > 100 {
        errors.add("q", "Search query must be at most 100 characters long");
    }
    let page = check_page(&mut errors, query.page, query.page_size);
    let page = errors.finish(page)?;

    let joints = state.joint_service.search(term, page).await?;

    Ok(Json(ApiResponse::new("Joints retrieved", joints)))
}

/// Approved joints within a radius, nearest first
pub async fn nearby_joints(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<NearbyQuery>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let mut errors = FieldErrors::new();
    let center = check_coordinate(&mut errors, query.latitude, query.longitude);
    let radius = match query.radius {
        Some(radius) => {
            errors.check("radius", validate_radius(radius));
            radius
        }
        None => {
            errors.add("radius", "Radius is required");
            0.0
        }
    };
    let page = check_page(&mut errors, query.page, query.page_size);
    let (center, radius, page) = errors.finish((center, radius, page))?;

    let joints = state.proximity.find_nearby(center, radius, page).await?;

    Ok(Json(ApiResponse::new("Nearby joints retrieved", joints)))
}

pub async fn get_joint(
    State(state): State<AppState>,
    WithRejection(Path(id), _): JointId,
) -> ApiResult<impl IntoResponse> {
    let joint = state.joint_service.get(id).await?;

    Ok(Json(ApiResponse::new("Joint retrieved", joint)))
}

/// Users who voted on a joint
pub async fn joint_voters(
    State(state): State<AppState>,
    WithRejection(Path(id), _): JointId,
    WithRejection(Query(query), _): WithRejection<Query<PaginationQuery>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let mut errors = FieldErrors::new();
    let page = check_page(&mut errors, query.page, query.page_size);
    let page = errors.finish(page)?;

    let voters = state.joint_service.voters(id, page).await?;

    Ok(Json(ApiResponse::new("Voters retrieved", voters)))
}

/// Submit a joint; it stays out of public listings until approved
pub async fn create_joint(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateJointRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let mut errors = FieldErrors::new();
    errors.check("name", validate_joint_name(&payload.name));
    errors.check("latitude", validate_latitude(payload.latitude));
    errors.check("longitude", validate_longitude(payload.longitude));
    errors.check(
        "description",
        validate_description(payload.description.as_deref()),
    );
    let payload = errors.finish(payload)?;

    let joint = state.joint_service.create(&user, payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Joint created successfully", joint)),
    ))
}

/// Edit name, location or description; owner or admin only
pub async fn update_joint(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(id), _): JointId,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateJointRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let joint = state.joint_service.get(id).await?;
    require_owner_or_role(&user, joint.creator_id, Role::Admin)?;

    let changes = payload.apply_to(&joint);

    let mut errors = FieldErrors::new();
    errors.check("name", validate_joint_name(&changes.name));
    errors.check("latitude", validate_latitude(changes.location.latitude));
    errors.check("longitude", validate_longitude(changes.location.longitude));
    errors.check(
        "description",
        validate_description(changes.description.as_deref()),
    );
    let changes = errors.finish(changes)?;

    let joint = state.joint_service.update(id, &changes).await?;

    Ok(Json(ApiResponse::new("Joint updated successfully", joint)))
}

pub async fn delete_joint(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(id), _): JointId,
) -> ApiResult<impl IntoResponse> {
    require_role(&user, Role::Admin)?;

    state.joint_service.delete(id).await?;

    Ok(Json(ApiResponse::message("Joint deleted successfully")))
}

/// Approve or withdraw a joint from public listings
pub async fn set_approval(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(id), _): JointId,
    WithRejection(Json(payload), _): WithRejection<Json<ApprovalRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    require_role(&user, Role::Moderator)?;

    let joint = state.joint_service.set_approval(id, payload.approved).await?;

    Ok(Json(ApiResponse::new("Joint approval updated", joint)))
}

/// Cast or flip the caller's vote
pub async fn vote(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(id), _): JointId,
    WithRejection(Json(payload), _): WithRejection<Json<VoteRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let outcome = state
        .voting
        .apply_vote(user.id, id, payload.direction)
        .await?;

    let response = match outcome {
        VoteOutcome::Applied(joint) => {
            Json(ApiResponse::new("Vote recorded", joint)).into_response()
        }
        VoteOutcome::Unchanged => {
            Json(ApiResponse::message("Vote already recorded")).into_response()
        }
    };

    Ok(response)
}
