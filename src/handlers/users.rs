use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;
use validator::Validate;

use crate::handlers::collect_validation_errors;
use crate::services::users::{CreateUserRequest, UpdateUserRequest};
use crate::{errors::ServiceError, ApiResponse, AppState, ListQuery, PaginatedResponse};

/// List users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    summary = "List users",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("limit" = Option<u64>, Query, description = "Items per page (default: 20)"),
    ),
    responses(
        (status = 200, description = "Users retrieved", body = ApiResponse<PaginatedResponse<crate::entities::user::Model>>),
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<crate::entities::user::Model>>>, ServiceError> {
    let limit = crate::clamp_limit(&state, query.limit);
    let result = state.services.users.list_users(query.page, limit).await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        result.users,
        result.total,
        result.page,
        result.per_page,
    ))))
}

/// Create a user
#[utoipa::path(
    post,
    path = "/api/v1/users",
    summary = "Create user",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<crate::entities::user::Model>),
        (status = 400, description = "Invalid request data", body = crate::errors::ErrorResponse),
        (status = 409, description = "Duplicate email", body = crate::errors::ErrorResponse),
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<crate::entities::user::Model>>), ServiceError> {
    if let Err(validation_errors) = request.validate() {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::validation_errors(collect_validation_errors(
                &validation_errors,
            ))),
        ));
    }
    let user = state.services.users.create_user(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(user))))
}

/// Get a user
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    summary = "Get user",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User retrieved", body = ApiResponse<crate::entities::user::Model>),
        (status = 404, description = "User not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<crate::entities::user::Model>>, ServiceError> {
    let user = state
        .services
        .users
        .get_user(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("User with id {} not found", id)))?;
    Ok(Json(ApiResponse::success(user)))
}

/// Update a user
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    summary = "Update user",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<crate::entities::user::Model>),
        (status = 400, description = "Invalid request data", body = crate::errors::ErrorResponse),
        (status = 404, description = "User not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<crate::entities::user::Model>>), ServiceError> {
    if let Err(validation_errors) = request.validate() {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::validation_errors(collect_validation_errors(
                &validation_errors,
            ))),
        ));
    }
    let user = state.services.users.update_user(id, request).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(user))))
}

/// Deactivate a user. Rows are kept for booking history.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    summary = "Deactivate user",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deactivated"),
        (status = 404, description = "User not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn deactivate_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.users.deactivate_user(id).await?;
    Ok((
        StatusCode::OK,
        Json(json!({ "message": format!("User {} has been deactivated", id) })),
    ))
}
