use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::services::locations::{CreateLocationRequest, UpdateLocationRequest};
use crate::{errors::ServiceError, ApiResponse, AppState, ListQuery, PaginatedResponse};

/// List rental stations
#[utoipa::path(
    get,
    path = "/api/v1/locations",
    summary = "List locations",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("limit" = Option<u64>, Query, description = "Items per page (default: 20)"),
    ),
    responses(
        (status = 200, description = "Locations retrieved", body = ApiResponse<PaginatedResponse<crate::entities::location::Model>>),
    )
)]
pub async fn list_locations(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<crate::entities::location::Model>>>, ServiceError> {
    let limit = crate::clamp_limit(&state, query.limit);
    let result = state
        .services
        .locations
        .list_locations(query.page, limit)
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        result.locations,
        result.total,
        result.page,
        result.per_page,
    ))))
}

/// Create a station
#[utoipa::path(
    post,
    path = "/api/v1/locations",
    summary = "Create location",
    request_body = CreateLocationRequest,
    responses(
        (status = 201, description = "Location created", body = ApiResponse<crate::entities::location::Model>),
        (status = 400, description = "Invalid request data", body = crate::errors::ErrorResponse),
    )
)]
pub async fn create_location(
    State(state): State<AppState>,
    Json(request): Json<CreateLocationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<crate::entities::location::Model>>), ServiceError> {
    let location = state.services.locations.create_location(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(location))))
}

/// Get a station
#[utoipa::path(
    get,
    path = "/api/v1/locations/{id}",
    summary = "Get location",
    params(("id" = i64, Path, description = "Location ID")),
    responses(
        (status = 200, description = "Location retrieved", body = ApiResponse<crate::entities::location::Model>),
        (status = 404, description = "Location not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn get_location(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<crate::entities::location::Model>>, ServiceError> {
    let location = state
        .services
        .locations
        .get_location(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Location with id {} not found", id)))?;
    Ok(Json(ApiResponse::success(location)))
}

/// Update a station
#[utoipa::path(
    put,
    path = "/api/v1/locations/{id}",
    summary = "Update location",
    params(("id" = i64, Path, description = "Location ID")),
    request_body = UpdateLocationRequest,
    responses(
        (status = 200, description = "Location updated", body = ApiResponse<crate::entities::location::Model>),
        (status = 404, description = "Location not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn update_location(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateLocationRequest>,
) -> Result<Json<ApiResponse<crate::entities::location::Model>>, ServiceError> {
    let location = state
        .services
        .locations
        .update_location(id, request)
        .await?;
    Ok(Json(ApiResponse::success(location)))
}

/// Delete a station
#[utoipa::path(
    delete,
    path = "/api/v1/locations/{id}",
    summary = "Delete location",
    params(("id" = i64, Path, description = "Location ID")),
    responses(
        (status = 200, description = "Location deleted"),
        (status = 404, description = "Location not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn delete_location(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.locations.delete_location(id).await?;
    Ok((
        StatusCode::OK,
        Json(json!({ "message": format!("Location {} has been deleted", id) })),
    ))
}
