use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::services::vehicle_groups::{CreateVehicleGroupRequest, UpdateVehicleGroupRequest};
use crate::{errors::ServiceError, ApiResponse, AppState, PaginatedResponse};

#[derive(Debug, Deserialize, ToSchema)]
pub struct VehicleGroupListQuery {
    #[serde(default = "crate::default_page")]
    pub page: u64,
    #[serde(default = "crate::default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub active: bool,
}

/// List vehicle groups
#[utoipa::path(
    get,
    path = "/api/v1/vehicle-groups",
    summary = "List vehicle groups",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("limit" = Option<u64>, Query, description = "Items per page (default: 20)"),
        ("active" = Option<bool>, Query, description = "Only active groups"),
    ),
    responses(
        (status = 200, description = "Groups retrieved", body = ApiResponse<PaginatedResponse<crate::entities::vehicle_group::Model>>),
    )
)]
pub async fn list_groups(
    State(state): State<AppState>,
    Query(query): Query<VehicleGroupListQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<crate::entities::vehicle_group::Model>>>, ServiceError>
{
    let limit = crate::clamp_limit(&state, query.limit);
    let result = state
        .services
        .vehicle_groups
        .list_groups(query.page, limit, query.active)
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        result.vehicle_groups,
        result.total,
        result.page,
        result.per_page,
    ))))
}

/// Create a vehicle group
#[utoipa::path(
    post,
    path = "/api/v1/vehicle-groups",
    summary = "Create vehicle group",
    request_body = CreateVehicleGroupRequest,
    responses(
        (status = 201, description = "Group created", body = ApiResponse<crate::entities::vehicle_group::Model>),
        (status = 400, description = "Invalid request data", body = crate::errors::ErrorResponse),
        (status = 409, description = "Duplicate group name", body = crate::errors::ErrorResponse),
    )
)]
pub async fn create_group(
    State(state): State<AppState>,
    Json(request): Json<CreateVehicleGroupRequest>,
) -> Result<(StatusCode, Json<ApiResponse<crate::entities::vehicle_group::Model>>), ServiceError> {
    let group = state.services.vehicle_groups.create_group(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(group))))
}

/// Get a vehicle group
#[utoipa::path(
    get,
    path = "/api/v1/vehicle-groups/{id}",
    summary = "Get vehicle group",
    params(("id" = i64, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Group retrieved", body = ApiResponse<crate::entities::vehicle_group::Model>),
        (status = 404, description = "Group not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn get_group(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<crate::entities::vehicle_group::Model>>, ServiceError> {
    let group = state
        .services
        .vehicle_groups
        .get_group(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Vehicle group with id {} not found", id)))?;
    Ok(Json(ApiResponse::success(group)))
}

/// Update a vehicle group
#[utoipa::path(
    put,
    path = "/api/v1/vehicle-groups/{id}",
    summary = "Update vehicle group",
    params(("id" = i64, Path, description = "Group ID")),
    request_body = UpdateVehicleGroupRequest,
    responses(
        (status = 200, description = "Group updated", body = ApiResponse<crate::entities::vehicle_group::Model>),
        (status = 404, description = "Group not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn update_group(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateVehicleGroupRequest>,
) -> Result<Json<ApiResponse<crate::entities::vehicle_group::Model>>, ServiceError> {
    let group = state
        .services
        .vehicle_groups
        .update_group(id, request)
        .await?;
    Ok(Json(ApiResponse::success(group)))
}

/// Delete a vehicle group
#[utoipa::path(
    delete,
    path = "/api/v1/vehicle-groups/{id}",
    summary = "Delete vehicle group",
    params(("id" = i64, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Group deleted"),
        (status = 404, description = "Group not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn delete_group(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.vehicle_groups.delete_group(id).await?;
    Ok((
        StatusCode::OK,
        Json(json!({ "message": format!("Vehicle group {} has been deleted", id) })),
    ))
}
