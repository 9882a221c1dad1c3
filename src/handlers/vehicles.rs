use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::services::vehicles::{CreateVehicleRequest, UpdateVehicleRequest};
use crate::{errors::ServiceError, ApiResponse, AppState, PaginatedResponse};

#[derive(Debug, Deserialize, ToSchema)]
pub struct VehicleListQuery {
    #[serde(default = "crate::default_page")]
    pub page: u64,
    #[serde(default = "crate::default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub active: bool,
}

/// List vehicles
#[utoipa::path(
    get,
    path = "/api/v1/vehicles",
    summary = "List vehicles",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("limit" = Option<u64>, Query, description = "Items per page (default: 20)"),
        ("active" = Option<bool>, Query, description = "Only active vehicles"),
    ),
    responses(
        (status = 200, description = "Vehicles retrieved", body = ApiResponse<PaginatedResponse<crate::entities::vehicle::Model>>),
    )
)]
pub async fn list_vehicles(
    State(state): State<AppState>,
    Query(query): Query<VehicleListQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<crate::entities::vehicle::Model>>>, ServiceError> {
    let limit = crate::clamp_limit(&state, query.limit);
    let result = state
        .services
        .vehicles
        .list_vehicles(query.page, limit, query.active)
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        result.vehicles,
        result.total,
        result.page,
        result.per_page,
    ))))
}

/// Create a vehicle
#[utoipa::path(
    post,
    path = "/api/v1/vehicles",
    summary = "Create vehicle",
    request_body = CreateVehicleRequest,
    responses(
        (status = 201, description = "Vehicle created", body = ApiResponse<crate::entities::vehicle::Model>),
        (status = 400, description = "Invalid request data", body = crate::errors::ErrorResponse),
        (status = 409, description = "Duplicate VIN or plate", body = crate::errors::ErrorResponse),
    )
)]
pub async fn create_vehicle(
    State(state): State<AppState>,
    Json(request): Json<CreateVehicleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<crate::entities::vehicle::Model>>), ServiceError> {
    let vehicle = state.services.vehicles.create_vehicle(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(vehicle))))
}

/// Get a vehicle
#[utoipa::path(
    get,
    path = "/api/v1/vehicles/{id}",
    summary = "Get vehicle",
    params(("id" = i64, Path, description = "Vehicle ID")),
    responses(
        (status = 200, description = "Vehicle retrieved", body = ApiResponse<crate::entities::vehicle::Model>),
        (status = 404, description = "Vehicle not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<crate::entities::vehicle::Model>>, ServiceError> {
    let vehicle = state
        .services
        .vehicles
        .get_vehicle(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Vehicle with id {} not found", id)))?;
    Ok(Json(ApiResponse::success(vehicle)))
}

/// Update a vehicle
#[utoipa::path(
    put,
    path = "/api/v1/vehicles/{id}",
    summary = "Update vehicle",
    params(("id" = i64, Path, description = "Vehicle ID")),
    request_body = UpdateVehicleRequest,
    responses(
        (status = 200, description = "Vehicle updated", body = ApiResponse<crate::entities::vehicle::Model>),
        (status = 404, description = "Vehicle not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn update_vehicle(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateVehicleRequest>,
) -> Result<Json<ApiResponse<crate::entities::vehicle::Model>>, ServiceError> {
    let vehicle = state.services.vehicles.update_vehicle(id, request).await?;
    Ok(Json(ApiResponse::success(vehicle)))
}

/// Delete a vehicle
#[utoipa::path(
    delete,
    path = "/api/v1/vehicles/{id}",
    summary = "Delete vehicle",
    params(("id" = i64, Path, description = "Vehicle ID")),
    responses(
        (status = 200, description = "Vehicle deleted"),
        (status = 404, description = "Vehicle not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn delete_vehicle(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.vehicles.delete_vehicle(id).await?;
    Ok((
        StatusCode::OK,
        Json(json!({ "message": format!("Vehicle {} has been deleted", id) })),
    ))
}
