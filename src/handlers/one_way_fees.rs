use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::services::fees::{CreateOneWayFeeRequest, UpdateOneWayFeeRequest};
use crate::{errors::ServiceError, ApiResponse, AppState, PaginatedResponse};

#[derive(Debug, Deserialize, ToSchema)]
pub struct FeeListQuery {
    #[serde(default = "crate::default_page")]
    pub page: u64,
    #[serde(default = "crate::default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CalculateFeeQuery {
    pub from_city: Option<String>,
    pub to_city: Option<String>,
}

/// Quote returned by the public fee calculator.
#[derive(Debug, Serialize, ToSchema)]
pub struct FeeCalculation {
    pub fee_amount: Decimal,
    pub currency: String,
    /// False when the fee is zero (same city, unknown pair, or missing input)
    pub applies: bool,
}

/// List one-way fees
#[utoipa::path(
    get,
    path = "/api/v1/one-way-fees",
    summary = "List one-way fees",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("limit" = Option<u64>, Query, description = "Items per page (default: 20)"),
        ("active" = Option<bool>, Query, description = "Only active fees"),
    ),
    responses(
        (status = 200, description = "Fees retrieved", body = ApiResponse<PaginatedResponse<crate::entities::one_way_fee::Model>>),
    )
)]
pub async fn list_fees(
    State(state): State<AppState>,
    Query(query): Query<FeeListQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<crate::entities::one_way_fee::Model>>>, ServiceError>
{
    let limit = crate::clamp_limit(&state, query.limit);
    let result = state
        .services
        .fees
        .list_fees(query.page, limit, query.active)
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        result.fees,
        result.total,
        result.page,
        result.per_page,
    ))))
}

/// List only the active one-way fees
#[utoipa::path(
    get,
    path = "/api/v1/one-way-fees/active",
    summary = "List active one-way fees",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("limit" = Option<u64>, Query, description = "Items per page (default: 20)"),
    ),
    responses(
        (status = 200, description = "Active fees retrieved", body = ApiResponse<PaginatedResponse<crate::entities::one_way_fee::Model>>),
    )
)]
pub async fn list_active_fees(
    State(state): State<AppState>,
    Query(query): Query<FeeListQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<crate::entities::one_way_fee::Model>>>, ServiceError>
{
    let limit = crate::clamp_limit(&state, query.limit);
    let result = state.services.fees.list_fees(query.page, limit, true).await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        result.fees,
        result.total,
        result.page,
        result.per_page,
    ))))
}

/// Quote the one-way fee between two cities
#[utoipa::path(
    get,
    path = "/api/v1/one-way-fees/calculate",
    summary = "Calculate one-way fee",
    description = "Quote the fee for a pair of cities. Matching is case-insensitive; a same-city or unknown pair quotes zero with `applies = false`.",
    params(
        ("from_city" = Option<String>, Query, description = "Pickup city"),
        ("to_city" = Option<String>, Query, description = "Dropoff city"),
    ),
    responses(
        (status = 200, description = "Fee quoted", body = ApiResponse<FeeCalculation>),
    )
)]
pub async fn calculate_fee(
    State(state): State<AppState>,
    Query(query): Query<CalculateFeeQuery>,
) -> Result<Json<ApiResponse<FeeCalculation>>, ServiceError> {
    let quote = state
        .services
        .fees
        .city_fee(query.from_city.as_deref(), query.to_city.as_deref())
        .await?;
    let applies = quote.applies();
    Ok(Json(ApiResponse::success(FeeCalculation {
        fee_amount: quote.amount,
        currency: quote.currency,
        applies,
    })))
}

/// Get one fee
#[utoipa::path(
    get,
    path = "/api/v1/one-way-fees/{id}",
    summary = "Get one-way fee",
    params(("id" = i64, Path, description = "Fee ID")),
    responses(
        (status = 200, description = "Fee retrieved", body = ApiResponse<crate::entities::one_way_fee::Model>),
        (status = 404, description = "Fee not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn get_fee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<crate::entities::one_way_fee::Model>>, ServiceError> {
    let fee = state
        .services
        .fees
        .get_fee(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("One-way fee with id {} not found", id)))?;
    Ok(Json(ApiResponse::success(fee)))
}

/// Create a fee
#[utoipa::path(
    post,
    path = "/api/v1/one-way-fees",
    summary = "Create one-way fee",
    request_body = CreateOneWayFeeRequest,
    responses(
        (status = 201, description = "Fee created", body = ApiResponse<crate::entities::one_way_fee::Model>),
        (status = 400, description = "Invalid request data", body = crate::errors::ErrorResponse),
        (status = 409, description = "Fee already exists for this city pair", body = crate::errors::ErrorResponse),
    )
)]
pub async fn create_fee(
    State(state): State<AppState>,
    Json(request): Json<CreateOneWayFeeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<crate::entities::one_way_fee::Model>>), ServiceError> {
    let fee = state.services.fees.create_fee(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(fee))))
}

/// Update a fee
#[utoipa::path(
    put,
    path = "/api/v1/one-way-fees/{id}",
    summary = "Update one-way fee",
    params(("id" = i64, Path, description = "Fee ID")),
    request_body = UpdateOneWayFeeRequest,
    responses(
        (status = 200, description = "Fee updated", body = ApiResponse<crate::entities::one_way_fee::Model>),
        (status = 404, description = "Fee not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn update_fee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateOneWayFeeRequest>,
) -> Result<Json<ApiResponse<crate::entities::one_way_fee::Model>>, ServiceError> {
    let fee = state.services.fees.update_fee(id, request).await?;
    Ok(Json(ApiResponse::success(fee)))
}

/// Delete a fee
#[utoipa::path(
    delete,
    path = "/api/v1/one-way-fees/{id}",
    summary = "Delete one-way fee",
    params(("id" = i64, Path, description = "Fee ID")),
    responses(
        (status = 200, description = "Fee deleted"),
        (status = 404, description = "Fee not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn delete_fee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.fees.delete_fee(id).await?;
    Ok((
        StatusCode::OK,
        Json(json!({ "message": format!("One-way fee {} has been deleted", id) })),
    ))
}
