use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::services::pricing::{PriceBreakdown, PriceRequest};
use crate::services::rates::{
    CreateRangeRequest, CreateRateRequest, CreateRateTierRequest, MatrixCell,
    UpdateRateRequest, UpdateRateTierRequest,
};
use crate::{errors::ServiceError, ApiResponse, AppState, PaginatedResponse};

#[derive(Debug, Deserialize, ToSchema)]
pub struct RateListQuery {
    #[serde(default = "crate::default_page")]
    pub page: u64,
    #[serde(default = "crate::default_limit")]
    pub limit: u64,
    /// When true, only rates with `is_active = true` are returned
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GetRateQuery {
    #[serde(default)]
    pub include_tiers: bool,
}

/// Price breakdown as served over HTTP. The numeric fields are always
/// present; `error` appears only when fallback pricing was used, while the
/// status stays 200.
#[derive(Debug, Serialize, ToSchema)]
pub struct CalculatePriceResponse {
    #[serde(flatten)]
    pub breakdown: PriceBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Calculate a booking price
#[utoipa::path(
    post,
    path = "/api/v1/rates/calculate-price",
    summary = "Calculate booking price",
    description = "Price a prospective booking. Responds 200 even when no rate matched; fallback pricing is flagged via the `error` field.",
    request_body = PriceRequest,
    responses(
        (status = 200, description = "Price calculated", body = CalculatePriceResponse),
        (status = 400, description = "Invalid request data", body = crate::errors::ErrorResponse),
        (status = 404, description = "Vehicle not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    )
)]
pub async fn calculate_price(
    State(state): State<AppState>,
    Json(request): Json<PriceRequest>,
) -> Result<Json<CalculatePriceResponse>, ServiceError> {
    let breakdown = state.services.pricing.calculate(request).await?;
    let error = breakdown.fallback.as_ref().map(|_| {
        "No active rate found for the requested vehicle and period; fallback pricing applied"
            .to_string()
    });
    Ok(Json(CalculatePriceResponse { breakdown, error }))
}

/// List rates
#[utoipa::path(
    get,
    path = "/api/v1/rates",
    summary = "List rates",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("limit" = Option<u64>, Query, description = "Items per page (default: 20)"),
        ("active" = Option<bool>, Query, description = "Only active rates"),
    ),
    responses(
        (status = 200, description = "Rates retrieved", body = ApiResponse<PaginatedResponse<crate::entities::rate::Model>>),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    )
)]
pub async fn list_rates(
    State(state): State<AppState>,
    Query(query): Query<RateListQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<crate::entities::rate::Model>>>, ServiceError> {
    let limit = crate::clamp_limit(&state, query.limit);
    let result = state
        .services
        .rates
        .list_rates(query.page, limit, query.active)
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        result.rates,
        result.total,
        result.page,
        result.per_page,
    ))))
}

/// Create a rate
#[utoipa::path(
    post,
    path = "/api/v1/rates",
    summary = "Create rate",
    request_body = CreateRateRequest,
    responses(
        (status = 201, description = "Rate created", body = ApiResponse<crate::entities::rate::Model>),
        (status = 400, description = "Invalid request data", body = crate::errors::ErrorResponse),
        (status = 409, description = "Duplicate rate name", body = crate::errors::ErrorResponse),
    )
)]
pub async fn create_rate(
    State(state): State<AppState>,
    Json(request): Json<CreateRateRequest>,
) -> Result<(StatusCode, Json<ApiResponse<crate::entities::rate::Model>>), ServiceError> {
    let rate = state.services.rates.create_rate(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(rate))))
}

/// Get a rate, optionally with its tiers attached
#[utoipa::path(
    get,
    path = "/api/v1/rates/{id}",
    summary = "Get rate",
    params(
        ("id" = i64, Path, description = "Rate ID"),
        ("include_tiers" = Option<bool>, Query, description = "Attach the rate's tiers"),
    ),
    responses(
        (status = 200, description = "Rate retrieved", body = ApiResponse<crate::services::rates::RateWithTiers>),
        (status = 404, description = "Rate not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn get_rate(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<GetRateQuery>,
) -> Result<Response, ServiceError> {
    if query.include_tiers {
        let rate = state.services.rates.get_rate_with_tiers(id).await?;
        return Ok(Json(ApiResponse::success(rate)).into_response());
    }
    let rate = state
        .services
        .rates
        .get_rate(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Rate with id {} not found", id)))?;
    Ok(Json(ApiResponse::success(rate)).into_response())
}

/// Update a rate
#[utoipa::path(
    put,
    path = "/api/v1/rates/{id}",
    summary = "Update rate",
    params(("id" = i64, Path, description = "Rate ID")),
    request_body = UpdateRateRequest,
    responses(
        (status = 200, description = "Rate updated", body = ApiResponse<crate::entities::rate::Model>),
        (status = 404, description = "Rate not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn update_rate(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateRateRequest>,
) -> Result<Json<ApiResponse<crate::entities::rate::Model>>, ServiceError> {
    let rate = state.services.rates.update_rate(id, request).await?;
    Ok(Json(ApiResponse::success(rate)))
}

/// Delete a rate together with its tiers and ranges
#[utoipa::path(
    delete,
    path = "/api/v1/rates/{id}",
    summary = "Delete rate",
    params(("id" = i64, Path, description = "Rate ID")),
    responses(
        (status = 200, description = "Rate deleted"),
        (status = 404, description = "Rate not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn delete_rate(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.rates.delete_rate(id).await?;
    Ok((
        StatusCode::OK,
        Json(json!({ "message": format!("Rate {} has been deleted", id) })),
    ))
}

/// List a rate's tiers
#[utoipa::path(
    get,
    path = "/api/v1/rates/{id}/tiers",
    summary = "List rate tiers",
    params(("id" = i64, Path, description = "Rate ID")),
    responses(
        (status = 200, description = "Tiers retrieved", body = ApiResponse<Vec<crate::entities::rate_tier::Model>>),
        (status = 404, description = "Rate not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn list_tiers(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<crate::entities::rate_tier::Model>>>, ServiceError> {
    let tiers = state.services.rates.list_tiers(id).await?;
    Ok(Json(ApiResponse::success(tiers)))
}

/// Create one tier under a rate
#[utoipa::path(
    post,
    path = "/api/v1/rates/{id}/tiers",
    summary = "Create rate tier",
    params(("id" = i64, Path, description = "Rate ID")),
    request_body = CreateRateTierRequest,
    responses(
        (status = 201, description = "Tier created", body = ApiResponse<crate::entities::rate_tier::Model>),
        (status = 400, description = "Invalid tier bounds", body = crate::errors::ErrorResponse),
        (status = 404, description = "Rate not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn create_tier(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<CreateRateTierRequest>,
) -> Result<(StatusCode, Json<ApiResponse<crate::entities::rate_tier::Model>>), ServiceError> {
    let tier = state.services.rates.create_tier(id, request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(tier))))
}

/// Create several tiers under a rate in one transaction
#[utoipa::path(
    post,
    path = "/api/v1/rates/{id}/tiers/bulk",
    summary = "Bulk create rate tiers",
    params(("id" = i64, Path, description = "Rate ID")),
    request_body = Vec<CreateRateTierRequest>,
    responses(
        (status = 201, description = "Tiers created", body = ApiResponse<Vec<crate::entities::rate_tier::Model>>),
        (status = 400, description = "Invalid tier bounds", body = crate::errors::ErrorResponse),
        (status = 404, description = "Rate not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn create_tiers_bulk(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(requests): Json<Vec<CreateRateTierRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<crate::entities::rate_tier::Model>>>), ServiceError>
{
    let tiers = state.services.rates.create_tiers_bulk(id, requests).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(tiers))))
}

/// Vehicle-group by day-range price matrix for a rate
#[utoipa::path(
    get,
    path = "/api/v1/rates/{id}/tiers/matrix",
    summary = "Rate tier matrix",
    description = "Price per day for every vehicle group and day range of the rate; cells without a covering tier are empty.",
    params(("id" = i64, Path, description = "Rate ID")),
    responses(
        (status = 200, description = "Matrix retrieved", body = ApiResponse<Vec<MatrixCell>>),
        (status = 404, description = "Rate not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn tier_matrix(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<MatrixCell>>>, ServiceError> {
    let matrix = state.services.rates.tier_matrix(id).await?;
    Ok(Json(ApiResponse::success(matrix)))
}

/// Update a tier
#[utoipa::path(
    put,
    path = "/api/v1/rates/tiers/{tier_id}",
    summary = "Update rate tier",
    params(("tier_id" = i64, Path, description = "Tier ID")),
    request_body = UpdateRateTierRequest,
    responses(
        (status = 200, description = "Tier updated", body = ApiResponse<crate::entities::rate_tier::Model>),
        (status = 404, description = "Tier not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn update_tier(
    State(state): State<AppState>,
    Path(tier_id): Path<i64>,
    Json(request): Json<UpdateRateTierRequest>,
) -> Result<Json<ApiResponse<crate::entities::rate_tier::Model>>, ServiceError> {
    let tier = state.services.rates.update_tier(tier_id, request).await?;
    Ok(Json(ApiResponse::success(tier)))
}

/// Delete a tier
#[utoipa::path(
    delete,
    path = "/api/v1/rates/tiers/{tier_id}",
    summary = "Delete rate tier",
    params(("tier_id" = i64, Path, description = "Tier ID")),
    responses(
        (status = 200, description = "Tier deleted"),
        (status = 404, description = "Tier not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn delete_tier(
    State(state): State<AppState>,
    Path(tier_id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.rates.delete_tier(tier_id).await?;
    Ok((
        StatusCode::OK,
        Json(json!({ "message": format!("Tier {} has been deleted", tier_id) })),
    ))
}

/// List a rate's day ranges
#[utoipa::path(
    get,
    path = "/api/v1/rates/{id}/day-ranges",
    summary = "List rate day ranges",
    params(("id" = i64, Path, description = "Rate ID")),
    responses(
        (status = 200, description = "Day ranges retrieved", body = ApiResponse<Vec<crate::entities::rate_day_range::Model>>),
        (status = 404, description = "Rate not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn list_day_ranges(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<crate::entities::rate_day_range::Model>>>, ServiceError> {
    let ranges = state.services.rates.list_day_ranges(id).await?;
    Ok(Json(ApiResponse::success(ranges)))
}

/// Create a day range under a rate
#[utoipa::path(
    post,
    path = "/api/v1/rates/{id}/day-ranges",
    summary = "Create rate day range",
    params(("id" = i64, Path, description = "Rate ID")),
    request_body = CreateRangeRequest,
    responses(
        (status = 201, description = "Day range created", body = ApiResponse<crate::entities::rate_day_range::Model>),
        (status = 404, description = "Rate not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn create_day_range(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<CreateRangeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<crate::entities::rate_day_range::Model>>), ServiceError>
{
    let range = state.services.rates.create_day_range(id, request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(range))))
}

/// Delete a day range
#[utoipa::path(
    delete,
    path = "/api/v1/rates/day-ranges/{range_id}",
    summary = "Delete rate day range",
    params(("range_id" = i64, Path, description = "Day range ID")),
    responses(
        (status = 200, description = "Day range deleted"),
        (status = 404, description = "Day range not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn delete_day_range(
    State(state): State<AppState>,
    Path(range_id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.rates.delete_day_range(range_id).await?;
    Ok((
        StatusCode::OK,
        Json(json!({ "message": format!("Day range {} has been deleted", range_id) })),
    ))
}

/// List a rate's hour ranges
pub async fn list_hour_ranges(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<crate::entities::rate_hour_range::Model>>>, ServiceError> {
    let ranges = state.services.rates.list_hour_ranges(id).await?;
    Ok(Json(ApiResponse::success(ranges)))
}

/// Create an hour range under a rate
pub async fn create_hour_range(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<CreateRangeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<crate::entities::rate_hour_range::Model>>), ServiceError>
{
    let range = state.services.rates.create_hour_range(id, request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(range))))
}

/// Delete an hour range
pub async fn delete_hour_range(
    State(state): State<AppState>,
    Path(range_id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.rates.delete_hour_range(range_id).await?;
    Ok((
        StatusCode::OK,
        Json(json!({ "message": format!("Hour range {} has been deleted", range_id) })),
    ))
}

/// List a rate's kilometre ranges
pub async fn list_km_ranges(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<crate::entities::rate_km_range::Model>>>, ServiceError> {
    let ranges = state.services.rates.list_km_ranges(id).await?;
    Ok(Json(ApiResponse::success(ranges)))
}

/// Create a kilometre range under a rate
pub async fn create_km_range(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<CreateRangeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<crate::entities::rate_km_range::Model>>), ServiceError>
{
    let range = state.services.rates.create_km_range(id, request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(range))))
}

/// Delete a kilometre range
pub async fn delete_km_range(
    State(state): State<AppState>,
    Path(range_id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.rates.delete_km_range(range_id).await?;
    Ok((
        StatusCode::OK,
        Json(json!({ "message": format!("Km range {} has been deleted", range_id) })),
    ))
}
