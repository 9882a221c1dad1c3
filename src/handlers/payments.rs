use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::services::payments::{CreatePaymentRequest, UpdatePaymentRequest};
use crate::{errors::ServiceError, ApiResponse, AppState, PaginatedResponse};

#[derive(Debug, Deserialize, ToSchema)]
pub struct PaymentListQuery {
    #[serde(default = "crate::default_page")]
    pub page: u64,
    #[serde(default = "crate::default_limit")]
    pub limit: u64,
    pub booking_id: Option<i64>,
}

/// List payments
#[utoipa::path(
    get,
    path = "/api/v1/payments",
    summary = "List payments",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("limit" = Option<u64>, Query, description = "Items per page (default: 20)"),
        ("booking_id" = Option<i64>, Query, description = "Filter by booking"),
    ),
    responses(
        (status = 200, description = "Payments retrieved", body = ApiResponse<PaginatedResponse<crate::entities::payment::Model>>),
    )
)]
pub async fn list_payments(
    State(state): State<AppState>,
    Query(query): Query<PaymentListQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<crate::entities::payment::Model>>>, ServiceError> {
    let limit = crate::clamp_limit(&state, query.limit);
    let result = state
        .services
        .payments
        .list_payments(query.page, limit, query.booking_id)
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        result.payments,
        result.total,
        result.page,
        result.per_page,
    ))))
}

/// Record a payment against a booking
#[utoipa::path(
    post,
    path = "/api/v1/payments",
    summary = "Create payment",
    request_body = CreatePaymentRequest,
    responses(
        (status = 201, description = "Payment recorded", body = ApiResponse<crate::entities::payment::Model>),
        (status = 400, description = "Invalid request data", body = crate::errors::ErrorResponse),
        (status = 404, description = "Booking not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn create_payment(
    State(state): State<AppState>,
    Json(request): Json<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<crate::entities::payment::Model>>), ServiceError> {
    let payment = state.services.payments.create_payment(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(payment))))
}

/// Get a payment
#[utoipa::path(
    get,
    path = "/api/v1/payments/{id}",
    summary = "Get payment",
    params(("id" = i64, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Payment retrieved", body = ApiResponse<crate::entities::payment::Model>),
        (status = 404, description = "Payment not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<crate::entities::payment::Model>>, ServiceError> {
    let payment = state
        .services
        .payments
        .get_payment(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Payment with id {} not found", id)))?;
    Ok(Json(ApiResponse::success(payment)))
}

/// Update a payment record
#[utoipa::path(
    put,
    path = "/api/v1/payments/{id}",
    summary = "Update payment",
    params(("id" = i64, Path, description = "Payment ID")),
    request_body = UpdatePaymentRequest,
    responses(
        (status = 200, description = "Payment updated", body = ApiResponse<crate::entities::payment::Model>),
        (status = 404, description = "Payment not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn update_payment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdatePaymentRequest>,
) -> Result<Json<ApiResponse<crate::entities::payment::Model>>, ServiceError> {
    let payment = state.services.payments.update_payment(id, request).await?;
    Ok(Json(ApiResponse::success(payment)))
}

/// Delete a payment record
#[utoipa::path(
    delete,
    path = "/api/v1/payments/{id}",
    summary = "Delete payment",
    params(("id" = i64, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Payment deleted"),
        (status = 404, description = "Payment not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn delete_payment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.payments.delete_payment(id).await?;
    Ok((
        StatusCode::OK,
        Json(json!({ "message": format!("Payment {} has been deleted", id) })),
    ))
}
