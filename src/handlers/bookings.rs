use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use validator::Validate;

use crate::entities::booking::BookingStatus;
use crate::handlers::collect_validation_errors;
use crate::services::bookings::{CreateBookingRequest, UpdateBookingRequest};
use crate::{errors::ServiceError, ApiResponse, AppState, PaginatedResponse};

#[derive(Debug, Deserialize, ToSchema)]
pub struct BookingListQuery {
    #[serde(default = "crate::default_page")]
    pub page: u64,
    #[serde(default = "crate::default_limit")]
    pub limit: u64,
    pub status: Option<BookingStatus>,
}

/// List bookings
#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    summary = "List bookings",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("limit" = Option<u64>, Query, description = "Items per page (default: 20)"),
        ("status" = Option<String>, Query, description = "Filter by booking status"),
    ),
    responses(
        (status = 200, description = "Bookings retrieved", body = ApiResponse<PaginatedResponse<crate::entities::booking::Model>>),
    )
)]
pub async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<BookingListQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<crate::entities::booking::Model>>>, ServiceError> {
    let limit = crate::clamp_limit(&state, query.limit);
    let result = state
        .services
        .bookings
        .list_bookings(query.page, limit, query.status)
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        result.bookings,
        result.total,
        result.page,
        result.per_page,
    ))))
}

/// Create a booking
#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    summary = "Create booking",
    description = "Create a booking. The contact is matched to an existing user by email, then phone, or a guest user is created; when a vehicle and both timestamps are given the price is snapshotted onto the booking.",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created", body = ApiResponse<crate::entities::booking::Model>),
        (status = 400, description = "Invalid request data", body = crate::errors::ErrorResponse),
        (status = 409, description = "Conflicting user data", body = crate::errors::ErrorResponse),
    )
)]
pub async fn create_booking(
    State(state): State<AppState>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<crate::entities::booking::Model>>), ServiceError> {
    if let Err(validation_errors) = request.validate() {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::validation_errors(collect_validation_errors(
                &validation_errors,
            ))),
        ));
    }
    let booking = state.services.bookings.create_booking(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(booking))))
}

/// Get a booking
#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}",
    summary = "Get booking",
    params(("id" = i64, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking retrieved", body = ApiResponse<crate::entities::booking::Model>),
        (status = 404, description = "Booking not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<crate::entities::booking::Model>>, ServiceError> {
    let booking = state
        .services
        .bookings
        .get_booking(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Booking with id {} not found", id)))?;
    Ok(Json(ApiResponse::success(booking)))
}

/// Update a booking
#[utoipa::path(
    put,
    path = "/api/v1/bookings/{id}",
    summary = "Update booking",
    description = "Update a booking. A location change recomputes the one-way fee and total; the per-day price and rate snapshot from creation are kept.",
    params(("id" = i64, Path, description = "Booking ID")),
    request_body = UpdateBookingRequest,
    responses(
        (status = 200, description = "Booking updated", body = ApiResponse<crate::entities::booking::Model>),
        (status = 400, description = "Invalid request data", body = crate::errors::ErrorResponse),
        (status = 404, description = "Booking not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn update_booking(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateBookingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<crate::entities::booking::Model>>), ServiceError> {
    if let Err(validation_errors) = request.validate() {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::validation_errors(collect_validation_errors(
                &validation_errors,
            ))),
        ));
    }
    let booking = state.services.bookings.update_booking(id, request).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(booking))))
}

/// Delete a booking
#[utoipa::path(
    delete,
    path = "/api/v1/bookings/{id}",
    summary = "Delete booking",
    params(("id" = i64, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking deleted"),
        (status = 404, description = "Booking not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.bookings.delete_booking(id).await?;
    Ok((
        StatusCode::OK,
        Json(json!({ "message": format!("Booking {} has been deleted", id) })),
    ))
}
