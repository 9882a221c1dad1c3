//! RentFleet API Library
//!
//! Core functionality for the RentFleet car-rental backend: the rate
//! catalog and resolver, fee lookups, the booking price engine, and the
//! booking lifecycle, exposed over an axum HTTP surface.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod services;
pub mod tracing;

use axum::{
    extract::State,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use utoipa::ToSchema;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

// Common query parameters for list endpoints
#[derive(Debug, Deserialize, ToSchema)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

pub(crate) fn default_page() -> u64 {
    1
}
pub(crate) fn default_limit() -> u64 {
    20
}

/// Caps a client-supplied page size at the configured maximum.
pub(crate) fn clamp_limit(state: &AppState, limit: u64) -> u64 {
    limit.clamp(1, u64::from(state.config.api_max_page_size))
}

// Common response wrappers
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Serialize, ToSchema)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl ResponseMeta {
    fn capture() -> Self {
        Self {
            request_id: crate::tracing::current_request_id().map(|rid| rid.as_str().to_string()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, total: u64, page: u64, limit: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total.div_ceil(limit)
        };
        Self {
            items,
            total,
            page,
            limit,
            total_pages,
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn validation_errors(errors: Vec<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some("Validation failed".to_string()),
            errors: Some(errors),
            meta: Some(ResponseMeta::capture()),
        }
    }
}

#[cfg(test)]
mod response_tests {
    use super::*;
    use chrono::DateTime;

    #[tokio::test]
    async fn success_response_includes_request_metadata() {
        let response =
            crate::tracing::scope_request_id(crate::tracing::RequestId::new("meta-123"), async {
                ApiResponse::success("ok")
            })
            .await;

        let meta = response.meta.expect("metadata expected");
        assert_eq!(meta.request_id.as_deref(), Some("meta-123"));
        DateTime::parse_from_rfc3339(&meta.timestamp).expect("timestamp should parse");
    }

    #[tokio::test]
    async fn error_response_includes_request_metadata() {
        let response =
            crate::tracing::scope_request_id(crate::tracing::RequestId::new("meta-err"), async {
                ApiResponse::<()>::error("oops".into())
            })
            .await;

        let meta = response.meta.expect("metadata expected");
        assert_eq!(meta.request_id.as_deref(), Some("meta-err"));
        assert!(!meta.timestamp.is_empty());
    }

    #[test]
    fn paginated_response_computes_total_pages() {
        let page = PaginatedResponse::new(vec![1, 2, 3], 41, 1, 20);
        assert_eq!(page.total_pages, 3);
        let empty = PaginatedResponse::<i32>::new(vec![], 0, 1, 20);
        assert_eq!(empty.total_pages, 0);
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

/// The full `/api/v1` surface.
pub fn api_v1_routes() -> Router<AppState> {
    let rates = Router::new()
        .route(
            "/rates/calculate-price",
            post(handlers::rates::calculate_price),
        )
        .route(
            "/rates",
            get(handlers::rates::list_rates).post(handlers::rates::create_rate),
        )
        .route(
            "/rates/:id",
            get(handlers::rates::get_rate)
                .put(handlers::rates::update_rate)
                .delete(handlers::rates::delete_rate),
        )
        .route(
            "/rates/:id/tiers",
            get(handlers::rates::list_tiers).post(handlers::rates::create_tier),
        )
        .route(
            "/rates/:id/tiers/bulk",
            post(handlers::rates::create_tiers_bulk),
        )
        .route(
            "/rates/:id/tiers/matrix",
            get(handlers::rates::tier_matrix),
        )
        .route(
            "/rates/tiers/:tier_id",
            put(handlers::rates::update_tier).delete(handlers::rates::delete_tier),
        )
        .route(
            "/rates/:id/day-ranges",
            get(handlers::rates::list_day_ranges).post(handlers::rates::create_day_range),
        )
        .route(
            "/rates/day-ranges/:range_id",
            delete(handlers::rates::delete_day_range),
        )
        .route(
            "/rates/:id/hour-ranges",
            get(handlers::rates::list_hour_ranges).post(handlers::rates::create_hour_range),
        )
        .route(
            "/rates/hour-ranges/:range_id",
            delete(handlers::rates::delete_hour_range),
        )
        .route(
            "/rates/:id/km-ranges",
            get(handlers::rates::list_km_ranges).post(handlers::rates::create_km_range),
        )
        .route(
            "/rates/km-ranges/:range_id",
            delete(handlers::rates::delete_km_range),
        );

    let one_way_fees = Router::new()
        .route(
            "/one-way-fees",
            get(handlers::one_way_fees::list_fees).post(handlers::one_way_fees::create_fee),
        )
        .route(
            "/one-way-fees/active",
            get(handlers::one_way_fees::list_active_fees),
        )
        .route(
            "/one-way-fees/calculate",
            get(handlers::one_way_fees::calculate_fee),
        )
        .route(
            "/one-way-fees/:id",
            get(handlers::one_way_fees::get_fee)
                .put(handlers::one_way_fees::update_fee)
                .delete(handlers::one_way_fees::delete_fee),
        );

    let bookings = Router::new()
        .route(
            "/bookings",
            get(handlers::bookings::list_bookings).post(handlers::bookings::create_booking),
        )
        .route(
            "/bookings/:id",
            get(handlers::bookings::get_booking)
                .put(handlers::bookings::update_booking)
                .delete(handlers::bookings::delete_booking),
        );

    let vehicles = Router::new()
        .route(
            "/vehicles",
            get(handlers::vehicles::list_vehicles).post(handlers::vehicles::create_vehicle),
        )
        .route(
            "/vehicles/:id",
            get(handlers::vehicles::get_vehicle)
                .put(handlers::vehicles::update_vehicle)
                .delete(handlers::vehicles::delete_vehicle),
        );

    let vehicle_groups = Router::new()
        .route(
            "/vehicle-groups",
            get(handlers::vehicle_groups::list_groups)
                .post(handlers::vehicle_groups::create_group),
        )
        .route(
            "/vehicle-groups/:id",
            get(handlers::vehicle_groups::get_group)
                .put(handlers::vehicle_groups::update_group)
                .delete(handlers::vehicle_groups::delete_group),
        );

    let locations = Router::new()
        .route(
            "/locations",
            get(handlers::locations::list_locations).post(handlers::locations::create_location),
        )
        .route(
            "/locations/:id",
            get(handlers::locations::get_location)
                .put(handlers::locations::update_location)
                .delete(handlers::locations::delete_location),
        );

    let users = Router::new()
        .route(
            "/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/users/:id",
            get(handlers::users::get_user)
                .put(handlers::users::update_user)
                .delete(handlers::users::deactivate_user),
        );

    let payments = Router::new()
        .route(
            "/payments",
            get(handlers::payments::list_payments).post(handlers::payments::create_payment),
        )
        .route(
            "/payments/:id",
            get(handlers::payments::get_payment)
                .put(handlers::payments::update_payment)
                .delete(handlers::payments::delete_payment),
        );

    Router::new()
        .route("/status", get(api_status))
        .route("/health", get(health_check))
        .merge(rates)
        .merge(one_way_fees)
        .merge(bookings)
        .merge(vehicles)
        .merge(vehicle_groups)
        .merge(locations)
        .merge(users)
        .merge(payments)
}

async fn api_status() -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let version = env!("CARGO_PKG_VERSION");
    let status_data = json!({
        "status": "ok",
        "version": version,
        "service": "rentfleet-api",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "environment": std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
    });

    Ok(Json(ApiResponse::success(status_data)))
}

async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let db_status = match state.db.ping().await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };

    let health_data = json!({
        "status": db_status,
        "checks": {
            "database": db_status,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    Ok(Json(ApiResponse::success(health_data)))
}
