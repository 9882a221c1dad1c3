use crate::{
    db::DbPool,
    entities::vehicle::Entity as VehicleEntity,
    errors::ServiceError,
    services::fees::FeeService,
    services::rates::{rental_days, FallbackSource, RateService},
};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sea_orm::EntityTrait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PriceRequest {
    pub vehicle_id: i64,
    /// Pickup timestamp: RFC 3339, `%Y-%m-%dT%H:%M:%S`, or a bare date
    pub pickup_datetime: String,
    pub dropoff_datetime: String,
    pub pickup_location_id: Option<i64>,
    pub dropoff_location_id: Option<i64>,
}

/// Full price breakdown for a prospective booking.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PriceBreakdown {
    pub vehicle_id: i64,
    pub rental_days: i32,
    pub price_per_day: Decimal,
    pub base_total: Decimal,
    pub one_way_fee: Decimal,
    pub delivery_fee: Decimal,
    pub total_with_fees: Decimal,
    pub currency: String,
    pub rate_id: Option<i64>,
    pub rate_tier_id: Option<i64>,
    /// Set when no rate tier matched and a fallback price source was used
    pub fallback: Option<FallbackSource>,
}

/// Parses a booking timestamp. Accepts RFC 3339, a naive
/// `%Y-%m-%dT%H:%M:%S`, or a bare date (taken at midnight).
pub fn parse_booking_datetime(value: &str) -> Result<NaiveDateTime, ServiceError> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        // Midnight: construction from a parsed date cannot fail
        return Ok(date.and_hms_opt(0, 0, 0).expect("midnight is always valid"));
    }
    Err(ServiceError::InvalidInput(format!(
        "Invalid datetime '{}': expected RFC 3339, YYYY-MM-DDTHH:MM:SS, or YYYY-MM-DD",
        value
    )))
}

/// Combines the rate resolver and the fee lookups into one booking price.
#[derive(Clone)]
pub struct PricingService {
    db_pool: Arc<DbPool>,
    rates: RateService,
    fees: FeeService,
}

impl PricingService {
    pub fn new(db_pool: Arc<DbPool>, rates: RateService, fees: FeeService) -> Self {
        Self {
            db_pool,
            rates,
            fees,
        }
    }

    /// Prices a prospective booking. The only hard failure is an unknown
    /// vehicle; an unpriceable catalog still yields a fallback price.
    #[instrument(skip(self, request), fields(vehicle_id = request.vehicle_id))]
    pub async fn calculate(&self, request: PriceRequest) -> Result<PriceBreakdown, ServiceError> {
        let pickup = parse_booking_datetime(&request.pickup_datetime)?;
        let dropoff = parse_booking_datetime(&request.dropoff_datetime)?;
        if dropoff <= pickup {
            return Err(ServiceError::InvalidInput(
                "dropoff_datetime must be after pickup_datetime".to_string(),
            ));
        }

        let db = &*self.db_pool;
        let vehicle = VehicleEntity::find_by_id(request.vehicle_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Vehicle with id {} not found",
                    request.vehicle_id
                ))
            })?;

        let one_way = self
            .fees
            .one_way_fee(request.pickup_location_id, request.dropoff_location_id)
            .await?;
        let delivery = self
            .fees
            .delivery_fee(&vehicle, request.pickup_location_id)
            .await?;

        let resolution = self.rates.resolve(&vehicle, pickup, dropoff).await?;

        let days = rental_days(pickup, dropoff);
        let base_total = resolution.price_per_day * Decimal::from(days);
        let total_with_fees = base_total + one_way.amount + delivery.amount;

        info!(
            rental_days = days,
            %base_total,
            %total_with_fees,
            fallback = ?resolution.fallback,
            "Booking priced"
        );

        Ok(PriceBreakdown {
            vehicle_id: vehicle.id,
            rental_days: days,
            price_per_day: resolution.price_per_day,
            base_total,
            one_way_fee: one_way.amount,
            delivery_fee: delivery.amount,
            total_with_fees,
            currency: resolution.currency,
            rate_id: resolution.rate_id,
            rate_tier_id: resolution.rate_tier_id,
            fallback: resolution.fallback,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339() {
        let dt = parse_booking_datetime("2026-06-01T10:00:00Z").expect("parse");
        assert_eq!(dt.format("%Y-%m-%d %H:%M").to_string(), "2026-06-01 10:00");
    }

    #[test]
    fn parses_naive_datetime() {
        let dt = parse_booking_datetime("2026-06-01T10:30:00").expect("parse");
        assert_eq!(dt.format("%H:%M").to_string(), "10:30");
    }

    #[test]
    fn parses_bare_date_at_midnight() {
        let dt = parse_booking_datetime("2026-06-01").expect("parse");
        assert_eq!(dt.format("%H:%M:%S").to_string(), "00:00:00");
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_booking_datetime("next tuesday").is_err());
        assert!(parse_booking_datetime("").is_err());
    }
}
