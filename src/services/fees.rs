use crate::{
    db::DbPool,
    entities::location::Entity as LocationEntity,
    entities::one_way_fee::{
        self, ActiveModel as FeeActiveModel, Entity as FeeEntity, Model as FeeModel,
    },
    entities::vehicle,
    errors::ServiceError,
    events::{Event, EventSender},
    services::rates::DEFAULT_CURRENCY,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

/// A priced fee lookup. `amount` is zero when no fee applies; the lookup
/// itself never fails for unknown cities.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeeQuote {
    pub amount: Decimal,
    pub currency: String,
}

impl FeeQuote {
    pub fn zero() -> Self {
        Self {
            amount: Decimal::ZERO,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }

    pub fn applies(&self) -> bool {
        self.amount > Decimal::ZERO
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateOneWayFeeRequest {
    #[validate(length(min = 1, message = "from_city is required"))]
    pub from_city: String,
    #[validate(length(min = 1, message = "to_city is required"))]
    pub to_city: String,
    pub fee_amount: Decimal,
    pub currency: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateOneWayFeeRequest {
    pub from_city: Option<String>,
    pub to_city: Option<String>,
    pub fee_amount: Option<Decimal>,
    pub currency: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OneWayFeeListResponse {
    pub fees: Vec<FeeModel>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// Service owning the one-way fee table and the directional fee lookups.
#[derive(Clone)]
pub struct FeeService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl FeeService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Directional city-pair fee. Missing or equal cities (compared
    /// case-insensitively) short-circuit to a zero quote without touching
    /// the database; an unknown pair also quotes zero.
    #[instrument(skip(self))]
    pub async fn city_fee(
        &self,
        from_city: Option<&str>,
        to_city: Option<&str>,
    ) -> Result<FeeQuote, ServiceError> {
        let (from, to) = match (from_city, to_city) {
            (Some(from), Some(to)) => (from.trim(), to.trim()),
            _ => return Ok(FeeQuote::zero()),
        };
        if from.is_empty() || to.is_empty() || from.eq_ignore_ascii_case(to) {
            return Ok(FeeQuote::zero());
        }

        let db = &*self.db_pool;
        let fee = FeeEntity::find()
            .filter(one_way_fee::Column::IsActive.eq(true))
            .filter(
                Expr::expr(Func::lower(Expr::col(one_way_fee::Column::FromCity)))
                    .eq(from.to_lowercase()),
            )
            .filter(
                Expr::expr(Func::lower(Expr::col(one_way_fee::Column::ToCity)))
                    .eq(to.to_lowercase()),
            )
            .one(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to look up one-way fee");
                ServiceError::DatabaseError(e)
            })?;

        Ok(match fee {
            Some(fee) => FeeQuote {
                amount: fee.fee_amount,
                currency: fee.currency,
            },
            None => FeeQuote::zero(),
        })
    }

    /// One-way fee between two stations. Equal or missing location ids never
    /// trigger a lookup.
    #[instrument(skip(self))]
    pub async fn one_way_fee(
        &self,
        pickup_location_id: Option<i64>,
        dropoff_location_id: Option<i64>,
    ) -> Result<FeeQuote, ServiceError> {
        let (pickup_id, dropoff_id) = match (pickup_location_id, dropoff_location_id) {
            (Some(p), Some(d)) if p != d => (p, d),
            _ => return Ok(FeeQuote::zero()),
        };

        let db = &*self.db_pool;
        let pickup = LocationEntity::find_by_id(pickup_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let dropoff = LocationEntity::find_by_id(dropoff_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        match (pickup, dropoff) {
            (Some(pickup), Some(dropoff)) => {
                self.city_fee(Some(&pickup.city), Some(&dropoff.city)).await
            }
            _ => Ok(FeeQuote::zero()),
        }
    }

    /// Fee for bringing a vehicle from its home station to the pickup
    /// station. Zero when the vehicle has no home location or is already
    /// stationed at the pickup location.
    #[instrument(skip(self, vehicle), fields(vehicle_id = vehicle.id))]
    pub async fn delivery_fee(
        &self,
        vehicle: &vehicle::Model,
        pickup_location_id: Option<i64>,
    ) -> Result<FeeQuote, ServiceError> {
        let home_id = match vehicle.location_id {
            Some(id) => id,
            None => return Ok(FeeQuote::zero()),
        };
        let pickup_id = match pickup_location_id {
            Some(id) if id != home_id => id,
            _ => return Ok(FeeQuote::zero()),
        };

        let db = &*self.db_pool;
        let home = LocationEntity::find_by_id(home_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let pickup = LocationEntity::find_by_id(pickup_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        match (home, pickup) {
            (Some(home), Some(pickup)) => {
                self.city_fee(Some(&home.city), Some(&pickup.city)).await
            }
            _ => Ok(FeeQuote::zero()),
        }
    }

    #[instrument(skip(self, request), fields(from_city = %request.from_city, to_city = %request.to_city))]
    pub async fn create_fee(
        &self,
        request: CreateOneWayFeeRequest,
    ) -> Result<FeeModel, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;
        if request.fee_amount < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "fee_amount must not be negative".to_string(),
            ));
        }

        let db = &*self.db_pool;
        let fee = FeeActiveModel {
            from_city: Set(request.from_city.clone()),
            to_city: Set(request.to_city.clone()),
            fee_amount: Set(request.fee_amount),
            currency: Set(request
                .currency
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string())),
            is_active: Set(request.is_active),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
            ..Default::default()
        };

        let model = fee.insert(db).await.map_err(|e| {
            if matches!(e.sql_err(), Some(sea_orm::SqlErr::UniqueConstraintViolation(_))) {
                ServiceError::Conflict(format!(
                    "One-way fee {} -> {} already exists",
                    request.from_city, request.to_city
                ))
            } else {
                error!(error = %e, "Failed to create one-way fee");
                ServiceError::DatabaseError(e)
            }
        })?;

        info!(fee_id = model.id, "One-way fee created");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::OneWayFeeCreated(model.id)).await {
                warn!(error = %e, fee_id = model.id, "Failed to send fee created event");
            }
        }

        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn get_fee(&self, fee_id: i64) -> Result<Option<FeeModel>, ServiceError> {
        let db = &*self.db_pool;
        FeeEntity::find_by_id(fee_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn list_fees(
        &self,
        page: u64,
        per_page: u64,
        active_only: bool,
    ) -> Result<OneWayFeeListResponse, ServiceError> {
        let db = &*self.db_pool;

        let mut query = FeeEntity::find();
        if active_only {
            query = query.filter(one_way_fee::Column::IsActive.eq(true));
        }
        let paginator = query
            .order_by_asc(one_way_fee::Column::FromCity)
            .order_by_asc(one_way_fee::Column::ToCity)
            .paginate(db, per_page);

        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::DatabaseError)?;
        let fees = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(OneWayFeeListResponse {
            fees,
            total,
            page,
            per_page,
        })
    }

    #[instrument(skip(self, request))]
    pub async fn update_fee(
        &self,
        fee_id: i64,
        request: UpdateOneWayFeeRequest,
    ) -> Result<FeeModel, ServiceError> {
        let db = &*self.db_pool;

        let fee = self.get_fee(fee_id).await?.ok_or_else(|| {
            ServiceError::NotFound(format!("One-way fee with id {} not found", fee_id))
        })?;

        if let Some(amount) = request.fee_amount {
            if amount < Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "fee_amount must not be negative".to_string(),
                ));
            }
        }

        let mut active: FeeActiveModel = fee.into();
        if let Some(from_city) = request.from_city {
            active.from_city = Set(from_city);
        }
        if let Some(to_city) = request.to_city {
            active.to_city = Set(to_city);
        }
        if let Some(amount) = request.fee_amount {
            active.fee_amount = Set(amount);
        }
        if let Some(currency) = request.currency {
            active.currency = Set(currency);
        }
        if let Some(is_active) = request.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Some(Utc::now()));

        let model = active.update(db).await.map_err(|e| {
            if matches!(e.sql_err(), Some(sea_orm::SqlErr::UniqueConstraintViolation(_))) {
                ServiceError::Conflict("One-way fee for that city pair already exists".to_string())
            } else {
                error!(error = %e, fee_id, "Failed to update one-way fee");
                ServiceError::DatabaseError(e)
            }
        })?;

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::OneWayFeeUpdated(fee_id)).await {
                warn!(error = %e, fee_id, "Failed to send fee updated event");
            }
        }

        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn delete_fee(&self, fee_id: i64) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let result = FeeEntity::delete_by_id(fee_id)
            .exec(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "One-way fee with id {} not found",
                fee_id
            )));
        }

        info!(fee_id, "One-way fee deleted");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::OneWayFeeDeleted(fee_id)).await {
                warn!(error = %e, fee_id, "Failed to send fee deleted event");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn zero_quote_does_not_apply() {
        let quote = FeeQuote::zero();
        assert_eq!(quote.amount, Decimal::ZERO);
        assert_eq!(quote.currency, "EUR");
        assert!(!quote.applies());
    }

    #[test]
    fn positive_quote_applies() {
        let quote = FeeQuote {
            amount: dec!(25.00),
            currency: "EUR".to_string(),
        };
        assert!(quote.applies());
    }
}
