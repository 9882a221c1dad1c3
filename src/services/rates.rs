use crate::{
    db::DbPool,
    entities::rate::{self, ActiveModel as RateActiveModel, Entity as RateEntity, Model as RateModel},
    entities::rate_day_range::{
        self, ActiveModel as DayRangeActiveModel, Entity as DayRangeEntity, Model as DayRangeModel,
    },
    entities::rate_hour_range::{
        self, ActiveModel as HourRangeActiveModel, Entity as HourRangeEntity,
        Model as HourRangeModel,
    },
    entities::rate_km_range::{
        self, ActiveModel as KmRangeActiveModel, Entity as KmRangeEntity, Model as KmRangeModel,
    },
    entities::rate_tier::{
        self, ActiveModel as TierActiveModel, Entity as TierEntity, Model as TierModel,
    },
    entities::vehicle,
    entities::vehicle_group::{self, Entity as VehicleGroupEntity},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Price of last resort when neither a tier, the vehicle group, nor the
/// vehicle itself carries a price.
pub fn default_daily_rate() -> Decimal {
    Decimal::new(5000, 2)
}

/// Currency applied whenever no catalog row supplies one.
pub const DEFAULT_CURRENCY: &str = "EUR";

/// Billable days for a rental window: whole elapsed days, floored, never
/// less than one. A 2-hour rental and a 26-hour rental both bill 1 day;
/// 49 hours bills 2.
pub fn rental_days(pickup: NaiveDateTime, dropoff: NaiveDateTime) -> i32 {
    let days = (dropoff - pickup).num_days().max(1);
    i32::try_from(days).unwrap_or(i32::MAX)
}

/// Which rung of the fallback chain supplied the price when no tier matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FallbackSource {
    GroupBasePrice,
    VehicleStartingPrice,
    DefaultRate,
}

/// Outcome of rate resolution. `fallback` is `None` exactly when a tier
/// matched (and then `rate_id`/`rate_tier_id` are set).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RateResolution {
    pub rate_id: Option<i64>,
    pub rate_tier_id: Option<i64>,
    pub price_per_day: Decimal,
    pub currency: String,
    pub fallback: Option<FallbackSource>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateRateRequest {
    #[validate(length(min = 1, message = "Rate name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub parent_rate_id: Option<i64>,
    pub increment_type: Option<String>,
    pub increment_value: Option<i32>,
    pub valid_from: NaiveDate,
    pub valid_until: NaiveDate,
    #[serde(default = "default_min_days")]
    pub min_days: i32,
    pub max_days: Option<i32>,
    #[serde(default)]
    pub unlimited_km: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub price_modifier_name: Option<String>,
    pub price_modifier_type: Option<String>,
    pub price_modifier_value: Option<Decimal>,
    #[serde(default)]
    pub price_modifier_applies_to_agreement_only: bool,
}

fn default_min_days() -> i32 {
    1
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateRateRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
    pub min_days: Option<i32>,
    pub max_days: Option<i32>,
    pub unlimited_km: Option<bool>,
    pub is_active: Option<bool>,
    pub price_modifier_name: Option<String>,
    pub price_modifier_type: Option<String>,
    pub price_modifier_value: Option<Decimal>,
    pub price_modifier_applies_to_agreement_only: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateRateTierRequest {
    pub vehicle_group_id: i64,
    #[serde(default)]
    pub from_days: i32,
    pub to_days: Option<i32>,
    pub price_per_day: Decimal,
    pub currency: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateRateTierRequest {
    pub from_days: Option<i32>,
    pub to_days: Option<i32>,
    pub price_per_day: Option<Decimal>,
    pub currency: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateRangeRequest {
    #[validate(length(min = 1, message = "Label is required"))]
    pub label: String,
    pub from_value: i32,
    pub to_value: Option<i32>,
}

/// Rate with its tiers attached, returned when `include_tiers` is requested.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RateWithTiers {
    #[serde(flatten)]
    pub rate: RateModel,
    pub tiers: Vec<TierModel>,
}

/// One cell of the group × day-range price matrix.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MatrixCell {
    pub vehicle_group_id: i64,
    pub vehicle_group_name: String,
    pub day_range_id: i64,
    pub day_range_label: String,
    pub price_per_day: Option<Decimal>,
    pub rate_tier_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RateListResponse {
    pub rates: Vec<RateModel>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// Service owning the rate catalog and the price resolver.
#[derive(Clone)]
pub struct RateService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl RateService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    fn validate_window(
        valid_from: NaiveDate,
        valid_until: NaiveDate,
        min_days: i32,
        max_days: Option<i32>,
    ) -> Result<(), ServiceError> {
        if valid_from > valid_until {
            return Err(ServiceError::ValidationError(
                "valid_from must not be after valid_until".to_string(),
            ));
        }
        if min_days < 1 {
            return Err(ServiceError::ValidationError(
                "min_days must be at least 1".to_string(),
            ));
        }
        if let Some(max) = max_days {
            if max < min_days {
                return Err(ServiceError::ValidationError(
                    "max_days must not be less than min_days".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Resolves the per-day price for a vehicle over a rental window.
    ///
    /// Walks active rates whose validity window contains the pickup date and
    /// whose day bounds admit the rental length, newest `valid_from` first
    /// (id breaks ties), and takes the first rate owning a tier for the
    /// vehicle's group that covers the rental length. When nothing matches,
    /// falls through group base price, then vehicle starting price, then the
    /// default daily rate. "No match" is a normal outcome, never an error.
    #[instrument(skip(self, vehicle), fields(vehicle_id = vehicle.id))]
    pub async fn resolve(
        &self,
        vehicle: &vehicle::Model,
        pickup: NaiveDateTime,
        dropoff: NaiveDateTime,
    ) -> Result<RateResolution, ServiceError> {
        let db = &*self.db_pool;
        let days = rental_days(pickup, dropoff);

        if let Some(group_id) = vehicle.vehicle_group_id {
            let pickup_date = pickup.date();

            let candidates = RateEntity::find()
                .filter(rate::Column::IsActive.eq(true))
                .filter(rate::Column::ValidFrom.lte(pickup_date))
                .filter(rate::Column::ValidUntil.gte(pickup_date))
                .filter(rate::Column::MinDays.lte(days))
                .filter(
                    Condition::any()
                        .add(rate::Column::MaxDays.is_null())
                        .add(rate::Column::MaxDays.gte(days)),
                )
                .order_by_desc(rate::Column::ValidFrom)
                .order_by_desc(rate::Column::Id)
                .all(db)
                .await
                .map_err(|e| {
                    error!(error = %e, "Failed to load candidate rates");
                    ServiceError::DatabaseError(e)
                })?;

            for candidate in &candidates {
                let tier = TierEntity::find()
                    .filter(rate_tier::Column::RateId.eq(candidate.id))
                    .filter(rate_tier::Column::VehicleGroupId.eq(group_id))
                    .filter(rate_tier::Column::FromDays.lte(days))
                    .filter(
                        Condition::any()
                            .add(rate_tier::Column::ToDays.is_null())
                            .add(rate_tier::Column::ToDays.gte(days)),
                    )
                    .order_by_asc(rate_tier::Column::FromDays)
                    .one(db)
                    .await
                    .map_err(|e| {
                        error!(error = %e, rate_id = candidate.id, "Failed to load rate tiers");
                        ServiceError::DatabaseError(e)
                    })?;

                if let Some(tier) = tier {
                    info!(
                        rate_id = candidate.id,
                        rate_tier_id = tier.id,
                        rental_days = days,
                        "Rate resolved from tier"
                    );
                    return Ok(RateResolution {
                        rate_id: Some(candidate.id),
                        rate_tier_id: Some(tier.id),
                        price_per_day: tier.price_per_day,
                        currency: tier.currency.clone(),
                        fallback: None,
                    });
                }
            }

            let group = VehicleGroupEntity::find_by_id(group_id)
                .one(db)
                .await
                .map_err(ServiceError::DatabaseError)?;
            if let Some(price) = group.and_then(|g| g.base_price_per_day) {
                info!(rental_days = days, "Falling back to group base price");
                return Ok(RateResolution {
                    rate_id: None,
                    rate_tier_id: None,
                    price_per_day: price,
                    currency: DEFAULT_CURRENCY.to_string(),
                    fallback: Some(FallbackSource::GroupBasePrice),
                });
            }
        }

        if let Some(price) = vehicle.starting_price {
            info!(rental_days = days, "Falling back to vehicle starting price");
            return Ok(RateResolution {
                rate_id: None,
                rate_tier_id: None,
                price_per_day: price,
                currency: DEFAULT_CURRENCY.to_string(),
                fallback: Some(FallbackSource::VehicleStartingPrice),
            });
        }

        warn!(
            vehicle_id = vehicle.id,
            rental_days = days,
            "No price source found, using default daily rate"
        );
        Ok(RateResolution {
            rate_id: None,
            rate_tier_id: None,
            price_per_day: default_daily_rate(),
            currency: DEFAULT_CURRENCY.to_string(),
            fallback: Some(FallbackSource::DefaultRate),
        })
    }

    #[instrument(skip(self, request), fields(rate_name = %request.name))]
    pub async fn create_rate(&self, request: CreateRateRequest) -> Result<RateModel, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;
        Self::validate_window(
            request.valid_from,
            request.valid_until,
            request.min_days,
            request.max_days,
        )?;

        let db = &*self.db_pool;
        let now = Utc::now();

        let rate = RateActiveModel {
            name: Set(request.name.clone()),
            description: Set(request.description),
            parent_rate_id: Set(request.parent_rate_id),
            increment_type: Set(request.increment_type),
            increment_value: Set(request.increment_value),
            valid_from: Set(request.valid_from),
            valid_until: Set(request.valid_until),
            min_days: Set(request.min_days),
            max_days: Set(request.max_days),
            unlimited_km: Set(request.unlimited_km),
            is_active: Set(request.is_active),
            price_modifier_name: Set(request.price_modifier_name),
            price_modifier_type: Set(request.price_modifier_type),
            price_modifier_value: Set(request.price_modifier_value),
            price_modifier_applies_to_agreement_only: Set(
                request.price_modifier_applies_to_agreement_only,
            ),
            created_at: Set(now),
            updated_at: Set(None),
            ..Default::default()
        };

        let model = rate.insert(db).await.map_err(|e| {
            if matches!(e.sql_err(), Some(sea_orm::SqlErr::UniqueConstraintViolation(_))) {
                ServiceError::Conflict(format!("Rate '{}' already exists", request.name))
            } else {
                error!(error = %e, "Failed to create rate");
                ServiceError::DatabaseError(e)
            }
        })?;

        info!(rate_id = model.id, "Rate created successfully");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::RateCreated(model.id)).await {
                warn!(error = %e, rate_id = model.id, "Failed to send rate created event");
            }
        }

        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn get_rate(&self, rate_id: i64) -> Result<Option<RateModel>, ServiceError> {
        let db = &*self.db_pool;
        RateEntity::find_by_id(rate_id)
            .one(db)
            .await
            .map_err(|e| {
                error!(error = %e, rate_id, "Failed to fetch rate");
                ServiceError::DatabaseError(e)
            })
    }

    #[instrument(skip(self))]
    pub async fn get_rate_with_tiers(
        &self,
        rate_id: i64,
    ) -> Result<Option<RateWithTiers>, ServiceError> {
        let db = &*self.db_pool;
        let rate = match self.get_rate(rate_id).await? {
            Some(rate) => rate,
            None => return Ok(None),
        };

        let tiers = TierEntity::find()
            .filter(rate_tier::Column::RateId.eq(rate_id))
            .order_by_asc(rate_tier::Column::VehicleGroupId)
            .order_by_asc(rate_tier::Column::FromDays)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(Some(RateWithTiers { rate, tiers }))
    }

    #[instrument(skip(self))]
    pub async fn list_rates(
        &self,
        page: u64,
        per_page: u64,
        active_only: bool,
    ) -> Result<RateListResponse, ServiceError> {
        let db = &*self.db_pool;

        let mut query = RateEntity::find();
        if active_only {
            query = query.filter(rate::Column::IsActive.eq(true));
        }
        let paginator = query
            .order_by_desc(rate::Column::ValidFrom)
            .order_by_desc(rate::Column::Id)
            .paginate(db, per_page);

        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::DatabaseError)?;
        let rates = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(RateListResponse {
            rates,
            total,
            page,
            per_page,
        })
    }

    #[instrument(skip(self, request))]
    pub async fn update_rate(
        &self,
        rate_id: i64,
        request: UpdateRateRequest,
    ) -> Result<RateModel, ServiceError> {
        let db = &*self.db_pool;

        let rate = self
            .get_rate(rate_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Rate with id {} not found", rate_id)))?;

        let valid_from = request.valid_from.unwrap_or(rate.valid_from);
        let valid_until = request.valid_until.unwrap_or(rate.valid_until);
        let min_days = request.min_days.unwrap_or(rate.min_days);
        let max_days = match request.max_days {
            Some(v) => Some(v),
            None => rate.max_days,
        };
        Self::validate_window(valid_from, valid_until, min_days, max_days)?;

        let mut active: RateActiveModel = rate.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(description) = request.description {
            active.description = Set(Some(description));
        }
        active.valid_from = Set(valid_from);
        active.valid_until = Set(valid_until);
        active.min_days = Set(min_days);
        active.max_days = Set(max_days);
        if let Some(unlimited_km) = request.unlimited_km {
            active.unlimited_km = Set(unlimited_km);
        }
        if let Some(is_active) = request.is_active {
            active.is_active = Set(is_active);
        }
        if let Some(v) = request.price_modifier_name {
            active.price_modifier_name = Set(Some(v));
        }
        if let Some(v) = request.price_modifier_type {
            active.price_modifier_type = Set(Some(v));
        }
        if let Some(v) = request.price_modifier_value {
            active.price_modifier_value = Set(Some(v));
        }
        if let Some(v) = request.price_modifier_applies_to_agreement_only {
            active.price_modifier_applies_to_agreement_only = Set(v);
        }
        active.updated_at = Set(Some(Utc::now()));

        let model = active.update(db).await.map_err(|e| {
            error!(error = %e, rate_id, "Failed to update rate");
            ServiceError::DatabaseError(e)
        })?;

        info!(rate_id, "Rate updated successfully");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::RateUpdated(rate_id)).await {
                warn!(error = %e, rate_id, "Failed to send rate updated event");
            }
        }

        Ok(model)
    }

    /// Deletes a rate together with its tiers and range labels.
    #[instrument(skip(self))]
    pub async fn delete_rate(&self, rate_id: i64) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let rate = self
            .get_rate(rate_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Rate with id {} not found", rate_id)))?;

        let txn = db.begin().await.map_err(ServiceError::DatabaseError)?;

        TierEntity::delete_many()
            .filter(rate_tier::Column::RateId.eq(rate_id))
            .exec(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;
        DayRangeEntity::delete_many()
            .filter(rate_day_range::Column::RateId.eq(rate_id))
            .exec(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;
        HourRangeEntity::delete_many()
            .filter(rate_hour_range::Column::RateId.eq(rate_id))
            .exec(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;
        KmRangeEntity::delete_many()
            .filter(rate_km_range::Column::RateId.eq(rate_id))
            .exec(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;
        RateEntity::delete_by_id(rate.id)
            .exec(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, rate_id, "Failed to commit rate deletion");
            ServiceError::DatabaseError(e)
        })?;

        info!(rate_id, "Rate deleted successfully");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::RateDeleted(rate_id)).await {
                warn!(error = %e, rate_id, "Failed to send rate deleted event");
            }
        }

        Ok(())
    }

    async fn require_rate(&self, rate_id: i64) -> Result<RateModel, ServiceError> {
        self.get_rate(rate_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Rate with id {} not found", rate_id)))
    }

    fn validate_tier_bounds(from_days: i32, to_days: Option<i32>) -> Result<(), ServiceError> {
        if from_days < 0 {
            return Err(ServiceError::ValidationError(
                "from_days must not be negative".to_string(),
            ));
        }
        if let Some(to) = to_days {
            if to < from_days {
                return Err(ServiceError::ValidationError(
                    "to_days must not be less than from_days".to_string(),
                ));
            }
        }
        Ok(())
    }

    #[instrument(skip(self, request), fields(rate_id))]
    pub async fn create_tier(
        &self,
        rate_id: i64,
        request: CreateRateTierRequest,
    ) -> Result<TierModel, ServiceError> {
        self.require_rate(rate_id).await?;
        Self::validate_tier_bounds(request.from_days, request.to_days)?;
        if request.price_per_day < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "price_per_day must not be negative".to_string(),
            ));
        }

        let db = &*self.db_pool;

        let group = VehicleGroupEntity::find_by_id(request.vehicle_group_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        if group.is_none() {
            return Err(ServiceError::NotFound(format!(
                "Vehicle group with id {} not found",
                request.vehicle_group_id
            )));
        }

        let tier = TierActiveModel {
            rate_id: Set(rate_id),
            vehicle_group_id: Set(request.vehicle_group_id),
            from_days: Set(request.from_days),
            to_days: Set(request.to_days),
            price_per_day: Set(request.price_per_day),
            currency: Set(request
                .currency
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string())),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
            ..Default::default()
        };

        let model = tier.insert(db).await.map_err(|e| {
            error!(error = %e, rate_id, "Failed to create rate tier");
            ServiceError::DatabaseError(e)
        })?;

        info!(rate_id, rate_tier_id = model.id, "Rate tier created");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::RateTierCreated(model.id)).await {
                warn!(error = %e, rate_tier_id = model.id, "Failed to send tier created event");
            }
        }

        Ok(model)
    }

    /// Creates several tiers for one rate in a single transaction; either
    /// every tier lands or none do.
    #[instrument(skip(self, requests), fields(rate_id, count = requests.len()))]
    pub async fn create_tiers_bulk(
        &self,
        rate_id: i64,
        requests: Vec<CreateRateTierRequest>,
    ) -> Result<Vec<TierModel>, ServiceError> {
        self.require_rate(rate_id).await?;
        if requests.is_empty() {
            return Err(ServiceError::InvalidInput(
                "At least one tier is required".to_string(),
            ));
        }
        for request in &requests {
            Self::validate_tier_bounds(request.from_days, request.to_days)?;
        }

        let db = &*self.db_pool;
        let txn = db.begin().await.map_err(ServiceError::DatabaseError)?;
        let now = Utc::now();

        let mut created = Vec::with_capacity(requests.len());
        for request in requests {
            let tier = TierActiveModel {
                rate_id: Set(rate_id),
                vehicle_group_id: Set(request.vehicle_group_id),
                from_days: Set(request.from_days),
                to_days: Set(request.to_days),
                price_per_day: Set(request.price_per_day),
                currency: Set(request
                    .currency
                    .unwrap_or_else(|| DEFAULT_CURRENCY.to_string())),
                created_at: Set(now),
                updated_at: Set(None),
                ..Default::default()
            };
            let model = tier.insert(&txn).await.map_err(|e| {
                error!(error = %e, rate_id, "Failed to create rate tier in bulk");
                ServiceError::DatabaseError(e)
            })?;
            created.push(model);
        }

        txn.commit().await.map_err(ServiceError::DatabaseError)?;

        info!(rate_id, count = created.len(), "Rate tiers created in bulk");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn list_tiers(&self, rate_id: i64) -> Result<Vec<TierModel>, ServiceError> {
        self.require_rate(rate_id).await?;
        let db = &*self.db_pool;
        TierEntity::find()
            .filter(rate_tier::Column::RateId.eq(rate_id))
            .order_by_asc(rate_tier::Column::VehicleGroupId)
            .order_by_asc(rate_tier::Column::FromDays)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self, request))]
    pub async fn update_tier(
        &self,
        tier_id: i64,
        request: UpdateRateTierRequest,
    ) -> Result<TierModel, ServiceError> {
        let db = &*self.db_pool;

        let tier = TierEntity::find_by_id(tier_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Rate tier with id {} not found", tier_id))
            })?;

        let from_days = request.from_days.unwrap_or(tier.from_days);
        let to_days = match request.to_days {
            Some(v) => Some(v),
            None => tier.to_days,
        };
        Self::validate_tier_bounds(from_days, to_days)?;

        let mut active: TierActiveModel = tier.into();
        active.from_days = Set(from_days);
        active.to_days = Set(to_days);
        if let Some(price) = request.price_per_day {
            active.price_per_day = Set(price);
        }
        if let Some(currency) = request.currency {
            active.currency = Set(currency);
        }
        active.updated_at = Set(Some(Utc::now()));

        active.update(db).await.map_err(|e| {
            error!(error = %e, tier_id, "Failed to update rate tier");
            ServiceError::DatabaseError(e)
        })
    }

    #[instrument(skip(self))]
    pub async fn delete_tier(&self, tier_id: i64) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let result = TierEntity::delete_by_id(tier_id)
            .exec(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Rate tier with id {} not found",
                tier_id
            )));
        }
        info!(tier_id, "Rate tier deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_day_ranges(&self, rate_id: i64) -> Result<Vec<DayRangeModel>, ServiceError> {
        self.require_rate(rate_id).await?;
        let db = &*self.db_pool;
        DayRangeEntity::find()
            .filter(rate_day_range::Column::RateId.eq(rate_id))
            .order_by_asc(rate_day_range::Column::FromDays)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self, request))]
    pub async fn create_day_range(
        &self,
        rate_id: i64,
        request: CreateRangeRequest,
    ) -> Result<DayRangeModel, ServiceError> {
        self.require_rate(rate_id).await?;
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = &*self.db_pool;
        let range = DayRangeActiveModel {
            rate_id: Set(rate_id),
            label: Set(request.label),
            from_days: Set(request.from_value),
            to_days: Set(request.to_value),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
            ..Default::default()
        };
        range.insert(db).await.map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn delete_day_range(&self, range_id: i64) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let result = DayRangeEntity::delete_by_id(range_id)
            .exec(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Day range with id {} not found",
                range_id
            )));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_hour_ranges(
        &self,
        rate_id: i64,
    ) -> Result<Vec<HourRangeModel>, ServiceError> {
        self.require_rate(rate_id).await?;
        let db = &*self.db_pool;
        HourRangeEntity::find()
            .filter(rate_hour_range::Column::RateId.eq(rate_id))
            .order_by_asc(rate_hour_range::Column::FromHours)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self, request))]
    pub async fn create_hour_range(
        &self,
        rate_id: i64,
        request: CreateRangeRequest,
    ) -> Result<HourRangeModel, ServiceError> {
        self.require_rate(rate_id).await?;
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = &*self.db_pool;
        let range = HourRangeActiveModel {
            rate_id: Set(rate_id),
            label: Set(request.label),
            from_hours: Set(request.from_value),
            to_hours: Set(request.to_value),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
            ..Default::default()
        };
        range.insert(db).await.map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn delete_hour_range(&self, range_id: i64) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let result = HourRangeEntity::delete_by_id(range_id)
            .exec(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Hour range with id {} not found",
                range_id
            )));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_km_ranges(&self, rate_id: i64) -> Result<Vec<KmRangeModel>, ServiceError> {
        self.require_rate(rate_id).await?;
        let db = &*self.db_pool;
        KmRangeEntity::find()
            .filter(rate_km_range::Column::RateId.eq(rate_id))
            .order_by_asc(rate_km_range::Column::FromKm)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self, request))]
    pub async fn create_km_range(
        &self,
        rate_id: i64,
        request: CreateRangeRequest,
    ) -> Result<KmRangeModel, ServiceError> {
        self.require_rate(rate_id).await?;
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = &*self.db_pool;
        let range = KmRangeActiveModel {
            rate_id: Set(rate_id),
            label: Set(request.label),
            from_km: Set(request.from_value),
            to_km: Set(request.to_value),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
            ..Default::default()
        };
        range.insert(db).await.map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn delete_km_range(&self, range_id: i64) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let result = KmRangeEntity::delete_by_id(range_id)
            .exec(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Km range with id {} not found",
                range_id
            )));
        }
        Ok(())
    }

    /// Builds the group × day-range price matrix for one rate. Each cell
    /// carries the tier price covering the range's lower bound, or nothing
    /// when no tier applies.
    #[instrument(skip(self))]
    pub async fn tier_matrix(&self, rate_id: i64) -> Result<Vec<MatrixCell>, ServiceError> {
        self.require_rate(rate_id).await?;
        let db = &*self.db_pool;

        let day_ranges = DayRangeEntity::find()
            .filter(rate_day_range::Column::RateId.eq(rate_id))
            .order_by_asc(rate_day_range::Column::FromDays)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let groups = VehicleGroupEntity::find()
            .filter(vehicle_group::Column::IsActive.eq(true))
            .order_by_asc(vehicle_group::Column::DisplayOrder)
            .order_by_asc(vehicle_group::Column::Id)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let tiers = TierEntity::find()
            .filter(rate_tier::Column::RateId.eq(rate_id))
            .order_by_asc(rate_tier::Column::FromDays)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let mut cells = Vec::with_capacity(groups.len() * day_ranges.len());
        for group in &groups {
            for range in &day_ranges {
                let tier = tiers.iter().find(|t| {
                    t.vehicle_group_id == group.id
                        && t.from_days <= range.from_days
                        && t.to_days.map_or(true, |to| to >= range.from_days)
                });
                cells.push(MatrixCell {
                    vehicle_group_id: group.id,
                    vehicle_group_name: group.name.clone(),
                    day_range_id: range.id,
                    day_range_label: range.label.clone(),
                    price_per_day: tier.map(|t| t.price_per_day),
                    rate_tier_id: tier.map(|t| t.id),
                });
            }
        }

        Ok(cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").expect("valid datetime")
    }

    #[test]
    fn rental_days_floors_whole_days() {
        assert_eq!(
            rental_days(dt("2026-06-01T10:00:00"), dt("2026-06-03T10:00:00")),
            2
        );
        // 49 hours floors to 2 days
        assert_eq!(
            rental_days(dt("2026-06-01T10:00:00"), dt("2026-06-03T11:00:00")),
            2
        );
    }

    #[test]
    fn rental_days_is_at_least_one() {
        // 2 hours
        assert_eq!(
            rental_days(dt("2026-06-01T10:00:00"), dt("2026-06-01T12:00:00")),
            1
        );
        // 26 hours still bills one day
        assert_eq!(
            rental_days(dt("2026-06-01T10:00:00"), dt("2026-06-02T12:00:00")),
            1
        );
        // zero-length window
        assert_eq!(
            rental_days(dt("2026-06-01T10:00:00"), dt("2026-06-01T10:00:00")),
            1
        );
    }

    #[test]
    fn default_daily_rate_is_fifty() {
        assert_eq!(default_daily_rate(), Decimal::new(5000, 2));
    }

    #[test]
    fn window_validation_rejects_inverted_dates() {
        let from = NaiveDate::from_ymd_opt(2026, 6, 10).unwrap();
        let until = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        assert!(RateService::validate_window(from, until, 1, None).is_err());
    }

    #[test]
    fn window_validation_rejects_bad_day_bounds() {
        let from = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let until = NaiveDate::from_ymd_opt(2026, 6, 30).unwrap();
        assert!(RateService::validate_window(from, until, 0, None).is_err());
        assert!(RateService::validate_window(from, until, 5, Some(3)).is_err());
        assert!(RateService::validate_window(from, until, 5, Some(5)).is_ok());
    }

    #[test]
    fn tier_bounds_are_inclusive() {
        assert!(RateService::validate_tier_bounds(0, None).is_ok());
        assert!(RateService::validate_tier_bounds(4, Some(4)).is_ok());
        assert!(RateService::validate_tier_bounds(4, Some(3)).is_err());
        assert!(RateService::validate_tier_bounds(-1, None).is_err());
    }
}
