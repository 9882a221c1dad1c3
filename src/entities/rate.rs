use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Pricing plan header. A rate is a candidate for a booking when it is
/// active, its validity window contains the pickup date, and its day bounds
/// admit the rental length. Candidate ordering is `valid_from DESC, id DESC`.
///
/// The `parent_rate_id` / increment / price-modifier columns describe derived
/// rates in the catalog; they are stored and returned verbatim but never
/// consulted during price resolution.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "rates")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(nullable)]
    pub description: Option<String>,
    #[sea_orm(nullable)]
    pub parent_rate_id: Option<i64>,
    #[sea_orm(nullable)]
    pub increment_type: Option<String>,
    #[sea_orm(nullable)]
    pub increment_value: Option<i32>,
    pub valid_from: NaiveDate,
    pub valid_until: NaiveDate,
    pub min_days: i32,
    #[sea_orm(nullable)]
    pub max_days: Option<i32>,
    pub unlimited_km: bool,
    pub is_active: bool,
    #[sea_orm(nullable)]
    pub price_modifier_name: Option<String>,
    #[sea_orm(nullable)]
    pub price_modifier_type: Option<String>,
    #[sea_orm(nullable, column_type = "Decimal(Some((12, 2)))")]
    pub price_modifier_value: Option<Decimal>,
    pub price_modifier_applies_to_agreement_only: bool,
    pub created_at: DateTime<Utc>,
    #[sea_orm(nullable)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::rate_tier::Entity")]
    RateTiers,
    #[sea_orm(has_many = "super::rate_day_range::Entity")]
    RateDayRanges,
    #[sea_orm(has_many = "super::rate_hour_range::Entity")]
    RateHourRanges,
    #[sea_orm(has_many = "super::rate_km_range::Entity")]
    RateKmRanges,
}

impl Related<super::rate_tier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RateTiers.def()
    }
}

impl Related<super::rate_day_range::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RateDayRanges.def()
    }
}

impl Related<super::rate_hour_range::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RateHourRanges.def()
    }
}

impl Related<super::rate_km_range::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RateKmRanges.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
