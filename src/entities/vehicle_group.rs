use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// ACRISS-style vehicle category. `base_price_per_day` is the second rung of
/// the pricing fallback chain when no rate tier matches; the weekly/monthly
/// variants are catalog metadata only.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "vehicle_groups")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(nullable)]
    pub description: Option<String>,
    #[sea_orm(nullable)]
    pub category: Option<String>,
    #[sea_orm(nullable)]
    pub seats: Option<i32>,
    #[sea_orm(nullable)]
    pub doors: Option<i32>,
    #[sea_orm(nullable)]
    pub transmission: Option<String>,
    #[sea_orm(nullable)]
    pub fuel_type: Option<String>,
    #[sea_orm(nullable, column_type = "Decimal(Some((12, 2)))")]
    pub base_price_per_day: Option<Decimal>,
    #[sea_orm(nullable, column_type = "Decimal(Some((12, 2)))")]
    pub base_price_per_week: Option<Decimal>,
    #[sea_orm(nullable, column_type = "Decimal(Some((12, 2)))")]
    pub base_price_per_month: Option<Decimal>,
    pub display_order: i32,
    pub is_active: bool,
    pub min_rental_days: i32,
    #[sea_orm(nullable)]
    pub max_rental_days: Option<i32>,
    pub created_at: DateTime<Utc>,
    #[sea_orm(nullable)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::vehicle::Entity")]
    Vehicles,
    #[sea_orm(has_many = "super::rate_tier::Entity")]
    RateTiers,
}

impl Related<super::vehicle::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vehicles.def()
    }
}

impl Related<super::rate_tier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RateTiers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
