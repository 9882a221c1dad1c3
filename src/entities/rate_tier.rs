use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Per-day price band within a rate, scoped to a vehicle group. A tier covers
/// rental lengths from `from_days` to `to_days` inclusive; a null `to_days`
/// means the band is unbounded above.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "rate_tiers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub rate_id: i64,
    pub vehicle_group_id: i64,
    pub from_days: i32,
    #[sea_orm(nullable)]
    pub to_days: Option<i32>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price_per_day: Decimal,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    #[sea_orm(nullable)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::rate::Entity",
        from = "Column::RateId",
        to = "super::rate::Column::Id"
    )]
    Rate,
    #[sea_orm(
        belongs_to = "super::vehicle_group::Entity",
        from = "Column::VehicleGroupId",
        to = "super::vehicle_group::Column::Id"
    )]
    VehicleGroup,
}

impl Related<super::rate::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rate.def()
    }
}

impl Related<super::vehicle_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VehicleGroup.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
