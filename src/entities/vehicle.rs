use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Fleet vehicle. `location_id` is the home station used for delivery-fee
/// lookups; `starting_price` is the advertised per-day price and the third
/// rung of the pricing fallback chain.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "vehicles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(nullable)]
    pub location_id: Option<i64>,
    #[sea_orm(nullable)]
    pub vehicle_group_id: Option<i64>,
    #[sea_orm(nullable, unique)]
    pub vin: Option<String>,
    #[sea_orm(nullable, unique)]
    pub license_plate: Option<String>,
    pub make: String,
    pub model: String,
    #[sea_orm(nullable)]
    pub year: Option<i32>,
    #[sea_orm(nullable)]
    pub color: Option<String>,
    #[sea_orm(nullable)]
    pub transmission: Option<String>,
    #[sea_orm(nullable)]
    pub fuel_type: Option<String>,
    #[sea_orm(nullable)]
    pub seats: Option<i32>,
    #[sea_orm(nullable)]
    pub doors: Option<i32>,
    #[sea_orm(nullable)]
    pub mileage: Option<i32>,
    #[sea_orm(nullable)]
    pub status: Option<String>,
    #[sea_orm(nullable, column_type = "Decimal(Some((12, 2)))")]
    pub starting_price: Option<Decimal>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[sea_orm(nullable)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vehicle_group::Entity",
        from = "Column::VehicleGroupId",
        to = "super::vehicle_group::Column::Id"
    )]
    VehicleGroup,
    #[sea_orm(
        belongs_to = "super::location::Entity",
        from = "Column::LocationId",
        to = "super::location::Column::Id"
    )]
    Location,
    #[sea_orm(has_many = "super::booking::Entity")]
    Bookings,
}

impl Related<super::vehicle_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VehicleGroup.def()
    }
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
