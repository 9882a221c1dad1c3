use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Descriptive kilometre bucket attached to a rate. Informational only.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "rate_km_ranges")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub rate_id: i64,
    pub label: String,
    pub from_km: i32,
    #[sea_orm(nullable)]
    pub to_km: Option<i32>,
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
}

impl Related<super::rate::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rate.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
