use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Descriptive day bucket attached to a rate ("1-3 days", "4-7 days").
/// Used to label the pricing matrix; never consulted for price resolution.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "rate_day_ranges")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub rate_id: i64,
    pub label: String,
    pub from_days: i32,
    #[sea_orm(nullable)]
    pub to_days: Option<i32>,
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
