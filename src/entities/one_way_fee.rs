use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Directional surcharge for returning a vehicle in a different city than it
/// was picked up in. `(from_city, to_city)` is unique and matched
/// case-insensitively; the reverse direction is a separate row.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "one_way_fees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub from_city: String,
    pub to_city: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub fee_amount: Decimal,
    pub currency: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[sea_orm(nullable)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
