use crate::{
    db::DbPool,
    entities::vehicle_group::{
        self, ActiveModel as GroupActiveModel, Entity as GroupEntity, Model as GroupModel,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateVehicleGroupRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub seats: Option<i32>,
    pub doors: Option<i32>,
    pub transmission: Option<String>,
    pub fuel_type: Option<String>,
    pub base_price_per_day: Option<Decimal>,
    pub base_price_per_week: Option<Decimal>,
    pub base_price_per_month: Option<Decimal>,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default = "default_min_rental_days")]
    pub min_rental_days: i32,
    pub max_rental_days: Option<i32>,
}

fn default_true() -> bool {
    true
}

fn default_min_rental_days() -> i32 {
    1
}

#[derive(Debug, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateVehicleGroupRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub seats: Option<i32>,
    pub doors: Option<i32>,
    pub transmission: Option<String>,
    pub fuel_type: Option<String>,
    pub base_price_per_day: Option<Decimal>,
    pub base_price_per_week: Option<Decimal>,
    pub base_price_per_month: Option<Decimal>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
    pub min_rental_days: Option<i32>,
    pub max_rental_days: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VehicleGroupListResponse {
    pub vehicle_groups: Vec<GroupModel>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// Vehicle category CRUD.
#[derive(Clone)]
pub struct VehicleGroupService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl VehicleGroupService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_group(
        &self,
        request: CreateVehicleGroupRequest,
    ) -> Result<GroupModel, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = &*self.db_pool;
        let group = GroupActiveModel {
            name: Set(request.name.clone()),
            description: Set(request.description),
            category: Set(request.category),
            seats: Set(request.seats),
            doors: Set(request.doors),
            transmission: Set(request.transmission),
            fuel_type: Set(request.fuel_type),
            base_price_per_day: Set(request.base_price_per_day),
            base_price_per_week: Set(request.base_price_per_week),
            base_price_per_month: Set(request.base_price_per_month),
            display_order: Set(request.display_order),
            is_active: Set(request.is_active),
            min_rental_days: Set(request.min_rental_days),
            max_rental_days: Set(request.max_rental_days),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
            ..Default::default()
        };

        let model = group.insert(db).await.map_err(|e| {
            if matches!(e.sql_err(), Some(sea_orm::SqlErr::UniqueConstraintViolation(_))) {
                ServiceError::Conflict(format!(
                    "Vehicle group '{}' already exists",
                    request.name
                ))
            } else {
                error!(error = %e, "Failed to create vehicle group");
                ServiceError::DatabaseError(e)
            }
        })?;

        info!(vehicle_group_id = model.id, "Vehicle group created");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::VehicleGroupCreated(model.id)).await {
                warn!(error = %e, vehicle_group_id = model.id, "Failed to send group created event");
            }
        }

        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn get_group(&self, group_id: i64) -> Result<Option<GroupModel>, ServiceError> {
        let db = &*self.db_pool;
        GroupEntity::find_by_id(group_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn list_groups(
        &self,
        page: u64,
        per_page: u64,
        active_only: bool,
    ) -> Result<VehicleGroupListResponse, ServiceError> {
        let db = &*self.db_pool;

        let mut query = GroupEntity::find();
        if active_only {
            query = query.filter(vehicle_group::Column::IsActive.eq(true));
        }
        let paginator = query
            .order_by_asc(vehicle_group::Column::DisplayOrder)
            .order_by_asc(vehicle_group::Column::Id)
            .paginate(db, per_page);

        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::DatabaseError)?;
        let vehicle_groups = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(VehicleGroupListResponse {
            vehicle_groups,
            total,
            page,
            per_page,
        })
    }

    #[instrument(skip(self, request))]
    pub async fn update_group(
        &self,
        group_id: i64,
        request: UpdateVehicleGroupRequest,
    ) -> Result<GroupModel, ServiceError> {
        let db = &*self.db_pool;

        let group = self.get_group(group_id).await?.ok_or_else(|| {
            ServiceError::NotFound(format!("Vehicle group with id {} not found", group_id))
        })?;

        let mut active: GroupActiveModel = group.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(description) = request.description {
            active.description = Set(Some(description));
        }
        if let Some(category) = request.category {
            active.category = Set(Some(category));
        }
        if let Some(seats) = request.seats {
            active.seats = Set(Some(seats));
        }
        if let Some(doors) = request.doors {
            active.doors = Set(Some(doors));
        }
        if let Some(transmission) = request.transmission {
            active.transmission = Set(Some(transmission));
        }
        if let Some(fuel_type) = request.fuel_type {
            active.fuel_type = Set(Some(fuel_type));
        }
        if let Some(price) = request.base_price_per_day {
            active.base_price_per_day = Set(Some(price));
        }
        if let Some(price) = request.base_price_per_week {
            active.base_price_per_week = Set(Some(price));
        }
        if let Some(price) = request.base_price_per_month {
            active.base_price_per_month = Set(Some(price));
        }
        if let Some(order) = request.display_order {
            active.display_order = Set(order);
        }
        if let Some(is_active) = request.is_active {
            active.is_active = Set(is_active);
        }
        if let Some(min_days) = request.min_rental_days {
            active.min_rental_days = Set(min_days);
        }
        if let Some(max_days) = request.max_rental_days {
            active.max_rental_days = Set(Some(max_days));
        }
        active.updated_at = Set(Some(Utc::now()));

        active.update(db).await.map_err(|e| {
            error!(error = %e, vehicle_group_id = group_id, "Failed to update vehicle group");
            ServiceError::DatabaseError(e)
        })
    }

    #[instrument(skip(self))]
    pub async fn delete_group(&self, group_id: i64) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let result = GroupEntity::delete_by_id(group_id)
            .exec(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Vehicle group with id {} not found",
                group_id
            )));
        }
        info!(vehicle_group_id = group_id, "Vehicle group deleted");
        Ok(())
    }
}
