use crate::{
    db::DbPool,
    entities::vehicle::{
        self, ActiveModel as VehicleActiveModel, Entity as VehicleEntity, Model as VehicleModel,
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
pub struct CreateVehicleRequest {
    #[validate(length(min = 1, message = "make is required"))]
    pub make: String,
    #[validate(length(min = 1, message = "model is required"))]
    pub model: String,
    pub year: Option<i32>,
    pub vin: Option<String>,
    pub license_plate: Option<String>,
    pub color: Option<String>,
    pub transmission: Option<String>,
    pub fuel_type: Option<String>,
    pub seats: Option<i32>,
    pub doors: Option<i32>,
    pub mileage: Option<i32>,
    pub status: Option<String>,
    pub location_id: Option<i64>,
    pub vehicle_group_id: Option<i64>,
    pub starting_price: Option<Decimal>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateVehicleRequest {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub vin: Option<String>,
    pub license_plate: Option<String>,
    pub color: Option<String>,
    pub transmission: Option<String>,
    pub fuel_type: Option<String>,
    pub seats: Option<i32>,
    pub doors: Option<i32>,
    pub mileage: Option<i32>,
    pub status: Option<String>,
    pub location_id: Option<i64>,
    pub vehicle_group_id: Option<i64>,
    pub starting_price: Option<Decimal>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VehicleListResponse {
    pub vehicles: Vec<VehicleModel>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// Fleet CRUD.
#[derive(Clone)]
pub struct VehicleService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl VehicleService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, request), fields(make = %request.make, model = %request.model))]
    pub async fn create_vehicle(
        &self,
        request: CreateVehicleRequest,
    ) -> Result<VehicleModel, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = &*self.db_pool;
        let vehicle = VehicleActiveModel {
            make: Set(request.make),
            model: Set(request.model),
            year: Set(request.year),
            vin: Set(request.vin),
            license_plate: Set(request.license_plate),
            color: Set(request.color),
            transmission: Set(request.transmission),
            fuel_type: Set(request.fuel_type),
            seats: Set(request.seats),
            doors: Set(request.doors),
            mileage: Set(request.mileage),
            status: Set(request.status),
            location_id: Set(request.location_id),
            vehicle_group_id: Set(request.vehicle_group_id),
            starting_price: Set(request.starting_price),
            is_active: Set(request.is_active),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
            ..Default::default()
        };

        let model = vehicle.insert(db).await.map_err(|e| {
            if matches!(e.sql_err(), Some(sea_orm::SqlErr::UniqueConstraintViolation(_))) {
                ServiceError::Conflict("Vehicle with that VIN or plate already exists".to_string())
            } else {
                error!(error = %e, "Failed to create vehicle");
                ServiceError::DatabaseError(e)
            }
        })?;

        info!(vehicle_id = model.id, "Vehicle created");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::VehicleCreated(model.id)).await {
                warn!(error = %e, vehicle_id = model.id, "Failed to send vehicle created event");
            }
        }

        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn get_vehicle(&self, vehicle_id: i64) -> Result<Option<VehicleModel>, ServiceError> {
        let db = &*self.db_pool;
        VehicleEntity::find_by_id(vehicle_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn list_vehicles(
        &self,
        page: u64,
        per_page: u64,
        active_only: bool,
    ) -> Result<VehicleListResponse, ServiceError> {
        let db = &*self.db_pool;

        let mut query = VehicleEntity::find();
        if active_only {
            query = query.filter(vehicle::Column::IsActive.eq(true));
        }
        let paginator = query
            .order_by_asc(vehicle::Column::Id)
            .paginate(db, per_page);

        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::DatabaseError)?;
        let vehicles = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(VehicleListResponse {
            vehicles,
            total,
            page,
            per_page,
        })
    }

    #[instrument(skip(self, request))]
    pub async fn update_vehicle(
        &self,
        vehicle_id: i64,
        request: UpdateVehicleRequest,
    ) -> Result<VehicleModel, ServiceError> {
        let db = &*self.db_pool;

        let vehicle = self.get_vehicle(vehicle_id).await?.ok_or_else(|| {
            ServiceError::NotFound(format!("Vehicle with id {} not found", vehicle_id))
        })?;

        let mut active: VehicleActiveModel = vehicle.into();
        if let Some(make) = request.make {
            active.make = Set(make);
        }
        if let Some(model) = request.model {
            active.model = Set(model);
        }
        if let Some(year) = request.year {
            active.year = Set(Some(year));
        }
        if let Some(vin) = request.vin {
            active.vin = Set(Some(vin));
        }
        if let Some(plate) = request.license_plate {
            active.license_plate = Set(Some(plate));
        }
        if let Some(color) = request.color {
            active.color = Set(Some(color));
        }
        if let Some(transmission) = request.transmission {
            active.transmission = Set(Some(transmission));
        }
        if let Some(fuel_type) = request.fuel_type {
            active.fuel_type = Set(Some(fuel_type));
        }
        if let Some(seats) = request.seats {
            active.seats = Set(Some(seats));
        }
        if let Some(doors) = request.doors {
            active.doors = Set(Some(doors));
        }
        if let Some(mileage) = request.mileage {
            active.mileage = Set(Some(mileage));
        }
        if let Some(status) = request.status {
            active.status = Set(Some(status));
        }
        if let Some(location_id) = request.location_id {
            active.location_id = Set(Some(location_id));
        }
        if let Some(group_id) = request.vehicle_group_id {
            active.vehicle_group_id = Set(Some(group_id));
        }
        if let Some(price) = request.starting_price {
            active.starting_price = Set(Some(price));
        }
        if let Some(is_active) = request.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Some(Utc::now()));

        let model = active.update(db).await.map_err(|e| {
            error!(error = %e, vehicle_id, "Failed to update vehicle");
            ServiceError::DatabaseError(e)
        })?;

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::VehicleUpdated(vehicle_id)).await {
                warn!(error = %e, vehicle_id, "Failed to send vehicle updated event");
            }
        }

        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn delete_vehicle(&self, vehicle_id: i64) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let result = VehicleEntity::delete_by_id(vehicle_id)
            .exec(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Vehicle with id {} not found",
                vehicle_id
            )));
        }
        info!(vehicle_id, "Vehicle deleted");
        Ok(())
    }
}
