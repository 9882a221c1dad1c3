use crate::{
    db::DbPool,
    entities::location::{
        self, ActiveModel as LocationActiveModel, Entity as LocationEntity, Model as LocationModel,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateLocationRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "address_line1 is required"))]
    pub address_line1: String,
    pub address_line2: Option<String>,
    #[validate(length(min = 1, message = "city is required"))]
    pub city: String,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    #[validate(length(min = 2, max = 2, message = "country_code must be ISO 3166-1 alpha-2"))]
    pub country_code: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateLocationRequest {
    pub name: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LocationListResponse {
    pub locations: Vec<LocationModel>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// Station CRUD.
#[derive(Clone)]
pub struct LocationService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl LocationService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, request), fields(city = %request.city))]
    pub async fn create_location(
        &self,
        request: CreateLocationRequest,
    ) -> Result<LocationModel, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = &*self.db_pool;
        let loc = LocationActiveModel {
            name: Set(request.name),
            address_line1: Set(request.address_line1),
            address_line2: Set(request.address_line2),
            city: Set(request.city),
            state: Set(request.state),
            postal_code: Set(request.postal_code),
            country_code: Set(request.country_code.to_uppercase()),
            latitude: Set(request.latitude),
            longitude: Set(request.longitude),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
            ..Default::default()
        };

        let model = loc.insert(db).await.map_err(|e| {
            error!(error = %e, "Failed to create location");
            ServiceError::DatabaseError(e)
        })?;

        info!(location_id = model.id, "Location created");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::LocationCreated(model.id)).await {
                warn!(error = %e, location_id = model.id, "Failed to send location created event");
            }
        }

        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn get_location(
        &self,
        location_id: i64,
    ) -> Result<Option<LocationModel>, ServiceError> {
        let db = &*self.db_pool;
        LocationEntity::find_by_id(location_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn list_locations(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<LocationListResponse, ServiceError> {
        let db = &*self.db_pool;

        let paginator = LocationEntity::find()
            .order_by_asc(location::Column::City)
            .order_by_asc(location::Column::Id)
            .paginate(db, per_page);

        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::DatabaseError)?;
        let locations = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(LocationListResponse {
            locations,
            total,
            page,
            per_page,
        })
    }

    #[instrument(skip(self, request))]
    pub async fn update_location(
        &self,
        location_id: i64,
        request: UpdateLocationRequest,
    ) -> Result<LocationModel, ServiceError> {
        let db = &*self.db_pool;

        let loc = self.get_location(location_id).await?.ok_or_else(|| {
            ServiceError::NotFound(format!("Location with id {} not found", location_id))
        })?;

        let mut active: LocationActiveModel = loc.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(line1) = request.address_line1 {
            active.address_line1 = Set(line1);
        }
        if let Some(line2) = request.address_line2 {
            active.address_line2 = Set(Some(line2));
        }
        if let Some(city) = request.city {
            active.city = Set(city);
        }
        if let Some(state) = request.state {
            active.state = Set(Some(state));
        }
        if let Some(postal_code) = request.postal_code {
            active.postal_code = Set(Some(postal_code));
        }
        if let Some(country_code) = request.country_code {
            active.country_code = Set(country_code.to_uppercase());
        }
        if let Some(latitude) = request.latitude {
            active.latitude = Set(Some(latitude));
        }
        if let Some(longitude) = request.longitude {
            active.longitude = Set(Some(longitude));
        }
        active.updated_at = Set(Some(Utc::now()));

        active.update(db).await.map_err(|e| {
            error!(error = %e, location_id, "Failed to update location");
            ServiceError::DatabaseError(e)
        })
    }

    #[instrument(skip(self))]
    pub async fn delete_location(&self, location_id: i64) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let result = LocationEntity::delete_by_id(location_id)
            .exec(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Location with id {} not found",
                location_id
            )));
        }
        info!(location_id, "Location deleted");
        Ok(())
    }
}
