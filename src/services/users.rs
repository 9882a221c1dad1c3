use crate::{
    db::DbPool,
    entities::user::{
        self, ActiveModel as UserActiveModel, Entity as UserEntity, Model as UserModel,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100, message = "first_name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "last_name is required"))]
    pub last_name: String,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: Option<String>,
    #[validate(length(max = 40))]
    pub phone: Option<String>,
    pub licence_number: Option<String>,
    pub licence_country: Option<String>,
    pub licence_expiry: Option<NaiveDate>,
}

#[derive(Debug, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: Option<String>,
    #[validate(length(max = 40))]
    pub phone: Option<String>,
    pub is_active: Option<bool>,
    pub licence_number: Option<String>,
    pub licence_country: Option<String>,
    pub licence_expiry: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserListResponse {
    pub users: Vec<UserModel>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// Customer CRUD. Guest creation during booking lives in the booking
/// service; this is the administrative surface.
#[derive(Clone)]
pub struct UserService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl UserService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, request))]
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<UserModel, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = &*self.db_pool;
        let user = UserActiveModel {
            first_name: Set(request.first_name),
            last_name: Set(request.last_name),
            email: Set(request.email),
            phone: Set(request.phone),
            is_active: Set(true),
            is_guest: Set(false),
            licence_number: Set(request.licence_number),
            licence_country: Set(request.licence_country),
            licence_expiry: Set(request.licence_expiry),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
            ..Default::default()
        };

        let model = user.insert(db).await.map_err(|e| {
            if matches!(e.sql_err(), Some(sea_orm::SqlErr::UniqueConstraintViolation(_))) {
                ServiceError::Conflict("User with that email already exists".to_string())
            } else {
                error!(error = %e, "Failed to create user");
                ServiceError::DatabaseError(e)
            }
        })?;

        info!(user_id = model.id, "User created");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::UserCreated(model.id)).await {
                warn!(error = %e, user_id = model.id, "Failed to send user created event");
            }
        }

        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: i64) -> Result<Option<UserModel>, ServiceError> {
        let db = &*self.db_pool;
        UserEntity::find_by_id(user_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn list_users(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<UserListResponse, ServiceError> {
        let db = &*self.db_pool;

        let paginator = UserEntity::find()
            .filter(user::Column::IsActive.eq(true))
            .order_by_desc(user::Column::Id)
            .paginate(db, per_page);

        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::DatabaseError)?;
        let users = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(UserListResponse {
            users,
            total,
            page,
            per_page,
        })
    }

    #[instrument(skip(self, request))]
    pub async fn update_user(
        &self,
        user_id: i64,
        request: UpdateUserRequest,
    ) -> Result<UserModel, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = &*self.db_pool;
        let user = self
            .get_user(user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User with id {} not found", user_id)))?;

        let mut active: UserActiveModel = user.into();
        if let Some(first_name) = request.first_name {
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = request.last_name {
            active.last_name = Set(last_name);
        }
        if let Some(email) = request.email {
            active.email = Set(Some(email));
        }
        if let Some(phone) = request.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(is_active) = request.is_active {
            active.is_active = Set(is_active);
        }
        if let Some(licence_number) = request.licence_number {
            active.licence_number = Set(Some(licence_number));
        }
        if let Some(licence_country) = request.licence_country {
            active.licence_country = Set(Some(licence_country));
        }
        if let Some(licence_expiry) = request.licence_expiry {
            active.licence_expiry = Set(Some(licence_expiry));
        }
        active.updated_at = Set(Some(Utc::now()));

        active.update(db).await.map_err(|e| {
            if matches!(e.sql_err(), Some(sea_orm::SqlErr::UniqueConstraintViolation(_))) {
                ServiceError::Conflict("User with that email already exists".to_string())
            } else {
                error!(error = %e, user_id, "Failed to update user");
                ServiceError::DatabaseError(e)
            }
        })
    }

    /// Deactivates a user instead of removing the row; bookings keep their
    /// user reference.
    #[instrument(skip(self))]
    pub async fn deactivate_user(&self, user_id: i64) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let user = self
            .get_user(user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User with id {} not found", user_id)))?;

        let mut active: UserActiveModel = user.into();
        active.is_active = Set(false);
        active.updated_at = Set(Some(Utc::now()));
        active.update(db).await.map_err(ServiceError::DatabaseError)?;

        info!(user_id, "User deactivated");
        Ok(())
    }
}
