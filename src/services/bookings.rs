use crate::{
    db::DbPool,
    entities::booking::{
        self, ActiveModel as BookingActiveModel, BookingStatus, Entity as BookingEntity,
        Model as BookingModel, PaymentStatus,
    },
    entities::user::{self, ActiveModel as UserActiveModel, Entity as UserEntity},
    errors::ServiceError,
    events::{Event, EventSender},
    services::fees::FeeService,
    services::pricing::{parse_booking_datetime, PriceRequest, PricingService},
    services::rates::DEFAULT_CURRENCY,
};
use chrono::{NaiveDateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    #[validate(length(min = 1, max = 100, message = "first_name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "last_name is required"))]
    pub last_name: String,
    #[validate(email(message = "email must be a valid email address"))]
    #[validate(length(max = 254))]
    pub email: String,
    #[validate(length(max = 40))]
    pub phone: Option<String>,
    pub vehicle_id: Option<i64>,
    pub vehicle_group_id: Option<i64>,
    pub pickup_location_id: Option<i64>,
    pub dropoff_location_id: Option<i64>,
    pub pickup_datetime: Option<String>,
    pub dropoff_datetime: Option<String>,
    pub broker: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateBookingRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: Option<String>,
    #[validate(length(max = 40))]
    pub phone: Option<String>,
    pub vehicle_id: Option<i64>,
    pub pickup_location_id: Option<i64>,
    pub dropoff_location_id: Option<i64>,
    pub pickup_datetime: Option<String>,
    pub dropoff_datetime: Option<String>,
    pub status: Option<BookingStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub broker: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookingListResponse {
    pub bookings: Vec<BookingModel>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// Service owning the booking lifecycle: guest-user resolution, price
/// snapshotting at creation, and the constrained update path.
#[derive(Clone)]
pub struct BookingService {
    db_pool: Arc<DbPool>,
    pricing: PricingService,
    fees: FeeService,
    event_sender: Option<Arc<EventSender>>,
}

impl BookingService {
    pub fn new(
        db_pool: Arc<DbPool>,
        pricing: PricingService,
        fees: FeeService,
        event_sender: Option<Arc<EventSender>>,
    ) -> Self {
        Self {
            db_pool,
            pricing,
            fees,
            event_sender,
        }
    }

    /// Finds the user the booking belongs to, or creates a guest. Matches by
    /// email first; a phone match has its email refreshed; any match gets its
    /// name and phone refreshed from the latest contact details.
    async fn find_or_create_user(
        &self,
        txn: &DatabaseTransaction,
        request: &CreateBookingRequest,
    ) -> Result<(i64, bool), ServiceError> {
        let by_email = UserEntity::find()
            .filter(user::Column::Email.eq(request.email.clone()))
            .one(txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if let Some(existing) = by_email {
            let user_id = existing.id;
            let mut active: UserActiveModel = existing.into();
            active.first_name = Set(request.first_name.clone());
            active.last_name = Set(request.last_name.clone());
            if let Some(phone) = &request.phone {
                active.phone = Set(Some(phone.clone()));
            }
            active.updated_at = Set(Some(Utc::now()));
            active.update(txn).await.map_err(ServiceError::DatabaseError)?;
            return Ok((user_id, false));
        }

        if let Some(phone) = &request.phone {
            let by_phone = UserEntity::find()
                .filter(user::Column::Phone.eq(phone.clone()))
                .one(txn)
                .await
                .map_err(ServiceError::DatabaseError)?;

            if let Some(existing) = by_phone {
                let user_id = existing.id;
                let mut active: UserActiveModel = existing.into();
                active.email = Set(Some(request.email.clone()));
                active.first_name = Set(request.first_name.clone());
                active.last_name = Set(request.last_name.clone());
                active.updated_at = Set(Some(Utc::now()));
                active
                    .update(txn)
                    .await
                    .map_err(ServiceError::DatabaseError)?;
                return Ok((user_id, false));
            }
        }

        let guest = UserActiveModel {
            first_name: Set(request.first_name.clone()),
            last_name: Set(request.last_name.clone()),
            email: Set(Some(request.email.clone())),
            phone: Set(request.phone.clone()),
            is_active: Set(true),
            is_guest: Set(true),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
            ..Default::default()
        };
        let model = guest.insert(txn).await.map_err(ServiceError::DatabaseError)?;
        Ok((model.id, true))
    }

    /// Creates a booking. Contact details are validated before any write;
    /// the guest user and the booking land in one transaction, so a failed
    /// insert rolls the user back too. When a vehicle and both timestamps are
    /// present the booking is priced and the breakdown snapshotted onto it.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn create_booking(
        &self,
        request: CreateBookingRequest,
    ) -> Result<BookingModel, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::InvalidInput(e.to_string()))?;

        // Parse up front so bad input can never leave partial writes
        let pickup = request
            .pickup_datetime
            .as_deref()
            .map(parse_booking_datetime)
            .transpose()?;
        let dropoff = request
            .dropoff_datetime
            .as_deref()
            .map(parse_booking_datetime)
            .transpose()?;
        if let (Some(pickup), Some(dropoff)) = (pickup, dropoff) {
            if dropoff <= pickup {
                return Err(ServiceError::InvalidInput(
                    "dropoff_datetime must be after pickup_datetime".to_string(),
                ));
            }
        }

        let priced = match (request.vehicle_id, &request.pickup_datetime, &request.dropoff_datetime)
        {
            (Some(vehicle_id), Some(pickup_s), Some(dropoff_s)) => Some(
                self.pricing
                    .calculate(PriceRequest {
                        vehicle_id,
                        pickup_datetime: pickup_s.clone(),
                        dropoff_datetime: dropoff_s.clone(),
                        pickup_location_id: request.pickup_location_id,
                        dropoff_location_id: request.dropoff_location_id,
                    })
                    .await?,
            ),
            _ => None,
        };

        let db = &*self.db_pool;
        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start booking creation transaction");
            ServiceError::DatabaseError(e)
        })?;

        let (user_id, user_created) = self.find_or_create_user(&txn, &request).await?;

        let now = Utc::now();
        let booking = BookingActiveModel {
            user_id: Set(user_id),
            vehicle_id: Set(request.vehicle_id),
            vehicle_group_id: Set(request.vehicle_group_id),
            pickup_location_id: Set(request.pickup_location_id),
            dropoff_location_id: Set(request.dropoff_location_id),
            pickup_datetime: Set(pickup),
            dropoff_datetime: Set(dropoff),
            status: Set(BookingStatus::Pending),
            payment_status: Set(PaymentStatus::Unpaid),
            rate_id: Set(priced.as_ref().and_then(|p| p.rate_id)),
            rate_tier_id: Set(priced.as_ref().and_then(|p| p.rate_tier_id)),
            price_per_day: Set(priced.as_ref().map(|p| p.price_per_day)),
            one_way_fee: Set(priced
                .as_ref()
                .map(|p| p.one_way_fee)
                .unwrap_or(Decimal::ZERO)),
            delivery_fee: Set(priced
                .as_ref()
                .map(|p| p.delivery_fee)
                .unwrap_or(Decimal::ZERO)),
            total_amount: Set(priced
                .as_ref()
                .map(|p| p.total_with_fees)
                .unwrap_or(Decimal::ZERO)),
            currency: Set(priced
                .as_ref()
                .map(|p| p.currency.clone())
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string())),
            first_name: Set(request.first_name.clone()),
            last_name: Set(request.last_name.clone()),
            email: Set(request.email.clone()),
            phone: Set(request.phone.clone()),
            broker: Set(request.broker),
            notes: Set(request.notes),
            created_at: Set(now),
            updated_at: Set(None),
            ..Default::default()
        };

        let model = match booking.insert(&txn).await {
            Ok(model) => model,
            Err(e) => {
                // Roll back so the guest user insert does not survive alone
                let _ = txn.rollback().await;
                return Err(
                    if matches!(e.sql_err(), Some(sea_orm::SqlErr::UniqueConstraintViolation(_))) {
                        ServiceError::Conflict("Booking conflicts with an existing row".to_string())
                    } else {
                        error!(error = %e, "Failed to create booking");
                        ServiceError::DatabaseError(e)
                    },
                );
            }
        };

        txn.commit().await.map_err(|e| {
            error!(error = %e, "Failed to commit booking creation transaction");
            ServiceError::DatabaseError(e)
        })?;

        info!(booking_id = model.id, user_id, "Booking created successfully");

        if let Some(event_sender) = &self.event_sender {
            if user_created {
                if let Err(e) = event_sender.send(Event::GuestUserCreated(user_id)).await {
                    warn!(error = %e, user_id, "Failed to send guest user created event");
                }
            }
            if let Err(e) = event_sender.send(Event::BookingCreated(model.id)).await {
                warn!(error = %e, booking_id = model.id, "Failed to send booking created event");
            }
        }

        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn get_booking(&self, booking_id: i64) -> Result<Option<BookingModel>, ServiceError> {
        let db = &*self.db_pool;
        BookingEntity::find_by_id(booking_id)
            .one(db)
            .await
            .map_err(|e| {
                error!(error = %e, booking_id, "Failed to fetch booking");
                ServiceError::DatabaseError(e)
            })
    }

    #[instrument(skip(self))]
    pub async fn list_bookings(
        &self,
        page: u64,
        per_page: u64,
        status: Option<BookingStatus>,
    ) -> Result<BookingListResponse, ServiceError> {
        let db = &*self.db_pool;

        let mut query = BookingEntity::find();
        if let Some(status) = status {
            query = query.filter(booking::Column::Status.eq(status));
        }
        let paginator = query
            .order_by_desc(booking::Column::CreatedAt)
            .order_by_desc(booking::Column::Id)
            .paginate(db, per_page);

        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::DatabaseError)?;
        let bookings = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(BookingListResponse {
            bookings,
            total,
            page,
            per_page,
        })
    }

    /// Updates a booking. When either location changes, only the one-way fee
    /// is recomputed and the total re-derived from it; `price_per_day`, the
    /// rate ids and the delivery fee keep their creation snapshot even when
    /// the window changes.
    #[instrument(skip(self, request), fields(booking_id))]
    pub async fn update_booking(
        &self,
        booking_id: i64,
        request: UpdateBookingRequest,
    ) -> Result<BookingModel, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::InvalidInput(e.to_string()))?;

        let booking = self.get_booking(booking_id).await?.ok_or_else(|| {
            ServiceError::NotFound(format!("Booking with id {} not found", booking_id))
        })?;

        let new_pickup: Option<NaiveDateTime> = request
            .pickup_datetime
            .as_deref()
            .map(parse_booking_datetime)
            .transpose()?;
        let new_dropoff: Option<NaiveDateTime> = request
            .dropoff_datetime
            .as_deref()
            .map(parse_booking_datetime)
            .transpose()?;

        let pickup_location_id = request
            .pickup_location_id
            .or(booking.pickup_location_id);
        let dropoff_location_id = request
            .dropoff_location_id
            .or(booking.dropoff_location_id);
        let locations_changed = pickup_location_id != booking.pickup_location_id
            || dropoff_location_id != booking.dropoff_location_id;

        let old_status = booking.status;
        let old_one_way = booking.one_way_fee;
        let old_total = booking.total_amount;

        let mut active: BookingActiveModel = booking.into();
        if let Some(first_name) = request.first_name {
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = request.last_name {
            active.last_name = Set(last_name);
        }
        if let Some(email) = request.email {
            active.email = Set(email);
        }
        if let Some(phone) = request.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(vehicle_id) = request.vehicle_id {
            active.vehicle_id = Set(Some(vehicle_id));
        }
        if let Some(pickup) = new_pickup {
            active.pickup_datetime = Set(Some(pickup));
        }
        if let Some(dropoff) = new_dropoff {
            active.dropoff_datetime = Set(Some(dropoff));
        }
        active.pickup_location_id = Set(pickup_location_id);
        active.dropoff_location_id = Set(dropoff_location_id);
        if let Some(status) = request.status {
            active.status = Set(status);
        }
        if let Some(payment_status) = request.payment_status {
            active.payment_status = Set(payment_status);
        }
        if let Some(broker) = request.broker {
            active.broker = Set(Some(broker));
        }
        if let Some(notes) = request.notes {
            active.notes = Set(Some(notes));
        }

        if locations_changed {
            let quote = self
                .fees
                .one_way_fee(pickup_location_id, dropoff_location_id)
                .await?;
            active.one_way_fee = Set(quote.amount);
            active.total_amount = Set(old_total - old_one_way + quote.amount);
        }

        active.updated_at = Set(Some(Utc::now()));

        let db = &*self.db_pool;
        let model = active.update(db).await.map_err(|e| {
            error!(error = %e, booking_id, "Failed to update booking");
            ServiceError::DatabaseError(e)
        })?;

        info!(booking_id, "Booking updated successfully");

        if let Some(event_sender) = &self.event_sender {
            if model.status != old_status {
                if let Err(e) = event_sender
                    .send(Event::BookingStatusChanged {
                        booking_id,
                        old_status: format!("{:?}", old_status),
                        new_status: format!("{:?}", model.status),
                    })
                    .await
                {
                    warn!(error = %e, booking_id, "Failed to send status changed event");
                }
            }
            if let Err(e) = event_sender.send(Event::BookingUpdated(booking_id)).await {
                warn!(error = %e, booking_id, "Failed to send booking updated event");
            }
        }

        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn delete_booking(&self, booking_id: i64) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let result = BookingEntity::delete_by_id(booking_id)
            .exec(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Booking with id {} not found",
                booking_id
            )));
        }

        info!(booking_id, "Booking deleted");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::BookingCancelled(booking_id)).await {
                warn!(error = %e, booking_id, "Failed to send booking cancelled event");
            }
        }

        Ok(())
    }
}
