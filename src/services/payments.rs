use crate::{
    db::DbPool,
    entities::booking::{self, Entity as BookingEntity, PaymentStatus},
    entities::payment::{
        self, ActiveModel as PaymentActiveModel, Entity as PaymentEntity, Model as PaymentModel,
        PaymentRecordStatus,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::rates::DEFAULT_CURRENCY,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreatePaymentRequest {
    pub booking_id: i64,
    pub user_id: Option<i64>,
    pub amount: Decimal,
    pub currency: Option<String>,
    pub method: Option<String>,
    pub status: Option<PaymentRecordStatus>,
    pub reference: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdatePaymentRequest {
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub method: Option<String>,
    pub status: Option<PaymentRecordStatus>,
    pub reference: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentListResponse {
    pub payments: Vec<PaymentModel>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// Payment ledger CRUD. Settlement happens elsewhere; these rows record it.
#[derive(Clone)]
pub struct PaymentService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl PaymentService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, request), fields(booking_id = request.booking_id))]
    pub async fn create_payment(
        &self,
        request: CreatePaymentRequest,
    ) -> Result<PaymentModel, ServiceError> {
        if request.amount <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "amount must be positive".to_string(),
            ));
        }

        let db = &*self.db_pool;
        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to begin payment transaction");
            ServiceError::DatabaseError(e)
        })?;

        let booking = BookingEntity::find_by_id(request.booking_id)
            .one(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Booking with id {} not found",
                    request.booking_id
                ))
            })?;

        let payment = PaymentActiveModel {
            booking_id: Set(request.booking_id),
            user_id: Set(request.user_id),
            amount: Set(request.amount),
            currency: Set(request
                .currency
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string())),
            method: Set(request.method),
            status: Set(request.status.unwrap_or(PaymentRecordStatus::Pending)),
            reference: Set(request.reference),
            paid_at: Set(request.paid_at),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
            ..Default::default()
        };

        let model = payment.insert(&txn).await.map_err(|e| {
            error!(error = %e, booking_id = request.booking_id, "Failed to create payment");
            ServiceError::DatabaseError(e)
        })?;

        Self::refresh_booking_payment_status(&txn, booking).await?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, "Failed to commit payment transaction");
            ServiceError::DatabaseError(e)
        })?;

        info!(
            payment_id = model.id,
            booking_id = model.booking_id,
            "Payment recorded"
        );

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender
                .send(Event::PaymentRecorded {
                    booking_id: model.booking_id,
                    payment_id: model.id,
                })
                .await
            {
                warn!(error = %e, payment_id = model.id, "Failed to send payment recorded event");
            }
        }

        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn get_payment(&self, payment_id: i64) -> Result<Option<PaymentModel>, ServiceError> {
        let db = &*self.db_pool;
        PaymentEntity::find_by_id(payment_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn list_payments(
        &self,
        page: u64,
        per_page: u64,
        booking_id: Option<i64>,
    ) -> Result<PaymentListResponse, ServiceError> {
        let db = &*self.db_pool;

        let mut query = PaymentEntity::find();
        if let Some(booking_id) = booking_id {
            query = query.filter(payment::Column::BookingId.eq(booking_id));
        }
        let paginator = query
            .order_by_desc(payment::Column::CreatedAt)
            .order_by_desc(payment::Column::Id)
            .paginate(db, per_page);

        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::DatabaseError)?;
        let payments = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(PaymentListResponse {
            payments,
            total,
            page,
            per_page,
        })
    }

    #[instrument(skip(self, request))]
    pub async fn update_payment(
        &self,
        payment_id: i64,
        request: UpdatePaymentRequest,
    ) -> Result<PaymentModel, ServiceError> {
        let db = &*self.db_pool;

        let payment = self.get_payment(payment_id).await?.ok_or_else(|| {
            ServiceError::NotFound(format!("Payment with id {} not found", payment_id))
        })?;
        let booking_id = payment.booking_id;

        if let Some(amount) = request.amount {
            if amount <= Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "amount must be positive".to_string(),
                ));
            }
        }

        let mut active: PaymentActiveModel = payment.into();
        if let Some(amount) = request.amount {
            active.amount = Set(amount);
        }
        if let Some(currency) = request.currency {
            active.currency = Set(currency);
        }
        if let Some(method) = request.method {
            active.method = Set(Some(method));
        }
        if let Some(status) = request.status {
            active.status = Set(status);
        }
        if let Some(reference) = request.reference {
            active.reference = Set(Some(reference));
        }
        if let Some(paid_at) = request.paid_at {
            active.paid_at = Set(Some(paid_at));
        }
        active.updated_at = Set(Some(Utc::now()));

        let txn = db.begin().await.map_err(ServiceError::DatabaseError)?;

        let model = active.update(&txn).await.map_err(|e| {
            error!(error = %e, payment_id, "Failed to update payment");
            ServiceError::DatabaseError(e)
        })?;

        if let Some(booking) = BookingEntity::find_by_id(booking_id)
            .one(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?
        {
            Self::refresh_booking_payment_status(&txn, booking).await?;
        }

        txn.commit().await.map_err(ServiceError::DatabaseError)?;
        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn delete_payment(&self, payment_id: i64) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let payment = self.get_payment(payment_id).await?.ok_or_else(|| {
            ServiceError::NotFound(format!("Payment with id {} not found", payment_id))
        })?;

        let txn = db.begin().await.map_err(ServiceError::DatabaseError)?;

        PaymentEntity::delete_by_id(payment_id)
            .exec(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if let Some(booking) = BookingEntity::find_by_id(payment.booking_id)
            .one(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?
        {
            Self::refresh_booking_payment_status(&txn, booking).await?;
        }

        txn.commit().await.map_err(ServiceError::DatabaseError)?;
        info!(payment_id, "Payment deleted");
        Ok(())
    }

    /// Re-derives the booking's payment_status from the sum of its SUCCEEDED
    /// payments: covering the total means PAID, anything above zero PARTIAL,
    /// nothing UNPAID. AUTHORIZED and REFUNDED are owned by the external
    /// settlement flow and are left untouched.
    async fn refresh_booking_payment_status<C: ConnectionTrait>(
        conn: &C,
        booking: booking::Model,
    ) -> Result<(), ServiceError> {
        if matches!(
            booking.payment_status,
            PaymentStatus::Authorized | PaymentStatus::Refunded
        ) {
            return Ok(());
        }

        let paid: Decimal = PaymentEntity::find()
            .filter(payment::Column::BookingId.eq(booking.id))
            .filter(payment::Column::Status.eq(PaymentRecordStatus::Succeeded))
            .all(conn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .iter()
            .map(|p| p.amount)
            .sum();

        let next = if paid > Decimal::ZERO && paid >= booking.total_amount {
            PaymentStatus::Paid
        } else if paid > Decimal::ZERO {
            PaymentStatus::Partial
        } else {
            PaymentStatus::Unpaid
        };

        if next != booking.payment_status {
            let booking_id = booking.id;
            let mut active: booking::ActiveModel = booking.into();
            active.payment_status = Set(next);
            active.updated_at = Set(Some(Utc::now()));
            active
                .update(conn)
                .await
                .map_err(ServiceError::DatabaseError)?;
            info!(booking_id, status = ?next, "Booking payment status updated");
        }

        Ok(())
    }
}
