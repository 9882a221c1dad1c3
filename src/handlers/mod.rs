pub mod bookings;
pub mod locations;
pub mod one_way_fees;
pub mod payments;
pub mod rates;
pub mod users;
pub mod vehicle_groups;
pub mod vehicles;

use std::sync::Arc;

use crate::db::DbPool;
use crate::events::EventSender;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub rates: crate::services::rates::RateService,
    pub fees: crate::services::fees::FeeService,
    pub pricing: crate::services::pricing::PricingService,
    pub bookings: crate::services::bookings::BookingService,
    pub vehicles: crate::services::vehicles::VehicleService,
    pub vehicle_groups: crate::services::vehicle_groups::VehicleGroupService,
    pub locations: crate::services::locations::LocationService,
    pub users: crate::services::users::UserService,
    pub payments: crate::services::payments::PaymentService,
}

impl AppServices {
    /// Build the service container shared by all HTTP handlers.
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        let rates =
            crate::services::rates::RateService::new(db_pool.clone(), Some(event_sender.clone()));
        let fees =
            crate::services::fees::FeeService::new(db_pool.clone(), Some(event_sender.clone()));
        let pricing = crate::services::pricing::PricingService::new(
            db_pool.clone(),
            rates.clone(),
            fees.clone(),
        );
        let bookings = crate::services::bookings::BookingService::new(
            db_pool.clone(),
            pricing.clone(),
            fees.clone(),
            Some(event_sender.clone()),
        );
        let vehicles = crate::services::vehicles::VehicleService::new(
            db_pool.clone(),
            Some(event_sender.clone()),
        );
        let vehicle_groups = crate::services::vehicle_groups::VehicleGroupService::new(
            db_pool.clone(),
            Some(event_sender.clone()),
        );
        let locations = crate::services::locations::LocationService::new(
            db_pool.clone(),
            Some(event_sender.clone()),
        );
        let users =
            crate::services::users::UserService::new(db_pool.clone(), Some(event_sender.clone()));
        let payments = crate::services::payments::PaymentService::new(
            db_pool.clone(),
            Some(event_sender),
        );

        Self {
            rates,
            fees,
            pricing,
            bookings,
            vehicles,
            vehicle_groups,
            locations,
            users,
            payments,
        }
    }
}

/// Flattens validator errors into the `field: message` strings used by
/// `ApiResponse::validation_errors`.
pub(crate) fn collect_validation_errors(errors: &validator::ValidationErrors) -> Vec<String> {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            let field = field.to_string();
            errors.iter().map(move |error| {
                format!(
                    "{}: {}",
                    field,
                    error.message.as_ref().unwrap_or(&"Invalid value".into())
                )
            })
        })
        .collect()
}
