use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "RentFleet API",
        version = "1.0.0",
        description = r#"
# RentFleet Car Rental API

Backend for a car-rental operation: rate catalog and resolution, one-way and
delivery fees, booking price calculation, and the booking lifecycle.

## Pricing

`POST /api/v1/rates/calculate-price` prices a prospective booking. The rental
length is the floored day count of the window (minimum one day). The resolver
picks the newest active rate valid on the pickup date whose day bounds cover
the rental, then the tier for the vehicle's group; when nothing matches the
response still carries a price (group base price, vehicle starting price, or
the default daily rate) together with an `error` field.

## Pagination

List endpoints take `page` and `limit` query parameters; responses are wrapped
in `ApiResponse` with a `PaginatedResponse` payload.

## Error Handling

Errors use a consistent envelope with the request id echoed back:

```json
{
  "error": "Not found",
  "message": "Rate with id 7 not found",
  "request_id": "...",
  "timestamp": "2026-01-01T00:00:00Z"
}
```
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "Rates", description = "Rate catalog, tiers, ranges, and price calculation"),
        (name = "One-way fees", description = "City-pair fee catalog and quoting"),
        (name = "Bookings", description = "Booking lifecycle"),
        (name = "Vehicles", description = "Fleet management"),
        (name = "Vehicle groups", description = "Vehicle categories"),
        (name = "Locations", description = "Rental stations"),
        (name = "Users", description = "Customers and guests"),
        (name = "Payments", description = "Payment records"),
    ),
    paths(
        crate::handlers::rates::calculate_price,
        crate::handlers::rates::list_rates,
        crate::handlers::rates::create_rate,
        crate::handlers::rates::get_rate,
        crate::handlers::rates::update_rate,
        crate::handlers::rates::delete_rate,
        crate::handlers::rates::list_tiers,
        crate::handlers::rates::create_tier,
        crate::handlers::rates::create_tiers_bulk,
        crate::handlers::rates::tier_matrix,
        crate::handlers::rates::update_tier,
        crate::handlers::rates::delete_tier,
        crate::handlers::rates::list_day_ranges,
        crate::handlers::rates::create_day_range,
        crate::handlers::rates::delete_day_range,
        crate::handlers::one_way_fees::list_fees,
        crate::handlers::one_way_fees::list_active_fees,
        crate::handlers::one_way_fees::calculate_fee,
        crate::handlers::one_way_fees::get_fee,
        crate::handlers::one_way_fees::create_fee,
        crate::handlers::one_way_fees::update_fee,
        crate::handlers::one_way_fees::delete_fee,
        crate::handlers::bookings::list_bookings,
        crate::handlers::bookings::create_booking,
        crate::handlers::bookings::get_booking,
        crate::handlers::bookings::update_booking,
        crate::handlers::bookings::delete_booking,
        crate::handlers::vehicles::list_vehicles,
        crate::handlers::vehicles::create_vehicle,
        crate::handlers::vehicles::get_vehicle,
        crate::handlers::vehicles::update_vehicle,
        crate::handlers::vehicles::delete_vehicle,
        crate::handlers::vehicle_groups::list_groups,
        crate::handlers::vehicle_groups::create_group,
        crate::handlers::vehicle_groups::get_group,
        crate::handlers::vehicle_groups::update_group,
        crate::handlers::vehicle_groups::delete_group,
        crate::handlers::locations::list_locations,
        crate::handlers::locations::create_location,
        crate::handlers::locations::get_location,
        crate::handlers::locations::update_location,
        crate::handlers::locations::delete_location,
        crate::handlers::users::list_users,
        crate::handlers::users::create_user,
        crate::handlers::users::get_user,
        crate::handlers::users::update_user,
        crate::handlers::users::deactivate_user,
        crate::handlers::payments::list_payments,
        crate::handlers::payments::create_payment,
        crate::handlers::payments::get_payment,
        crate::handlers::payments::update_payment,
        crate::handlers::payments::delete_payment,
    ),
    components(
        schemas(
            crate::errors::ErrorResponse,
            crate::entities::rate::Model,
            crate::entities::rate_tier::Model,
            crate::entities::rate_day_range::Model,
            crate::entities::rate_hour_range::Model,
            crate::entities::rate_km_range::Model,
            crate::entities::one_way_fee::Model,
            crate::entities::booking::Model,
            crate::entities::booking::BookingStatus,
            crate::entities::booking::PaymentStatus,
            crate::entities::vehicle::Model,
            crate::entities::vehicle_group::Model,
            crate::entities::location::Model,
            crate::entities::user::Model,
            crate::entities::payment::Model,
            crate::entities::payment::PaymentRecordStatus,
            crate::services::pricing::PriceRequest,
            crate::services::pricing::PriceBreakdown,
            crate::services::rates::RateResolution,
            crate::services::rates::FallbackSource,
            crate::services::rates::CreateRateRequest,
            crate::services::rates::UpdateRateRequest,
            crate::services::rates::CreateRateTierRequest,
            crate::services::rates::UpdateRateTierRequest,
            crate::services::rates::CreateRangeRequest,
            crate::services::rates::RateWithTiers,
            crate::services::rates::MatrixCell,
            crate::services::fees::CreateOneWayFeeRequest,
            crate::services::fees::UpdateOneWayFeeRequest,
            crate::services::bookings::CreateBookingRequest,
            crate::services::bookings::UpdateBookingRequest,
            crate::services::vehicles::CreateVehicleRequest,
            crate::services::vehicles::UpdateVehicleRequest,
            crate::services::vehicle_groups::CreateVehicleGroupRequest,
            crate::services::vehicle_groups::UpdateVehicleGroupRequest,
            crate::services::locations::CreateLocationRequest,
            crate::services::locations::UpdateLocationRequest,
            crate::services::users::CreateUserRequest,
            crate::services::users::UpdateUserRequest,
            crate::services::payments::CreatePaymentRequest,
            crate::services::payments::UpdatePaymentRequest,
            crate::handlers::rates::CalculatePriceResponse,
            crate::handlers::one_way_fees::FeeCalculation,
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
