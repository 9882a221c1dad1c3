mod common;

use axum::http::{Method, StatusCode};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::{json, Value};

use common::*;
use rentfleet_api::entities::user;

fn date(s: &str) -> chrono::NaiveDate {
    s.parse().expect("valid date")
}

fn dec_field(value: &Value, field: &str) -> Decimal {
    value[field]
        .as_str()
        .unwrap_or_else(|| panic!("{} should be a decimal string: {}", field, value))
        .parse()
        .expect("decimal parses")
}

async fn priced_setup(app: &TestApp) -> (i64, i64, i64) {
    let berlin = seed_location(app, "Berlin Hbf", "Berlin").await;
    let munich = seed_location(app, "Munich Airport", "Munich").await;
    seed_one_way_fee(app, "Berlin", "Munich", dec!(25)).await;

    let group = seed_group(app, "Compact", None).await;
    let vehicle = seed_vehicle(app, Some(group.id), None, None).await;
    let rate = seed_rate(app, "Summer", date("2025-06-01"), date("2025-09-30"), 1, None).await;
    seed_tier(app, rate.id, group.id, 1, None, dec!(36)).await;

    (vehicle.id, berlin.id, munich.id)
}

fn booking_payload(vehicle_id: i64, pickup_loc: i64, dropoff_loc: i64) -> Value {
    json!({
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email": "ada@example.com",
        "phone": "+49 30 1234567",
        "vehicle_id": vehicle_id,
        "pickup_location_id": pickup_loc,
        "dropoff_location_id": dropoff_loc,
        "pickup_datetime": "2025-07-01T10:00:00",
        "dropoff_datetime": "2025-07-03T10:00:00",
    })
}

#[tokio::test]
async fn create_snapshots_price_and_creates_guest_user() {
    let app = TestApp::new().await;
    let (vehicle_id, berlin, munich) = priced_setup(&app).await;

    let body = TestApp::json_body(
        app.request(
            Method::POST,
            "/api/v1/bookings",
            Some(booking_payload(vehicle_id, berlin, munich)),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let booking = &body["data"];

    assert_eq!(booking["status"], "PENDING");
    assert_eq!(booking["payment_status"], "UNPAID");
    assert_eq!(dec_field(booking, "price_per_day"), dec!(36));
    assert_eq!(dec_field(booking, "one_way_fee"), dec!(25));
    assert_eq!(dec_field(booking, "total_amount"), dec!(97));

    let guest = user::Entity::find()
        .filter(user::Column::Email.eq("ada@example.com"))
        .one(&*app.state.db)
        .await
        .expect("query users")
        .expect("guest user exists");
    assert!(guest.is_guest);
    assert_eq!(booking["user_id"], guest.id);
}

#[tokio::test]
async fn repeat_email_reuses_the_user_and_refreshes_contact() {
    let app = TestApp::new().await;
    let (vehicle_id, berlin, munich) = priced_setup(&app).await;

    let first = TestApp::json_body(
        app.request(
            Method::POST,
            "/api/v1/bookings",
            Some(booking_payload(vehicle_id, berlin, munich)),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;

    let mut second_payload = booking_payload(vehicle_id, berlin, munich);
    second_payload["first_name"] = json!("Adalyn");
    let second = TestApp::json_body(
        app.request(Method::POST, "/api/v1/bookings", Some(second_payload)).await,
        StatusCode::CREATED,
    )
    .await;

    assert_eq!(first["data"]["user_id"], second["data"]["user_id"]);

    let users = user::Entity::find()
        .count(&*app.state.db)
        .await
        .expect("count users");
    assert_eq!(users, 1);

    let refreshed = user::Entity::find()
        .one(&*app.state.db)
        .await
        .expect("query users")
        .expect("user exists");
    assert_eq!(refreshed.first_name, "Adalyn");
}

#[tokio::test]
async fn phone_match_reuses_the_user_and_updates_email() {
    let app = TestApp::new().await;
    let (vehicle_id, berlin, munich) = priced_setup(&app).await;

    let first = TestApp::json_body(
        app.request(
            Method::POST,
            "/api/v1/bookings",
            Some(booking_payload(vehicle_id, berlin, munich)),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;

    let mut second_payload = booking_payload(vehicle_id, berlin, munich);
    second_payload["email"] = json!("ada.new@example.com");
    let second = TestApp::json_body(
        app.request(Method::POST, "/api/v1/bookings", Some(second_payload)).await,
        StatusCode::CREATED,
    )
    .await;

    assert_eq!(first["data"]["user_id"], second["data"]["user_id"]);

    let refreshed = user::Entity::find()
        .one(&*app.state.db)
        .await
        .expect("query users")
        .expect("user exists");
    assert_eq!(refreshed.email.as_deref(), Some("ada.new@example.com"));
}

#[tokio::test]
async fn invalid_contact_rejected_before_any_write() {
    let app = TestApp::new().await;
    let (vehicle_id, berlin, munich) = priced_setup(&app).await;

    let mut payload = booking_payload(vehicle_id, berlin, munich);
    payload["email"] = json!("not-an-email");
    let response = app
        .request(Method::POST, "/api/v1/bookings", Some(payload))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let users = user::Entity::find()
        .count(&*app.state.db)
        .await
        .expect("count users");
    assert_eq!(users, 0, "validation failure must not leave a user behind");
}

#[tokio::test]
async fn invalid_contact_on_update_is_rejected_with_400() {
    let app = TestApp::new().await;
    let (vehicle_id, berlin, munich) = priced_setup(&app).await;

    let created = TestApp::json_body(
        app.request(
            Method::POST,
            "/api/v1/bookings",
            Some(booking_payload(vehicle_id, berlin, munich)),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let booking_id = created["data"]["id"].as_i64().expect("booking id");

    let body = TestApp::json_body(
        app.request(
            Method::PUT,
            &format!("/api/v1/bookings/{}", booking_id),
            Some(json!({ "email": "not-an-email" })),
        )
        .await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(body["success"], false);
    assert!(body["errors"].as_array().is_some_and(|e| !e.is_empty()));

    // The rejected update must not have touched the booking
    let fetched = TestApp::json_body(
        app.request(
            Method::GET,
            &format!("/api/v1/bookings/{}", booking_id),
            None,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(fetched["data"]["email"], "ada@example.com");
}

#[tokio::test]
async fn location_change_recomputes_only_the_one_way_fee() {
    let app = TestApp::new().await;
    let (vehicle_id, berlin, munich) = priced_setup(&app).await;
    // Hamburg has no fee row in either direction
    let hamburg = seed_location(&app, "Hamburg City", "Hamburg").await;

    let created = TestApp::json_body(
        app.request(
            Method::POST,
            "/api/v1/bookings",
            Some(booking_payload(vehicle_id, berlin, munich)),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let booking_id = created["data"]["id"].as_i64().expect("booking id");
    assert_eq!(dec_field(&created["data"], "total_amount"), dec!(97));

    let updated = TestApp::json_body(
        app.request(
            Method::PUT,
            &format!("/api/v1/bookings/{}", booking_id),
            Some(json!({ "dropoff_location_id": hamburg.id })),
        )
        .await,
        StatusCode::OK,
    )
    .await;

    // Berlin -> Hamburg has no fee: one-way drops out of the total, the
    // per-day price and rate snapshot stay untouched.
    assert_eq!(dec_field(&updated["data"], "one_way_fee"), dec!(0));
    assert_eq!(dec_field(&updated["data"], "total_amount"), dec!(72));
    assert_eq!(dec_field(&updated["data"], "price_per_day"), dec!(36));
    assert_eq!(updated["data"]["rate_id"], created["data"]["rate_id"]);
}

#[tokio::test]
async fn priced_snapshot_survives_later_catalog_edits() {
    let app = TestApp::new().await;
    let (vehicle_id, berlin, munich) = priced_setup(&app).await;

    let created = TestApp::json_body(
        app.request(
            Method::POST,
            "/api/v1/bookings",
            Some(booking_payload(vehicle_id, berlin, munich)),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let booking_id = created["data"]["id"].as_i64().expect("booking id");
    let tier_id = created["data"]["rate_tier_id"].as_i64().expect("tier id");

    // Raise the tier price after the booking was made
    let tier_update = app
        .request(
            Method::PUT,
            &format!("/api/v1/rates/tiers/{}", tier_id),
            Some(json!({ "price_per_day": "99.00" })),
        )
        .await;
    assert_eq!(tier_update.status(), StatusCode::OK);

    let fetched = TestApp::json_body(
        app.request(
            Method::GET,
            &format!("/api/v1/bookings/{}", booking_id),
            None,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(dec_field(&fetched["data"], "price_per_day"), dec!(36));
    assert_eq!(dec_field(&fetched["data"], "total_amount"), dec!(97));
}

#[tokio::test]
async fn status_filter_narrows_the_booking_list() {
    let app = TestApp::new().await;
    let (vehicle_id, berlin, munich) = priced_setup(&app).await;

    let created = TestApp::json_body(
        app.request(
            Method::POST,
            "/api/v1/bookings",
            Some(booking_payload(vehicle_id, berlin, munich)),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let booking_id = created["data"]["id"].as_i64().expect("booking id");

    let confirm = app
        .request(
            Method::PUT,
            &format!("/api/v1/bookings/{}", booking_id),
            Some(json!({ "status": "CONFIRMED" })),
        )
        .await;
    assert_eq!(confirm.status(), StatusCode::OK);

    let confirmed = TestApp::json_body(
        app.request(Method::GET, "/api/v1/bookings?status=CONFIRMED", None).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(confirmed["data"]["total"], 1);

    let pending = TestApp::json_body(
        app.request(Method::GET, "/api/v1/bookings?status=PENDING", None).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(pending["data"]["total"], 0);
}
