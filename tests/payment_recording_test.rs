mod common;

use axum::http::{Method, StatusCode};
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use common::*;

fn date(s: &str) -> chrono::NaiveDate {
    s.parse().expect("valid date")
}

/// Seeds a priceable vehicle and creates a booking totalling 97.00
/// (2 days x 36.00 + 25.00 one-way fee). Returns the booking id.
async fn booked_setup(app: &TestApp) -> i64 {
    let berlin = seed_location(app, "Berlin Hbf", "Berlin").await;
    let munich = seed_location(app, "Munich Airport", "Munich").await;
    seed_one_way_fee(app, "Berlin", "Munich", dec!(25)).await;
    let group = seed_group(app, "Compact", None).await;
    let vehicle = seed_vehicle(app, Some(group.id), None, None).await;
    let rate = seed_rate(app, "Summer", date("2025-06-01"), date("2025-09-30"), 1, None).await;
    seed_tier(app, rate.id, group.id, 1, None, dec!(36)).await;

    let created = TestApp::json_body(
        app.request(
            Method::POST,
            "/api/v1/bookings",
            Some(json!({
                "first_name": "Ada",
                "last_name": "Lovelace",
                "email": "ada@example.com",
                "vehicle_id": vehicle.id,
                "pickup_location_id": berlin.id,
                "dropoff_location_id": munich.id,
                "pickup_datetime": "2025-07-01T10:00:00",
                "dropoff_datetime": "2025-07-03T10:00:00",
            })),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    created["data"]["id"].as_i64().expect("booking id")
}

async fn record_payment(app: &TestApp, booking_id: i64, amount: &str, status: &str) -> Value {
    TestApp::json_body(
        app.request(
            Method::POST,
            "/api/v1/payments",
            Some(json!({
                "booking_id": booking_id,
                "amount": amount,
                "status": status,
            })),
        )
        .await,
        StatusCode::CREATED,
    )
    .await
}

async fn booking_payment_status(app: &TestApp, booking_id: i64) -> Value {
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
    fetched["data"]["payment_status"].clone()
}

#[tokio::test]
async fn succeeded_payments_roll_up_into_the_booking_status() {
    let app = TestApp::new().await;
    let booking_id = booked_setup(&app).await;

    // A pending payment settles nothing
    record_payment(&app, booking_id, "10.00", "PENDING").await;
    assert_eq!(booking_payment_status(&app, booking_id).await, "UNPAID");

    // Partial coverage of the 97.00 total
    record_payment(&app, booking_id, "50.00", "SUCCEEDED").await;
    assert_eq!(booking_payment_status(&app, booking_id).await, "PARTIAL");

    // The remainder settles the booking
    record_payment(&app, booking_id, "47.00", "SUCCEEDED").await;
    assert_eq!(booking_payment_status(&app, booking_id).await, "PAID");
}

#[tokio::test]
async fn deleting_a_payment_reverts_the_booking_status() {
    let app = TestApp::new().await;
    let booking_id = booked_setup(&app).await;

    let payment = record_payment(&app, booking_id, "97.00", "SUCCEEDED").await;
    assert_eq!(booking_payment_status(&app, booking_id).await, "PAID");

    let payment_id = payment["data"]["id"].as_i64().expect("payment id");
    let deleted = app
        .request(
            Method::DELETE,
            &format!("/api/v1/payments/{}", payment_id),
            None,
        )
        .await;
    assert_eq!(deleted.status(), StatusCode::OK);

    assert_eq!(booking_payment_status(&app, booking_id).await, "UNPAID");
}

#[tokio::test]
async fn flipping_a_payment_to_succeeded_settles_the_booking() {
    let app = TestApp::new().await;
    let booking_id = booked_setup(&app).await;

    let payment = record_payment(&app, booking_id, "97.00", "PENDING").await;
    assert_eq!(booking_payment_status(&app, booking_id).await, "UNPAID");

    let payment_id = payment["data"]["id"].as_i64().expect("payment id");
    let updated = app
        .request(
            Method::PUT,
            &format!("/api/v1/payments/{}", payment_id),
            Some(json!({ "status": "SUCCEEDED" })),
        )
        .await;
    assert_eq!(updated.status(), StatusCode::OK);

    assert_eq!(booking_payment_status(&app, booking_id).await, "PAID");
}

#[tokio::test]
async fn payment_for_unknown_booking_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/payments",
            Some(json!({
                "booking_id": 9999,
                "amount": "10.00",
                "status": "SUCCEEDED",
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
