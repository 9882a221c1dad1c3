mod common;

use axum::http::{Method, StatusCode};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use common::*;

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

#[tokio::test]
async fn two_day_rental_uses_matching_tier() {
    let app = TestApp::new().await;
    let group = seed_group(&app, "Compact", Some(dec!(30))).await;
    let vehicle = seed_vehicle(&app, Some(group.id), None, Some(dec!(40))).await;
    let rate = seed_rate(&app, "Summer", date("2025-06-01"), date("2025-09-30"), 1, None).await;
    seed_tier(&app, rate.id, group.id, 1, Some(7), dec!(36)).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/rates/calculate-price",
            Some(json!({
                "vehicle_id": vehicle.id,
                "pickup_datetime": "2025-07-01T10:00:00",
                "dropoff_datetime": "2025-07-03T10:00:00",
            })),
        )
        .await;
    let body = TestApp::json_body(response, StatusCode::OK).await;

    assert_eq!(body["rental_days"], 2);
    assert_eq!(dec_field(&body, "price_per_day"), dec!(36));
    assert_eq!(dec_field(&body, "base_total"), dec!(72));
    assert_eq!(dec_field(&body, "total_with_fees"), dec!(72));
    assert_eq!(body["rate_id"], rate.id);
    assert!(body["fallback"].is_null());
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn one_way_fee_is_added_to_the_total() {
    let app = TestApp::new().await;
    let berlin = seed_location(&app, "Berlin Hbf", "Berlin").await;
    let munich = seed_location(&app, "Munich Airport", "Munich").await;
    seed_one_way_fee(&app, "Berlin", "Munich", dec!(25)).await;

    let group = seed_group(&app, "Compact", None).await;
    let vehicle = seed_vehicle(&app, Some(group.id), None, None).await;
    let rate = seed_rate(&app, "Summer", date("2025-06-01"), date("2025-09-30"), 1, None).await;
    seed_tier(&app, rate.id, group.id, 1, None, dec!(36)).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/rates/calculate-price",
            Some(json!({
                "vehicle_id": vehicle.id,
                "pickup_datetime": "2025-07-01T10:00:00",
                "dropoff_datetime": "2025-07-03T10:00:00",
                "pickup_location_id": berlin.id,
                "dropoff_location_id": munich.id,
            })),
        )
        .await;
    let body = TestApp::json_body(response, StatusCode::OK).await;

    assert_eq!(dec_field(&body, "base_total"), dec!(72));
    assert_eq!(dec_field(&body, "one_way_fee"), dec!(25));
    assert_eq!(dec_field(&body, "total_with_fees"), dec!(97));
}

#[tokio::test]
async fn groupless_vehicle_falls_back_to_starting_price() {
    let app = TestApp::new().await;
    let vehicle = seed_vehicle(&app, None, None, Some(dec!(40))).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/rates/calculate-price",
            Some(json!({
                "vehicle_id": vehicle.id,
                "pickup_datetime": "2025-07-01T10:00:00",
                "dropoff_datetime": "2025-07-02T10:00:00",
            })),
        )
        .await;
    let body = TestApp::json_body(response, StatusCode::OK).await;

    assert_eq!(dec_field(&body, "price_per_day"), dec!(40));
    assert_eq!(body["fallback"], "vehicle_starting_price");
    assert!(body["error"].is_string(), "fallback pricing sets the error field");
}

#[tokio::test]
async fn price_calculation_is_idempotent() {
    let app = TestApp::new().await;
    let group = seed_group(&app, "Compact", None).await;
    let vehicle = seed_vehicle(&app, Some(group.id), None, None).await;
    let rate = seed_rate(&app, "Summer", date("2025-06-01"), date("2025-09-30"), 1, None).await;
    seed_tier(&app, rate.id, group.id, 1, None, dec!(36)).await;

    let payload = json!({
        "vehicle_id": vehicle.id,
        "pickup_datetime": "2025-07-01T10:00:00",
        "dropoff_datetime": "2025-07-04T10:00:00",
    });

    let first = TestApp::json_body(
        app.request(Method::POST, "/api/v1/rates/calculate-price", Some(payload.clone()))
            .await,
        StatusCode::OK,
    )
    .await;
    let second = TestApp::json_body(
        app.request(Method::POST, "/api/v1/rates/calculate-price", Some(payload))
            .await,
        StatusCode::OK,
    )
    .await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn newest_valid_rate_wins_deterministically() {
    let app = TestApp::new().await;
    let group = seed_group(&app, "Compact", None).await;
    let vehicle = seed_vehicle(&app, Some(group.id), None, None).await;

    let older = seed_rate(&app, "Spring", date("2025-03-01"), date("2025-12-31"), 1, None).await;
    seed_tier(&app, older.id, group.id, 1, None, dec!(50)).await;
    let newer = seed_rate(&app, "Summer", date("2025-06-01"), date("2025-12-31"), 1, None).await;
    seed_tier(&app, newer.id, group.id, 1, None, dec!(36)).await;

    let body = TestApp::json_body(
        app.request(
            Method::POST,
            "/api/v1/rates/calculate-price",
            Some(json!({
                "vehicle_id": vehicle.id,
                "pickup_datetime": "2025-07-01T10:00:00",
                "dropoff_datetime": "2025-07-02T10:00:00",
            })),
        )
        .await,
        StatusCode::OK,
    )
    .await;

    assert_eq!(body["rate_id"], newer.id);
    assert_eq!(dec_field(&body, "price_per_day"), dec!(36));
}

#[tokio::test]
async fn tier_bounds_are_inclusive_and_unbounded_above_when_open() {
    let app = TestApp::new().await;
    let group = seed_group(&app, "Compact", None).await;
    let vehicle = seed_vehicle(&app, Some(group.id), None, None).await;
    let rate = seed_rate(&app, "Summer", date("2025-06-01"), date("2025-12-31"), 1, None).await;
    seed_tier(&app, rate.id, group.id, 1, Some(3), dec!(45)).await;
    seed_tier(&app, rate.id, group.id, 4, None, dec!(36)).await;

    // 3 days: upper bound of the first tier, inclusive
    let three_days = TestApp::json_body(
        app.request(
            Method::POST,
            "/api/v1/rates/calculate-price",
            Some(json!({
                "vehicle_id": vehicle.id,
                "pickup_datetime": "2025-07-01T10:00:00",
                "dropoff_datetime": "2025-07-04T10:00:00",
            })),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(dec_field(&three_days, "price_per_day"), dec!(45));

    // 30 days: covered by the open-ended tier
    let thirty_days = TestApp::json_body(
        app.request(
            Method::POST,
            "/api/v1/rates/calculate-price",
            Some(json!({
                "vehicle_id": vehicle.id,
                "pickup_datetime": "2025-07-01T10:00:00",
                "dropoff_datetime": "2025-07-31T10:00:00",
            })),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(dec_field(&thirty_days, "price_per_day"), dec!(36));
}

#[tokio::test]
async fn sub_day_windows_bill_one_day() {
    let app = TestApp::new().await;
    let group = seed_group(&app, "Compact", None).await;
    let vehicle = seed_vehicle(&app, Some(group.id), None, None).await;
    let rate = seed_rate(&app, "Summer", date("2025-06-01"), date("2025-12-31"), 1, None).await;
    seed_tier(&app, rate.id, group.id, 1, None, dec!(36)).await;

    // 25 hours floors to one day
    let body = TestApp::json_body(
        app.request(
            Method::POST,
            "/api/v1/rates/calculate-price",
            Some(json!({
                "vehicle_id": vehicle.id,
                "pickup_datetime": "2025-07-01T10:00:00",
                "dropoff_datetime": "2025-07-02T11:00:00",
            })),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["rental_days"], 1);
    assert_eq!(dec_field(&body, "base_total"), dec!(36));
}

#[tokio::test]
async fn unknown_vehicle_is_a_hard_error() {
    let app = TestApp::new().await;
    let response = app
        .request(
            Method::POST,
            "/api/v1/rates/calculate-price",
            Some(json!({
                "vehicle_id": 9999,
                "pickup_datetime": "2025-07-01",
                "dropoff_datetime": "2025-07-02",
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn fee_calculator_quotes_zero_for_same_or_unknown_city() {
    let app = TestApp::new().await;
    seed_one_way_fee(&app, "Berlin", "Munich", dec!(25)).await;

    let same = TestApp::json_body(
        app.request(
            Method::GET,
            "/api/v1/one-way-fees/calculate?from_city=Berlin&to_city=berlin",
            None,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(dec_field(&same["data"], "fee_amount"), dec!(0));
    assert_eq!(same["data"]["applies"], false);

    let unknown = TestApp::json_body(
        app.request(
            Method::GET,
            "/api/v1/one-way-fees/calculate?from_city=Berlin&to_city=Hamburg",
            None,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(dec_field(&unknown["data"], "fee_amount"), dec!(0));

    // Case-insensitive match on a known pair
    let known = TestApp::json_body(
        app.request(
            Method::GET,
            "/api/v1/one-way-fees/calculate?from_city=BERLIN&to_city=munich",
            None,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(dec_field(&known["data"], "fee_amount"), dec!(25));
    assert_eq!(known["data"]["applies"], true);
}
