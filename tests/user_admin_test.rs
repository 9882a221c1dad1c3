mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::*;

async fn create_user(app: &TestApp) -> i64 {
    let created = TestApp::json_body(
        app.request(
            Method::POST,
            "/api/v1/users",
            Some(json!({
                "first_name": "Grace",
                "last_name": "Hopper",
                "email": "grace@example.com",
            })),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    created["data"]["id"].as_i64().expect("user id")
}

#[tokio::test]
async fn invalid_email_on_update_is_rejected_with_400() {
    let app = TestApp::new().await;
    let user_id = create_user(&app).await;

    let body = TestApp::json_body(
        app.request(
            Method::PUT,
            &format!("/api/v1/users/{}", user_id),
            Some(json!({ "email": "not-an-email" })),
        )
        .await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(body["success"], false);
    assert!(body["errors"].as_array().is_some_and(|e| !e.is_empty()));

    // The stored email is untouched
    let fetched = TestApp::json_body(
        app.request(Method::GET, &format!("/api/v1/users/{}", user_id), None).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(fetched["data"]["email"], "grace@example.com");
}

#[tokio::test]
async fn valid_update_still_returns_200() {
    let app = TestApp::new().await;
    let user_id = create_user(&app).await;

    let updated = TestApp::json_body(
        app.request(
            Method::PUT,
            &format!("/api/v1/users/{}", user_id),
            Some(json!({ "first_name": "Grace Brewster" })),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(updated["data"]["first_name"], "Grace Brewster");
}
