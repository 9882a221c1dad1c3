use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;

use rentfleet_api::{
    config::AppConfig,
    db,
    entities::{location, one_way_fee, rate, rate_tier, vehicle, vehicle_group},
    events::{self, EventSender},
    handlers::AppServices,
    AppState,
};

/// Helper harness for spinning up an application backed by an in-memory
/// SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.auto_migrate = true;
        // One connection so the in-memory database is shared across queries
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);
        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let services = AppServices::new(db_arc.clone(), Arc::new(event_sender.clone()));

        let state = AppState {
            db: db_arc,
            config: cfg,
            event_sender,
            services,
        };

        let router = Router::new()
            .nest("/api/v1", rentfleet_api::api_v1_routes())
            .with_state(state.clone());

        Self {
            router,
            state,
            _event_task: event_task,
        }
    }

    /// Send a JSON request against the router.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Deserialize a response body into JSON, asserting the expected status.
    pub async fn json_body(response: axum::response::Response, expected: StatusCode) -> Value {
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        assert_eq!(
            status,
            expected,
            "unexpected status; body: {}",
            String::from_utf8_lossy(&bytes)
        );
        serde_json::from_slice(&bytes).expect("response body should be JSON")
    }
}

// Seed helpers shared across the integration tests. They insert directly
// through the entities so tests control ids and timestamps precisely.

pub async fn seed_location(app: &TestApp, name: &str, city: &str) -> location::Model {
    location::ActiveModel {
        name: Set(name.to_string()),
        address_line1: Set("Hauptstrasse 1".to_string()),
        city: Set(city.to_string()),
        country_code: Set("DE".to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&*app.state.db)
    .await
    .expect("seed location")
}

pub async fn seed_group(app: &TestApp, name: &str, base_price: Option<Decimal>) -> vehicle_group::Model {
    vehicle_group::ActiveModel {
        name: Set(name.to_string()),
        base_price_per_day: Set(base_price),
        is_active: Set(true),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&*app.state.db)
    .await
    .expect("seed vehicle group")
}

pub async fn seed_vehicle(
    app: &TestApp,
    group_id: Option<i64>,
    home_location_id: Option<i64>,
    starting_price: Option<Decimal>,
) -> vehicle::Model {
    vehicle::ActiveModel {
        vehicle_group_id: Set(group_id),
        location_id: Set(home_location_id),
        make: Set("VW".to_string()),
        model: Set("Golf".to_string()),
        license_plate: Set(Some(format!("B-{}", rand_suffix()))),
        starting_price: Set(starting_price),
        is_active: Set(true),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&*app.state.db)
    .await
    .expect("seed vehicle")
}

pub async fn seed_rate(
    app: &TestApp,
    name: &str,
    valid_from: NaiveDate,
    valid_until: NaiveDate,
    min_days: i32,
    max_days: Option<i32>,
) -> rate::Model {
    rate::ActiveModel {
        name: Set(name.to_string()),
        valid_from: Set(valid_from),
        valid_until: Set(valid_until),
        min_days: Set(min_days),
        max_days: Set(max_days),
        unlimited_km: Set(false),
        is_active: Set(true),
        price_modifier_applies_to_agreement_only: Set(false),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&*app.state.db)
    .await
    .expect("seed rate")
}

pub async fn seed_tier(
    app: &TestApp,
    rate_id: i64,
    vehicle_group_id: i64,
    from_days: i32,
    to_days: Option<i32>,
    price_per_day: Decimal,
) -> rate_tier::Model {
    rate_tier::ActiveModel {
        rate_id: Set(rate_id),
        vehicle_group_id: Set(vehicle_group_id),
        from_days: Set(from_days),
        to_days: Set(to_days),
        price_per_day: Set(price_per_day),
        currency: Set("EUR".to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&*app.state.db)
    .await
    .expect("seed rate tier")
}

pub async fn seed_one_way_fee(
    app: &TestApp,
    from_city: &str,
    to_city: &str,
    amount: Decimal,
) -> one_way_fee::Model {
    one_way_fee::ActiveModel {
        from_city: Set(from_city.to_string()),
        to_city: Set(to_city.to_string()),
        fee_amount: Set(amount),
        currency: Set("EUR".to_string()),
        is_active: Set(true),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&*app.state.db)
    .await
    .expect("seed one-way fee")
}

fn rand_suffix() -> String {
    uuid::Uuid::new_v4().to_string()[..8].to_string()
}
