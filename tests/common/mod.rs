#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tower::ServiceExt;

use game_night_api::config::Config;
use game_night_api::domain::BalanceRules;
use game_night_api::repository::{CallContext, SeaRepository};
use game_night_api::services::SessionService;
use game_night_api::state::AppState;
use game_night_api::utils::{RandomSource, SharedRng};

pub const TEST_SEED: u64 = 7;

/// In-memory `SQLite` with every migration applied.
///
/// A single pooled connection keeps every query on the same in-memory database.
pub async fn test_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(opts).await.expect("connect sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}

pub fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "DATABASE_URL" => Some("sqlite::memory:".to_string()),
        "LOG_LEVEL" => Some("warn".to_string()),
        "RNG_SEED" => Some(TEST_SEED.to_string()),
        _ => None,
    })
    .expect("test config")
}

/// Session service over `db` with the default balance and a seeded RNG.
pub fn service(db: &DatabaseConnection) -> SessionService {
    service_with(db, Arc::new(SharedRng::seeded(TEST_SEED)))
}

pub fn service_with(db: &DatabaseConnection, random: Arc<dyn RandomSource>) -> SessionService {
    SessionService::new(
        Arc::new(SeaRepository::new(db.clone())),
        random,
        BalanceRules::default(),
    )
}

pub fn ctx() -> CallContext {
    CallContext::with_timeout(Duration::from_secs(5))
}

/// Build the app router backed by an in-memory `SQLite` database with migrations.
pub async fn test_app() -> Router {
    let db = test_db().await;
    game_night_api::routes::router().with_state(AppState::new(db, test_config()))
}

/// Test helper: send a request to the app and return (status, parsed JSON body).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("build request");

    let response = app.clone().oneshot(request).await.expect("send request");

    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .unwrap_or_default();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);

    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, "GET", uri, None).await
}

pub async fn post_json(
    app: &Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, "POST", uri, Some(body)).await
}

pub async fn post(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, "POST", uri, None).await
}

pub async fn delete(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, "DELETE", uri, None).await
}
