//! Common routes: health, version, seeding.

use crate::handlers::setup::setup_db;
use crate::service::now_timestamp;
use crate::state::AppState;
use axum::{routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
    message: &'static str,
    timestamp: String,
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody {
        status: "ok",
        message: "API is running",
        timestamp: now_timestamp(),
    })
}

async fn version() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /health, GET /version, GET|POST /setup-db.
pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/version", get(version))
        .route("/setup-db", get(setup_db).post(setup_db))
        .with_state(state)
}
