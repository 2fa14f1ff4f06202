//! Seeding handler: initialize any collection whose document is missing.

use crate::error::AppError;
use crate::response::ok;
use crate::seed::seed_all;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse};

/// GET|POST /api/setup-db. Never overwrites existing collections.
pub async fn setup_db(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let initialized = seed_all(&state.store, &state.model, &state.seeds).await?;
    Ok(ok(serde_json::json!({
        "success": true,
        "message": "Database initialized with demo data",
        "initialized": initialized,
    })))
}
