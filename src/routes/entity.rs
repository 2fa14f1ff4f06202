//! Resource CRUD routes. One parameterized handler set serves every configured resource;
//! handlers resolve the resource by path segment and 404 on unknown names.

use crate::handlers::entity::{create, delete as delete_handler, list, read, update};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn entity_routes(state: AppState) -> Router {
    Router::new()
        .route("/:path_segment", get(list).post(create))
        .route("/:path_segment/:id", get(read).put(update).delete(delete_handler))
        .with_state(state)
}
