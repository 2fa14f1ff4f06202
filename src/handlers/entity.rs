//! Resource CRUD handlers: list, create, read, update, delete.

use crate::error::AppError;
use crate::response::{ack, created, ok, redact, redact_many};
use crate::service::CrudService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::{Map, Value};

fn body_to_map(value: Value) -> Result<Map<String, Value>, AppError> {
    match value {
        Value::Object(m) => Ok(m),
        _ => Err(AppError::BadRequest("body must be a JSON object".into())),
    }
}

pub async fn list(
    State(state): State<AppState>,
    Path(path_segment): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let resource = state.resource(&path_segment)?;
    let records = CrudService::list(&state.store, resource).await?;
    Ok(ok(redact_many(resource, records)))
}

pub async fn create(
    State(state): State<AppState>,
    Path(path_segment): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let resource = state.resource(&path_segment)?;
    let body = body_to_map(body)?;
    let record = CrudService::create(&state.store, resource, body).await?;
    tracing::info!(resource = %resource.name, id = ?record.get("id"), "created");
    Ok(created(redact(resource, record)))
}

pub async fn read(
    State(state): State<AppState>,
    Path((path_segment, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let resource = state.resource(&path_segment)?;
    let record = CrudService::read(&state.store, resource, &id).await?;
    Ok(ok(redact(resource, record)))
}

pub async fn update(
    State(state): State<AppState>,
    Path((path_segment, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let resource = state.resource(&path_segment)?;
    let body = body_to_map(body)?;
    let record = CrudService::update(&state.store, resource, &id, body).await?;
    tracing::info!(resource = %resource.name, id = %id, "updated");
    Ok(ok(redact(resource, record)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path((path_segment, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let resource = state.resource(&path_segment)?;
    let removed = CrudService::delete(&state.store, resource, &id).await?;
    tracing::info!(resource = %resource.name, id = %id, removed, "deleted");
    Ok(ack())
}
