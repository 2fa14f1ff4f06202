//! Response helpers: status pairing, acknowledgments and sensitive-field redaction.

use crate::config::ResolvedResource;
use axum::{http::StatusCode, Json};
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
pub struct SuccessAck {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(data))
}

pub fn ok<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::OK, Json(data))
}

pub fn ack() -> (StatusCode, Json<SuccessAck>) {
    ok(SuccessAck {
        success: true,
        message: None,
    })
}

/// Strip the resource's sensitive fields from a record.
pub fn redact(resource: &ResolvedResource, mut record: Value) -> Value {
    if let Value::Object(ref mut map) = record {
        for field in &resource.sensitive_fields {
            map.remove(field);
        }
    }
    record
}

pub fn redact_many(resource: &ResolvedResource, records: Vec<Value>) -> Vec<Value> {
    if resource.sensitive_fields.is_empty() {
        return records;
    }
    records.into_iter().map(|r| redact(resource, r)).collect()
}
