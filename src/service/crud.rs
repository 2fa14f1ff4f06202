//! Generic CRUD execution against collection documents.

use crate::config::ResolvedResource;
use crate::error::AppError;
use crate::service::password::{hash_password, is_password_hash};
use crate::store::{record_id, CollectionStore};
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};

pub const CREATED_AT: &str = "createdAt";
pub const UPDATED_AT: &str = "updatedAt";

/// UTC timestamp with millisecond precision, e.g. `2024-05-01T10:20:30.123Z`.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Fresh id for a resource: `<first letter>_<8 hex chars>`.
pub fn generate_id(resource: &ResolvedResource) -> String {
    let suffix: String = uuid::Uuid::new_v4().simple().to_string().chars().take(8).collect();
    format!("{}_{}", resource.id_prefix, suffix)
}

pub struct CrudService;

impl CrudService {
    /// All records in insertion order.
    pub async fn list(store: &CollectionStore, resource: &ResolvedResource) -> Result<Vec<Value>, AppError> {
        store.read(resource).await
    }

    /// Fetch one record by id.
    pub async fn read(store: &CollectionStore, resource: &ResolvedResource, id: &str) -> Result<Value, AppError> {
        store
            .read(resource)
            .await?
            .into_iter()
            .find(|r| record_id(r) == Some(id))
            .ok_or_else(|| AppError::NotFound(format!("{} '{}'", resource.name, id)))
    }

    /// Append a record. Uses the body's string `id` when given, otherwise generates one.
    /// An id already present in the collection is a conflict and nothing is written.
    pub async fn create(
        store: &CollectionStore,
        resource: &ResolvedResource,
        mut body: Map<String, Value>,
    ) -> Result<Value, AppError> {
        let requested_id = match body.remove("id") {
            Some(Value::String(s)) if !s.is_empty() => Some(s),
            _ => None,
        };
        hash_password_field(resource, &mut body)?;

        store
            .mutate(resource, move |records| {
                let id = match requested_id {
                    Some(id) => {
                        if records.iter().any(|r| record_id(r) == Some(id.as_str())) {
                            return Err(AppError::Conflict(format!("{} '{}' already exists", resource.name, id)));
                        }
                        id
                    }
                    None => loop {
                        let candidate = generate_id(resource);
                        if !records.iter().any(|r| record_id(r) == Some(candidate.as_str())) {
                            break candidate;
                        }
                    },
                };

                let mut record = Map::with_capacity(body.len() + 2);
                record.insert("id".into(), Value::String(id));
                record.extend(body);
                record.insert(CREATED_AT.into(), Value::String(now_timestamp()));
                let record = Value::Object(record);
                records.push(record.clone());
                Ok(record)
            })
            .await
    }

    /// Shallow-merge `body` over the record. The id is kept and `updatedAt` stamped.
    pub async fn update(
        store: &CollectionStore,
        resource: &ResolvedResource,
        id: &str,
        mut body: Map<String, Value>,
    ) -> Result<Value, AppError> {
        body.remove("id");
        hash_password_field(resource, &mut body)?;

        store
            .mutate(resource, |records| {
                let existing = records
                    .iter_mut()
                    .find(|r| record_id(r) == Some(id))
                    .ok_or_else(|| AppError::NotFound(format!("{} '{}'", resource.name, id)))?;
                let obj = existing
                    .as_object_mut()
                    .ok_or_else(|| AppError::Storage(format!("{} '{}' is not an object", resource.name, id)))?;
                obj.extend(body);
                obj.insert("id".into(), Value::String(id.to_string()));
                obj.insert(UPDATED_AT.into(), Value::String(now_timestamp()));
                Ok(existing.clone())
            })
            .await
    }

    /// Remove every record with this id. Missing id is NotFound and the document is left untouched.
    pub async fn delete(store: &CollectionStore, resource: &ResolvedResource, id: &str) -> Result<usize, AppError> {
        store
            .mutate(resource, |records| {
                let before = records.len();
                records.retain(|r| record_id(r) != Some(id));
                match before - records.len() {
                    0 => Err(AppError::NotFound(format!("{} '{}'", resource.name, id))),
                    removed => Ok(removed),
                }
            })
            .await
    }
}

fn hash_password_field(resource: &ResolvedResource, body: &mut Map<String, Value>) -> Result<(), AppError> {
    let Some(field) = resource.password_field.as_deref() else {
        return Ok(());
    };
    if let Some(Value::String(plain)) = body.get(field) {
        if !is_password_hash(plain) {
            let hashed = hash_password(plain)?;
            body.insert(field.to_string(), Value::String(hashed));
        }
    }
    Ok(())
}
