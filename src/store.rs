//! Collection documents on disk. Each resource is one pretty-printed JSON array at `<root>/<name>.json`.
//! Reads always go to disk; writes rewrite the whole document through a temp file and rename.

use crate::config::{ResolvedResource, ResourceModel};
use crate::error::AppError;
use serde_json::Value;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;

/// Look up a record's string id. Records without a string `id` never match.
pub fn record_id(record: &Value) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

pub struct CollectionStore {
    root: PathBuf,
    /// One writer lock per resource; held across each read-modify-write.
    locks: HashMap<String, Arc<Mutex<()>>>,
}

impl CollectionStore {
    /// Open the storage root (created if missing) for every resource in the model.
    pub async fn open(root: impl Into<PathBuf>, model: &ResourceModel) -> Result<Self, AppError> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        let locks = model
            .names()
            .map(|n| (n.to_string(), Arc::new(Mutex::new(()))))
            .collect();
        tracing::debug!(root = %root.display(), "collection store opened");
        Ok(CollectionStore { root, locks })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn document_path(&self, resource: &ResolvedResource) -> PathBuf {
        self.root.join(&resource.file_name)
    }

    /// Read the whole collection. A missing document reads as empty; so does a malformed one.
    pub async fn read(&self, resource: &ResolvedResource) -> Result<Vec<Value>, AppError> {
        let path = self.document_path(resource);
        let bytes = match fs::read(&path).await {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_slice::<Vec<Value>>(&bytes) {
            Ok(records) => {
                tracing::debug!(resource = %resource.name, count = records.len(), "read collection");
                Ok(records)
            }
            Err(e) => {
                tracing::warn!(resource = %resource.name, error = %e, "malformed collection document, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    /// Apply `f` to the collection under the resource's writer lock and persist the result.
    /// When `f` returns an error nothing is written.
    pub async fn mutate<T, F>(&self, resource: &ResolvedResource, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut Vec<Value>) -> Result<T, AppError>,
    {
        let lock = self.lock_for(resource)?;
        let _guard = lock.lock().await;
        let mut records = self.read(resource).await?;
        let out = f(&mut records)?;
        self.write(resource, &records).await?;
        Ok(out)
    }

    /// Write `seed` as the collection only if no document exists yet. Returns whether it wrote.
    pub async fn ensure_initialized(&self, resource: &ResolvedResource, seed: &[Value]) -> Result<bool, AppError> {
        let lock = self.lock_for(resource)?;
        let _guard = lock.lock().await;
        if fs::try_exists(self.document_path(resource)).await? {
            return Ok(false);
        }
        self.write(resource, seed).await?;
        Ok(true)
    }

    async fn write(&self, resource: &ResolvedResource, records: &[Value]) -> Result<(), AppError> {
        let path = self.document_path(resource);
        let tmp = self.root.join(format!(".{}.tmp", resource.file_name));
        let data = serde_json::to_vec_pretty(records)?;
        let written = match fs::write(&tmp, &data).await {
            Ok(()) => fs::rename(&tmp, &path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        tracing::debug!(resource = %resource.name, count = records.len(), bytes = data.len(), "wrote collection");
        Ok(())
    }

    fn lock_for(&self, resource: &ResolvedResource) -> Result<Arc<Mutex<()>>, AppError> {
        self.locks
            .get(&resource.name)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("resource {}", resource.name)))
    }
}
