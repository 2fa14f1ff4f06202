//! Fixture documents written into collections that do not exist yet.
//! The default fixtures are compiled in; a seed directory can override them per resource.

use crate::config::ResourceModel;
use crate::error::{AppError, ConfigError};
use crate::store::CollectionStore;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

const BUNDLED: &[(&str, &str)] = &[
    ("packages", include_str!("../fixtures/packages.json")),
    ("cars", include_str!("../fixtures/cars.json")),
    ("bikes", include_str!("../fixtures/bikes.json")),
    ("bookings", include_str!("../fixtures/bookings.json")),
    ("inquiries", include_str!("../fixtures/inquiries.json")),
    ("users", include_str!("../fixtures/users.json")),
];

#[derive(Clone, Debug, Default)]
pub struct SeedData {
    by_resource: HashMap<String, Vec<Value>>,
}

impl SeedData {
    /// The fixtures shipped with the crate.
    pub fn bundled() -> Result<Self, ConfigError> {
        let mut by_resource = HashMap::new();
        for (name, text) in BUNDLED {
            by_resource.insert(name.to_string(), parse_fixture(name, text)?);
        }
        Ok(SeedData { by_resource })
    }

    /// Bundled fixtures, with `<dir>/<resource>.json` taking precedence where it exists.
    pub async fn from_dir(dir: &Path, model: &ResourceModel) -> Result<Self, ConfigError> {
        let mut seeds = Self::bundled()?;
        for name in model.names() {
            let path = dir.join(format!("{}.json", name));
            match tokio::fs::read_to_string(&path).await {
                Ok(text) => {
                    tracing::debug!(resource = name, path = %path.display(), "seed override");
                    seeds.insert(name, parse_fixture(name, &text)?);
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(ConfigError::Seed(format!("{}: {}", path.display(), e))),
            }
        }
        Ok(seeds)
    }

    pub fn insert(&mut self, resource: impl Into<String>, records: Vec<Value>) {
        self.by_resource.insert(resource.into(), records);
    }

    /// Seed records for a resource; empty when none are known.
    pub fn get(&self, resource: &str) -> &[Value] {
        self.by_resource.get(resource).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn parse_fixture(name: &str, text: &str) -> Result<Vec<Value>, ConfigError> {
    serde_json::from_str(text).map_err(|e| ConfigError::Seed(format!("{}: {}", name, e)))
}

/// Initialize every resource's document from `seeds` if absent. Returns the names that were written.
pub async fn seed_all(
    store: &CollectionStore,
    model: &ResourceModel,
    seeds: &SeedData,
) -> Result<Vec<String>, AppError> {
    let mut initialized = Vec::new();
    for resource in &model.resources {
        let records = seeds.get(&resource.name);
        if store.ensure_initialized(resource, records).await? {
            tracing::info!(resource = %resource.name, count = records.len(), "initialized collection with seed data");
            initialized.push(resource.name.clone());
        }
    }
    Ok(initialized)
}
