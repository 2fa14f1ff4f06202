//! Shared application state for all routes.

use crate::config::{resolve, ResolvedResource, ResourceModel, ServerConfig, USERS_RESOURCE};
use crate::error::AppError;
use crate::seed::SeedData;
use crate::service::AuthService;
use crate::store::CollectionStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CollectionStore>,
    pub model: Arc<ResourceModel>,
    pub auth: Arc<AuthService>,
    /// Fixtures used by startup seeding and `/api/setup-db`.
    pub seeds: Arc<SeedData>,
}

impl AppState {
    /// Resolve the resource model, open the storage root and load seed fixtures. Does not seed.
    pub async fn from_config(config: &ServerConfig) -> Result<Self, AppError> {
        let model = resolve(config)?;
        let store = CollectionStore::open(&config.data_dir, &model).await?;
        let seeds = match &config.seed_dir {
            Some(dir) => SeedData::from_dir(dir, &model).await?,
            None => SeedData::bundled()?,
        };
        Ok(AppState {
            store: Arc::new(store),
            model: Arc::new(model),
            auth: Arc::new(AuthService::new(&config.auth)?),
            seeds: Arc::new(seeds),
        })
    }

    pub fn resource(&self, path_segment: &str) -> Result<&ResolvedResource, AppError> {
        self.model
            .resource_by_path(path_segment)
            .ok_or_else(|| AppError::NotFound(format!("resource {}", path_segment)))
    }

    pub fn users(&self) -> Result<&ResolvedResource, AppError> {
        self.resource(USERS_RESOURCE)
    }
}
