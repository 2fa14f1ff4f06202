//! Yara backend: JSON-file backed REST resources with generic CRUD and login.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod seed;
pub mod service;
pub mod state;
pub mod store;

pub use config::{load_from_env, resolve, ResolvedResource, ResourceModel, ServerConfig};
pub use error::{AppError, ConfigError};
pub use routes::{app_router, auth_routes, common_routes, entity_routes};
pub use seed::{seed_all, SeedData};
pub use service::{AuthService, CrudService};
pub use state::AppState;
pub use store::CollectionStore;
