//! Raw server configuration as read from the environment.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Resources served when `RESOURCES` is not set.
pub const DEFAULT_RESOURCES: &[&str] = &["packages", "cars", "bikes", "bookings", "inquiries", "users"];

/// Resource backing the login endpoint.
pub const USERS_RESOURCE: &str = "users";

pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 12;
/// Upper bound for `TOKEN_TTL_HOURS` (ten years).
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365 * 10;
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 2 * 1024 * 1024;
pub const DEV_JWT_SECRET: &str = "yara-dev-secret-change-me";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResourceConfig {
    pub name: String,
    /// Fields kept on disk but stripped from every response.
    #[serde(default)]
    pub sensitive_fields: Vec<String>,
    /// Field hashed with argon2 before it is persisted.
    #[serde(default)]
    pub password_field: Option<String>,
}

impl ResourceConfig {
    /// Resource with the conventional field policy for its name (`users` hides and hashes `password`).
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        let (sensitive_fields, password_field) = if name == USERS_RESOURCE {
            (vec!["password".to_string()], Some("password".to_string()))
        } else {
            (Vec::new(), None)
        };
        ResourceConfig {
            name,
            sensitive_fields,
            password_field,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        AuthConfig {
            jwt_secret: DEV_JWT_SECRET.into(),
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Storage root; one `<resource>.json` document per resource.
    pub data_dir: PathBuf,
    /// Optional directory of fixture documents overriding the bundled seeds.
    #[serde(default)]
    pub seed_dir: Option<PathBuf>,
    pub resources: Vec<ResourceConfig>,
    pub auth: AuthConfig,
    pub body_limit_bytes: usize,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Default config rooted at `data_dir`. Used by tests and embedders.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        ServerConfig {
            data_dir: data_dir.into(),
            ..ServerConfig::default()
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: DEFAULT_HOST.into(),
            port: DEFAULT_PORT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            seed_dir: None,
            resources: DEFAULT_RESOURCES.iter().map(|n| ResourceConfig::named(*n)).collect(),
            auth: AuthConfig::default(),
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
        }
    }
}
