//! Load server config from environment variables and resolve the resource model.

use crate::config::resolved::{ResolvedResource, ResourceModel};
use crate::config::types::*;
use crate::config::validator::check_token_ttl;
use crate::config::validate;
use crate::error::ConfigError;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::str::FromStr;

/// Build the resource model from config (validates first).
pub fn resolve(config: &ServerConfig) -> Result<ResourceModel, ConfigError> {
    validate(config)?;

    let mut resources = Vec::with_capacity(config.resources.len());
    let mut resource_by_path = HashMap::new();
    for rc in &config.resources {
        let id_prefix = rc
            .name
            .chars()
            .next()
            .ok_or_else(|| ConfigError::InvalidResourceName(rc.name.clone()))?;
        let resource = ResolvedResource {
            name: rc.name.clone(),
            file_name: format!("{}.json", rc.name),
            id_prefix,
            sensitive_fields: rc.sensitive_fields.iter().cloned().collect::<HashSet<_>>(),
            password_field: rc.password_field.clone(),
        };
        resource_by_path.insert(rc.name.clone(), resource.clone());
        resources.push(resource);
    }

    Ok(ResourceModel {
        resources,
        resource_by_path,
    })
}

/// Load config from the process environment. Call `dotenvy::dotenv()` first to pick up `.env`.
pub fn load_from_env() -> Result<ServerConfig, ConfigError> {
    load_from_lookup(|key| std::env::var(key).ok())
}

/// Load config from an arbitrary key lookup. Unset or empty keys take defaults.
pub fn load_from_lookup<F>(lookup: F) -> Result<ServerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
    let defaults = ServerConfig::default();

    let resources = match get("RESOURCES") {
        Some(list) => list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ResourceConfig::named)
            .collect(),
        None => defaults.resources,
    };

    let jwt_secret = match get("JWT_SECRET") {
        Some(s) => s,
        None => {
            tracing::warn!("JWT_SECRET not set; using the development secret");
            DEV_JWT_SECRET.to_string()
        }
    };

    Ok(ServerConfig {
        host: get("HOST").unwrap_or(defaults.host),
        port: parse_or(get("PORT"), "PORT", defaults.port)?,
        data_dir: get("DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
        seed_dir: get("SEED_DIR").map(PathBuf::from),
        resources,
        auth: AuthConfig {
            jwt_secret,
            token_ttl_hours: parse_ttl_hours(get("TOKEN_TTL_HOURS"))?,
        },
        body_limit_bytes: parse_or(get("BODY_LIMIT_BYTES"), "BODY_LIMIT_BYTES", defaults.body_limit_bytes)?,
    })
}

fn parse_or<T: FromStr>(value: Option<String>, key: &str, default: T) -> Result<T, ConfigError> {
    match value {
        Some(v) => v
            .parse()
            .map_err(|_| ConfigError::Env(format!("{} has invalid value '{}'", key, v))),
        None => Ok(default),
    }
}

fn parse_ttl_hours(value: Option<String>) -> Result<i64, ConfigError> {
    let hours = parse_or(value, "TOKEN_TTL_HOURS", DEFAULT_TOKEN_TTL_HOURS)?;
    check_token_ttl(hours)?;
    Ok(hours)
}
