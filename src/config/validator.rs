//! Config validation: resource names and required resources.

use crate::config::{ServerConfig, MAX_TOKEN_TTL_HOURS, USERS_RESOURCE};
use crate::error::ConfigError;
use regex::Regex;
use std::collections::HashSet;

/// Path segments already taken by fixed routes under `/api`.
pub const RESERVED_NAMES: &[&str] = &["auth", "health", "version", "setup-db"];

const RESOURCE_NAME_PATTERN: &str = r"^[a-z][a-z0-9_-]*$";

pub fn validate(config: &ServerConfig) -> Result<(), ConfigError> {
    let name_re = Regex::new(RESOURCE_NAME_PATTERN).map_err(|e| ConfigError::Env(e.to_string()))?;
    let mut seen = HashSet::new();

    for r in &config.resources {
        if !name_re.is_match(&r.name) {
            return Err(ConfigError::InvalidResourceName(r.name.clone()));
        }
        if RESERVED_NAMES.contains(&r.name.as_str()) {
            return Err(ConfigError::ReservedResourceName(r.name.clone()));
        }
        if !seen.insert(r.name.as_str()) {
            return Err(ConfigError::DuplicateResource(r.name.clone()));
        }
    }

    if !seen.contains(USERS_RESOURCE) {
        return Err(ConfigError::MissingUsersResource);
    }
    check_token_ttl(config.auth.token_ttl_hours)
}

/// Token lifetime in hours must be positive and small enough to add to any current timestamp.
pub fn check_token_ttl(hours: i64) -> Result<(), ConfigError> {
    if !(1..=MAX_TOKEN_TTL_HOURS).contains(&hours) {
        return Err(ConfigError::InvalidTokenTtl {
            hours,
            max: MAX_TOKEN_TTL_HOURS,
        });
    }
    Ok(())
}
