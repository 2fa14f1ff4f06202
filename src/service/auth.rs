//! Login against the users collection and signed session tokens.

use crate::config::{check_token_ttl, AuthConfig, ResolvedResource};
use crate::error::{AppError, ConfigError};
use crate::service::password::verify_password;
use crate::store::{record_id, CollectionStore};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const DEFAULT_PASSWORD_FIELD: &str = "password";

#[derive(Clone, Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// User as returned to clients: never carries the password.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub name: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub email: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub role: Value,
}

impl PublicUser {
    fn from_record(record: &Value) -> Option<Self> {
        Some(PublicUser {
            id: record_id(record)?.to_string(),
            name: record.get("name").cloned().unwrap_or(Value::Null),
            email: record.get("email").cloned().unwrap_or(Value::Null),
            role: record.get("role").cloned().unwrap_or(Value::Null),
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: PublicUser,
    pub token: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub iat: i64,
    pub exp: i64,
    /// Unique per issued token.
    pub jti: String,
}

#[derive(Clone)]
pub struct AuthService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl AuthService {
    pub fn new(cfg: &AuthConfig) -> Result<Self, ConfigError> {
        check_token_ttl(cfg.token_ttl_hours)?;
        let ttl = Duration::try_hours(cfg.token_ttl_hours).ok_or(ConfigError::InvalidTokenTtl {
            hours: cfg.token_ttl_hours,
            max: crate::config::MAX_TOKEN_TTL_HOURS,
        })?;
        Ok(AuthService {
            encoding: EncodingKey::from_secret(cfg.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.jwt_secret.as_bytes()),
            ttl,
        })
    }

    /// Find the user whose email and password match and issue a token.
    /// Unknown email, wrong password and missing fields all fail identically.
    pub async fn login(
        &self,
        store: &CollectionStore,
        users: &ResolvedResource,
        req: LoginRequest,
    ) -> Result<LoginResponse, AppError> {
        let (email, password) = match (req.email, req.password) {
            (Some(e), Some(p)) => (e, p),
            _ => return Err(AppError::InvalidCredentials),
        };
        let password_field = users.password_field.as_deref().unwrap_or(DEFAULT_PASSWORD_FIELD);

        let records = store.read(users).await?;
        let user = records
            .iter()
            .filter(|r| r.get("email").and_then(Value::as_str) == Some(email.as_str()))
            .find(|r| {
                r.get(password_field)
                    .and_then(Value::as_str)
                    .map(|stored| verify_password(&password, stored))
                    .unwrap_or(false)
            })
            .and_then(PublicUser::from_record)
            .ok_or(AppError::InvalidCredentials)?;

        let token = self.issue_token(&user)?;
        tracing::info!(user_id = %user.id, "login succeeded");
        Ok(LoginResponse { user, token })
    }

    pub fn issue_token(&self, user: &PublicUser) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.as_str().map(String::from),
            role: user.role.as_str().map(String::from),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(|e| AppError::Internal(format!("token: {}", e)))
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| AppError::Unauthorized(e.to_string()))
    }

    /// Resolve a token to the user it was issued for, re-read from the users collection.
    pub async fn current_user(
        &self,
        store: &CollectionStore,
        users: &ResolvedResource,
        token: &str,
    ) -> Result<PublicUser, AppError> {
        let claims = self.verify_token(token)?;
        store
            .read(users)
            .await?
            .iter()
            .find(|r| record_id(r) == Some(claims.sub.as_str()))
            .and_then(PublicUser::from_record)
            .ok_or_else(|| AppError::Unauthorized("user no longer exists".into()))
    }
}
