//! Login and current-user handlers.

use crate::error::AppError;
use crate::extractors::BearerToken;
use crate::response::ok;
use crate::service::LoginRequest;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};

/// POST /api/auth/login: `{email, password}` -> `{user, token}`.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let users = state.users()?;
    let res = state.auth.login(&state.store, users, body).await?;
    Ok(ok(res))
}

/// GET /api/auth/me: the user the bearer token was issued for.
pub async fn me(
    BearerToken(token): BearerToken,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let token = token.ok_or_else(|| AppError::Unauthorized("missing bearer token".into()))?;
    let users = state.users()?;
    let user = state.auth.current_user(&state.store, users, &token).await?;
    Ok(ok(user))
}
