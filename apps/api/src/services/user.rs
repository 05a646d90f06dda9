//! Registration, login and session refresh.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use teslo_core::validation::{validate_email, validate_name, validate_password};
use teslo_core::{Role, User};
use teslo_db::password::{hash_password, verify_password};
use teslo_db::DbError;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult, ErrorCode};
use crate::extract::ApiJson;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// A session token and the account it belongs to.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

fn invalid_credentials() -> ApiError {
    ApiError::new(ErrorCode::InvalidCredentials, "Invalid email or password")
}

/// `POST /api/user/register`
pub async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let name = req.name.trim();
    let email = req.email.trim().to_lowercase();
    validate_name(name)?;
    validate_email(&email)?;
    validate_password(&req.password)?;

    // Argon2 blocks for tens of milliseconds.
    let password = req.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(ApiError::internal)??;

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        email,
        role: Role::Client,
        created_at: now,
        updated_at: now,
    };

    let user = state
        .db
        .users()
        .insert(&user, &password_hash)
        .await
        .map_err(|e| match e {
            DbError::UniqueViolation { .. } => {
                ApiError::new(ErrorCode::Duplicate, "This email is already registered.")
            }
            other => other.into(),
        })?;

    info!(user_id = %user.id, "User registered");

    let token = state.jwt.issue(&user)?;
    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

/// `POST /api/user/login`
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let Some(record) = state.db.users().find_by_email(&req.email).await? else {
        warn!("Login for unknown email");
        return Err(invalid_credentials());
    };

    let password = req.password;
    let hash = record.password_hash;
    let valid = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(ApiError::internal)?;

    if !valid {
        warn!(user_id = %record.user.id, "Login with wrong password");
        return Err(invalid_credentials());
    }

    info!(user_id = %record.user.id, "User logged in");

    let token = state.jwt.issue(&record.user)?;
    Ok(Json(AuthResponse {
        token,
        user: record.user,
    }))
}

/// `GET /api/user/validate-token`: a fresh token for a live session.
pub async fn validate_token(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<AuthResponse>> {
    // The account may have been removed since the token was issued.
    let user = state
        .db
        .users()
        .get_by_id(&user.id)
        .await?
        .ok_or_else(ApiError::unauthenticated)?;

    let token = state.jwt.issue(&user)?;
    Ok(Json(AuthResponse { token, user }))
}
