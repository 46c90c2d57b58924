use axum::{Json, extract::State};
use common::format_validation_errors;
use db::error::is_unique_violation;
use db::models::user::{self, Role};
use serde::{Deserialize, Serialize};
use util::state::AppState;
use validator::Validate;

use crate::auth::generate_jwt;
use crate::response::{ApiError, ApiResult, created, ok};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub token: String,
    pub expires_at: String,
}

fn auth_response(user: user::Model) -> Result<AuthResponse, ApiError> {
    let (token, expires_at) = generate_jwt(user.id, user.role).map_err(|e| {
        tracing::error!(error = %e, "Failed to sign token");
        ApiError::internal("Failed to issue token")
    })?;
    Ok(AuthResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        role: user.role,
        token,
        expires_at,
    })
}

/// POST /api/auth/register
///
/// Self-registration. New accounts are always students.
///
/// ### Request Body
/// ```json
/// { "username": "student9", "email": "s9@school.edu", "password": "password123" }
/// ```
///
/// ### Responses
/// - `201 Created` with the user and a token
/// - `400 Bad Request` on validation failure
/// - `409 Conflict` if the username or email is taken
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<AuthResponse> {
    req.validate()
        .map_err(|e| ApiError::bad_request(format_validation_errors(&e)))?;

    let db = state.db();
    let username = req.username.trim();
    if user::Model::find_by_username(db, username).await?.is_some() {
        return Err(ApiError::conflict("A user with this username already exists"));
    }

    let user = user::Model::create(db, username, req.email.trim(), &req.password, Role::Student)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::conflict("A user with this username or email already exists")
            } else {
                e.into()
            }
        })?;

    tracing::info!(user_id = user.id, username = %user.username, "Student registered");
    created(auth_response(user)?, "User registered successfully")
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /api/auth/login
///
/// ### Responses
/// - `200 OK` with the user and a token
/// - `401 Unauthorized` on unknown username or wrong password
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<AuthResponse> {
    let user = user::Model::find_by_username(state.db(), req.username.trim())
        .await?
        .filter(|u| u.verify_password(&req.password))
        .ok_or_else(|| {
            tracing::debug!(username = %req.username, "Login refused");
            ApiError::unauthorized("Invalid username or password")
        })?;

    ok(auth_response(user)?, "Login successful")
}
