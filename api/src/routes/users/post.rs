use axum::{Json, extract::State};
use common::format_validation_errors;
use db::error::is_unique_violation;
use db::models::user::{self, Role};
use serde::Deserialize;
use util::state::AppState;
use validator::Validate;

use crate::response::{ApiError, ApiResult, created};
use crate::routes::common::UserResponse;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    pub role: Role,
}

/// POST /api/users
///
/// Creates an account with any role.
///
/// ### Responses
/// - `201 Created`
/// - `400 Bad Request` on validation failure
/// - `409 Conflict` if the username or email is taken
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<UserResponse> {
    req.validate()
        .map_err(|e| ApiError::bad_request(format_validation_errors(&e)))?;

    let user = user::Model::create(
        state.db(),
        req.username.trim(),
        req.email.trim(),
        &req.password,
        req.role,
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::conflict("A user with this username or email already exists")
        } else {
            e.into()
        }
    })?;

    tracing::info!(user_id = user.id, role = %user.role, "User created");
    created(user.into(), "User created successfully")
}
