use axum::{
    Json,
    extract::{Path, State},
};
use common::format_validation_errors;
use db::error::is_unique_violation;
use db::models::user::{self, Role};
use serde::Deserialize;
use util::state::AppState;
use validator::Validate;

use crate::response::{ApiError, ApiResult, ok};
use crate::routes::common::UserResponse;

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,

    pub role: Option<Role>,
}

/// PUT /api/users/{user_id}
///
/// Updates any of `email`, `password` and `role`. Omitted fields are kept.
///
/// ### Responses
/// - `200 OK`
/// - `400 Bad Request` on validation failure or an empty body
/// - `404 Not Found`
/// - `409 Conflict` if the email is taken
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<UserResponse> {
    req.validate()
        .map_err(|e| ApiError::bad_request(format_validation_errors(&e)))?;
    if req.email.is_none() && req.password.is_none() && req.role.is_none() {
        return Err(ApiError::bad_request("Nothing to update"));
    }

    let db = state.db();
    if user::Model::find_by_id(db, user_id).await?.is_none() {
        return Err(ApiError::not_found("User not found"));
    }

    let user = user::Model::update(
        db,
        user_id,
        req.email.as_deref().map(str::trim),
        req.password.as_deref(),
        req.role,
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::conflict("A user with this email already exists")
        } else {
            e.into()
        }
    })?;

    ok(user.into(), "User updated successfully")
}
