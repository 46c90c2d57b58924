use axum::extract::{Path, State};
use db::models::user;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::{ApiError, ApiResult, Empty, ok};

/// DELETE /api/users/{user_id}
///
/// ### Responses
/// - `200 OK`
/// - `400 Bad Request` when an admin tries to delete their own account
/// - `404 Not Found`
pub async fn delete_user(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(user_id): Path<i64>,
) -> ApiResult<Empty> {
    if claims.sub == user_id {
        return Err(ApiError::bad_request("You cannot delete your own account"));
    }
    if !user::Model::delete(state.db(), user_id).await? {
        return Err(ApiError::not_found("User not found"));
    }
    tracing::info!(user_id, by = claims.sub, "User deleted");
    ok(Empty {}, "User deleted successfully")
}
