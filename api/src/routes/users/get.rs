use axum::extract::{Path, Query, State};
use db::models::user::{self, Role};
use serde::Deserialize;
use util::state::AppState;

use crate::response::{ApiError, ApiResult, ok};
use crate::routes::common::UserResponse;

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub role: Option<Role>,
}

/// GET /api/users
///
/// Lists accounts ordered by username.
///
/// ### Query Parameters
/// - `role` (optional): `student`, `teacher` or `admin`
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> ApiResult<Vec<UserResponse>> {
    let users = user::Model::list(state.db(), query.role).await?;
    ok(
        users.into_iter().map(UserResponse::from).collect(),
        "Users retrieved successfully",
    )
}

/// GET /api/users/{user_id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<UserResponse> {
    let user = user::Model::find_by_id(state.db(), user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    ok(user.into(), "User retrieved successfully")
}
