use axum::extract::State;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::{ApiResult, ok};
use crate::routes::common::{UserResponse, current_user};

/// GET /api/auth/me
///
/// Returns the account behind the bearer token.
///
/// ### Responses
/// - `200 OK` with the user
/// - `401 Unauthorized` without a valid token
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> ApiResult<UserResponse> {
    let user = current_user(state.db(), &claims).await?;
    ok(user.into(), "User data retrieved successfully")
}
