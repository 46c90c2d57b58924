//! # Users Routes Module
//!
//! Account administration under `/api/users`. Every route is admin-only; the
//! guard is applied where the group is nested.

use axum::{
    Router,
    routing::{get, put},
};
use util::state::AppState;

pub mod delete;
pub mod get;
pub mod post;
pub mod put;

/// Builds the `/users` route group.
///
/// - `GET /users` → `list_users`
/// - `POST /users` → `create_user`
/// - `GET /users/{user_id}` → `get_user`
/// - `PUT /users/{user_id}` → `update_user`
/// - `DELETE /users/{user_id}` → `delete_user`
pub fn users_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get::list_users).post(post::create_user))
        .route(
            "/{user_id}",
            put(put::update_user)
                .get(get::get_user)
                .delete(delete::delete_user),
        )
}
