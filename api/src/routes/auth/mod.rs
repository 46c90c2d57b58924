//! # auth Routes Module
//!
//! Routes for the `/api/auth` endpoint group.
//!
//! ## Structure
//! - `post.rs` — register and login
//! - `get.rs` — current user info

pub mod get;
pub mod post;

use axum::{
    Router,
    routing::{get, post},
};
use util::state::AppState;

use get::get_me;
use post::{login, register};

/// Builds the `/auth` route group.
///
/// - `POST /auth/register` → `register`
/// - `POST /auth/login` → `login`
/// - `GET /auth/me` → `get_me`
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(get_me))
}
