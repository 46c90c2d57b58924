//! # Admin Routes Module
//!
//! System-wide views under `/api/admin`, mounted behind `allow_admin`.

use axum::{Router, routing::get};
use util::state::AppState;

pub mod get;

/// Builds the `/admin` route group.
///
/// - `GET /admin/overview` → `overview`
pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/overview", get(get::overview))
}
