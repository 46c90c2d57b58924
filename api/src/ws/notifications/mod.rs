//! Per-user notification socket and the emitters that feed it.

use axum::{Router, routing::get};
use util::state::AppState;

pub mod emit;
pub mod handlers;
pub mod payload;
pub mod ws_handlers;

pub fn ws_notification_routes() -> Router<AppState> {
    Router::new().route("/", get(handlers::notifications_ws_handler))
}
