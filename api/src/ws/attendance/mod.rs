//! Live stream of a single class session for its teachers.

use axum::{Router, routing::get};
use util::state::AppState;

pub mod handlers;

pub fn ws_attendance_routes() -> Router<AppState> {
    Router::new().route(
        "/sessions/{session_id}",
        get(handlers::attendance_session_ws_handler),
    )
}
