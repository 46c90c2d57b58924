//! WebSocket entry point for `/ws/...`.
//!
//! - `/notifications` → every group the user belongs to
//! - `/attendance/sessions/{session_id}` → one session's group (teachers)
//!
//! Browsers cannot set headers on the handshake, so the token may be passed
//! as `?token=`.

use axum::{Router, middleware::from_fn};
use util::state::AppState;

use crate::auth::guards::allow_authenticated;
use crate::ws::{attendance::ws_attendance_routes, notifications::ws_notification_routes};

pub mod attendance;
pub mod core;
pub mod notifications;
pub mod topics;

pub fn ws_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/notifications", ws_notification_routes())
        .nest("/attendance", ws_attendance_routes())
        .route_layer(from_fn(allow_authenticated))
        .with_state(app_state)
}
