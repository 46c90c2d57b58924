//! # Me Routes Module
//!
//! Student-facing views under `/api/me`: classes, attendance history, the
//! calendar feed and the student's own justifications. The group is mounted
//! behind `allow_student`.

use axum::{Router, routing::get};
use util::state::AppState;

pub mod get;
pub mod post;

/// Builds the `/me` route group.
///
/// - `GET /me/classes/current` → `current_classes`
/// - `GET /me/classes/today` → `today_classes`
/// - `GET /me/classes/weekly` → `weekly_classes`
/// - `GET /me/attendance/history` → `attendance_history`
/// - `GET /me/calendar` → `calendar`
/// - `GET /me/justifications` → `my_justifications`
/// - `POST /me/justifications` → `submit_justification`
pub fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/classes/current", get(get::current_classes))
        .route("/classes/today", get(get::today_classes))
        .route("/classes/weekly", get(get::weekly_classes))
        .route("/attendance/history", get(get::attendance_history))
        .route("/calendar", get(get::calendar))
        .route(
            "/justifications",
            get(get::my_justifications).post(post::submit_justification),
        )
}
