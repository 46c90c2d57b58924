//! # Attendance Routes Module
//!
//! Code lifecycle, submissions, fraud checks, validation and justification
//! review under `/api/attendance`.
//!
//! Teacher routes sit behind `allow_teacher` (teachers and admins); the
//! submit route sits behind `allow_student`. Ownership of the course behind a
//! session or record is checked per handler.

use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post, put},
};
use util::state::AppState;

use crate::auth::guards::{allow_student, allow_teacher};

pub mod common;
pub mod get;
pub mod post;
pub mod put;

/// Builds the `/attendance` route group.
///
/// - `POST /attendance/codes` → `generate_code` (teacher)
/// - `GET /attendance/codes/current` → `current_code` (teacher)
/// - `GET /attendance/dashboard` → `dashboard` (teacher)
/// - `GET /attendance/sessions/{session_id}/submissions` → `session_submissions` (teacher)
/// - `POST /attendance/sessions/{session_id}/records/{record_id}/fraud-check` → `fraud_check` (teacher)
/// - `POST /attendance/records/{record_id}/validate` → `validate_record` (teacher)
/// - `GET /attendance/justifications` → `list_justifications` (teacher)
/// - `PUT /attendance/justifications/{justification_id}` → `review_justification` (teacher)
/// - `POST /attendance/submit` → `submit_code` (student)
pub fn attendance_routes() -> Router<AppState> {
    let teacher = Router::new()
        .route("/codes", post(post::generate_code))
        .route("/codes/current", get(get::current_code))
        .route("/dashboard", get(get::dashboard))
        .route(
            "/sessions/{session_id}/submissions",
            get(get::session_submissions),
        )
        .route(
            "/sessions/{session_id}/records/{record_id}/fraud-check",
            post(post::fraud_check),
        )
        .route("/records/{record_id}/validate", post(post::validate_record))
        .route("/justifications", get(get::list_justifications))
        .route(
            "/justifications/{justification_id}",
            put(put::review_justification),
        )
        .route_layer(from_fn(allow_teacher));

    let student = Router::new()
        .route("/submit", post(post::submit_code))
        .route_layer(from_fn(allow_student));

    teacher.merge(student)
}
