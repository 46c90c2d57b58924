//! # Courses Routes Module
//!
//! Courses, their teachers and enrollments, and their class sessions under
//! `/api/courses`. The group is mounted behind `allow_authenticated`; finer
//! checks happen per handler:
//!
//! - course CRUD, teacher assignment and enrollment changes are admin-only
//! - reading a course or its sessions needs membership (teacher, enrolled
//!   student or admin)
//! - enrollments, statistics and session changes need a teacher of the course
//!   or an admin

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use util::state::AppState;

pub mod delete;
pub mod get;
pub mod post;
pub mod put;

/// Builds the `/courses` route group.
pub fn courses_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get::list_courses).post(post::create_course))
        .route(
            "/{course_id}",
            get(get::get_course)
                .put(put::update_course)
                .delete(delete::delete_course),
        )
        .route("/{course_id}/teachers", post(post::assign_teacher))
        .route(
            "/{course_id}/teachers/{user_id}",
            delete(delete::unassign_teacher),
        )
        .route(
            "/{course_id}/enrollments",
            get(get::list_enrollments).post(post::enroll_student),
        )
        .route(
            "/{course_id}/enrollments/{user_id}",
            delete(delete::unenroll_student),
        )
        .route(
            "/{course_id}/sessions",
            get(get::list_sessions).post(post::create_session),
        )
        .route(
            "/{course_id}/sessions/{session_id}",
            put(put::update_session).delete(delete::delete_session),
        )
        .route("/{course_id}/stats", get(get::course_stats))
}
