use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{NaiveDate, NaiveTime};
use common::{format_validation_errors, not_blank};
use db::error::is_unique_violation;
use db::models::{class_session, course, course_teacher, enrollment, user};
use serde::Deserialize;
use util::state::AppState;
use validator::Validate;

use crate::auth::AuthUser;
use crate::response::{ApiError, ApiResult, Empty, created};
use crate::routes::common::{
    CourseAccess, CourseResponse, SessionResponse, course_for, current_user, require_admin,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCourseRequest {
    #[validate(custom(function = "not_blank", message = "Course name is required"))]
    pub name: String,

    #[validate(length(min = 1, max = 20, message = "Course code must be between 1 and 20 characters"))]
    pub code: String,

    pub description: Option<String>,
}

/// POST /api/courses
///
/// ### Responses
/// - `201 Created`
/// - `400 Bad Request` on validation failure
/// - `403 Forbidden` for non-admins
/// - `409 Conflict` if the course code is taken
pub async fn create_course(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<CreateCourseRequest>,
) -> ApiResult<CourseResponse> {
    require_admin(&claims)?;
    req.validate()
        .map_err(|e| ApiError::bad_request(format_validation_errors(&e)))?;

    let course = course::Model::create(
        state.db(),
        req.name.trim(),
        req.code.trim(),
        req.description.as_deref(),
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::conflict("A course with this code already exists")
        } else {
            e.into()
        }
    })?;

    tracing::info!(course_id = course.id, code = %course.code, "Course created");
    created(course.into(), "Course created successfully")
}

#[derive(Debug, Deserialize)]
pub struct MemberRequest {
    pub user_id: i64,
}

async fn member_with_role(
    state: &AppState,
    course_id: i64,
    user_id: i64,
    role: user::Role,
) -> Result<user::Model, ApiError> {
    let db = state.db();
    if course::Model::find_by_id(db, course_id).await?.is_none() {
        return Err(ApiError::not_found("Course not found"));
    }
    let user = user::Model::find_by_id(db, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    if user.role != role {
        return Err(ApiError::bad_request(format!("User is not a {role}")));
    }
    Ok(user)
}

/// POST /api/courses/{course_id}/teachers
///
/// Assigns a teacher to the course. Body: `{ "user_id": 3 }`.
///
/// ### Responses
/// - `201 Created`
/// - `400 Bad Request` if the user is not a teacher
/// - `404 Not Found` for an unknown course or user
/// - `409 Conflict` if already assigned
pub async fn assign_teacher(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(course_id): Path<i64>,
    Json(req): Json<MemberRequest>,
) -> ApiResult<Empty> {
    require_admin(&claims)?;
    let teacher = member_with_role(&state, course_id, req.user_id, user::Role::Teacher).await?;

    course_teacher::Model::assign(state.db(), course_id, teacher.id)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::conflict("Teacher is already assigned to this course")
            } else {
                e.into()
            }
        })?;

    tracing::info!(course_id, teacher_id = teacher.id, "Teacher assigned");
    created(Empty {}, "Teacher assigned successfully")
}

/// POST /api/courses/{course_id}/enrollments
///
/// Enrolls a student. Body: `{ "user_id": 7 }`.
///
/// ### Responses
/// - `201 Created`
/// - `400 Bad Request` if the user is not a student
/// - `404 Not Found` for an unknown course or user
/// - `409 Conflict` if already enrolled
pub async fn enroll_student(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(course_id): Path<i64>,
    Json(req): Json<MemberRequest>,
) -> ApiResult<Empty> {
    require_admin(&claims)?;
    let student = member_with_role(&state, course_id, req.user_id, user::Role::Student).await?;

    enrollment::Model::enroll(state.db(), student.id, course_id)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::conflict("Student is already enrolled in this course")
            } else {
                e.into()
            }
        })?;

    tracing::info!(course_id, student_id = student.id, "Student enrolled");
    created(Empty {}, "Student enrolled successfully")
}

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// POST /api/courses/{course_id}/sessions
///
/// ### Request Body
/// ```json
/// { "date": "2025-10-01", "start_time": "09:00:00", "end_time": "12:00:00" }
/// ```
///
/// ### Responses
/// - `201 Created`
/// - `400 Bad Request` if the session does not end after it starts
/// - `403 Forbidden` unless a teacher of the course or an admin
/// - `409 Conflict` if the course already has a session starting then
pub async fn create_session(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(course_id): Path<i64>,
    Json(req): Json<CreateSessionRequest>,
) -> ApiResult<SessionResponse> {
    let db = state.db();
    let actor = current_user(db, &claims).await?;
    let course = course_for(db, &actor, course_id, CourseAccess::Staff).await?;

    let session =
        class_session::Model::create(db, course_id, req.date, req.start_time, req.end_time).await?;

    tracing::info!(course_id, session_id = session.id, date = %session.date, "Class session created");
    created((session, Some(course)).into(), "Class session created successfully")
}
