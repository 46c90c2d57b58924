use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{NaiveDate, NaiveTime};
use db::error::is_unique_violation;
use db::models::{class_session, course};
use serde::Deserialize;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::{ApiError, ApiResult, ok};
use crate::routes::common::{
    CourseAccess, CourseResponse, SessionResponse, course_for, current_user, require_admin,
};

#[derive(Debug, Deserialize)]
pub struct UpdateCourseRequest {
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
}

/// PUT /api/courses/{course_id}
///
/// Admin-only. Omitted fields are kept.
pub async fn update_course(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(course_id): Path<i64>,
    Json(req): Json<UpdateCourseRequest>,
) -> ApiResult<CourseResponse> {
    require_admin(&claims)?;
    let name = req.name.as_deref().map(str::trim);
    let code = req.code.as_deref().map(str::trim);
    if name.is_some_and(str::is_empty) || code.is_some_and(str::is_empty) {
        return Err(ApiError::bad_request("Course name and code cannot be blank"));
    }

    let db = state.db();
    if course::Model::find_by_id(db, course_id).await?.is_none() {
        return Err(ApiError::not_found("Course not found"));
    }

    let course = course::Model::update(db, course_id, name, code, req.description.as_deref())
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::conflict("A course with this code already exists")
            } else {
                e.into()
            }
        })?;

    ok(course.into(), "Course updated successfully")
}

#[derive(Debug, Deserialize)]
pub struct UpdateSessionRequest {
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

/// PUT /api/courses/{course_id}/sessions/{session_id}
///
/// Reschedules a session. Omitted fields are kept.
///
/// ### Responses
/// - `200 OK`
/// - `400 Bad Request` if the result would not end after it starts
/// - `404 Not Found` if the session is not part of the course
/// - `409 Conflict` on a clash with another session of the course
pub async fn update_session(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path((course_id, session_id)): Path<(i64, i64)>,
    Json(req): Json<UpdateSessionRequest>,
) -> ApiResult<SessionResponse> {
    let db = state.db();
    let actor = current_user(db, &claims).await?;
    let course = course_for(db, &actor, course_id, CourseAccess::Staff).await?;

    let existing = class_session::Model::find_by_id(db, session_id)
        .await?
        .filter(|s| s.course_id == course_id)
        .ok_or_else(|| ApiError::not_found("Class session not found"))?;

    let session =
        class_session::Model::update(db, &existing, req.date, req.start_time, req.end_time).await?;

    ok((session, Some(course)).into(), "Class session updated successfully")
}
