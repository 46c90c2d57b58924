use axum::extract::{Path, State};
use db::models::{class_session, course, course_teacher, enrollment};
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::{ApiError, ApiResult, Empty, ok};
use crate::routes::common::{CourseAccess, course_for, current_user, require_admin};

/// DELETE /api/courses/{course_id}
///
/// Admin-only. Sessions, codes, records and memberships go with the course.
pub async fn delete_course(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(course_id): Path<i64>,
) -> ApiResult<Empty> {
    require_admin(&claims)?;
    if !course::Model::delete(state.db(), course_id).await? {
        return Err(ApiError::not_found("Course not found"));
    }
    tracing::info!(course_id, "Course deleted");
    ok(Empty {}, "Course deleted successfully")
}

/// DELETE /api/courses/{course_id}/teachers/{user_id}
pub async fn unassign_teacher(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path((course_id, user_id)): Path<(i64, i64)>,
) -> ApiResult<Empty> {
    require_admin(&claims)?;
    if !course_teacher::Model::unassign(state.db(), course_id, user_id).await? {
        return Err(ApiError::not_found("Teacher is not assigned to this course"));
    }
    ok(Empty {}, "Teacher removed successfully")
}

/// DELETE /api/courses/{course_id}/enrollments/{user_id}
pub async fn unenroll_student(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path((course_id, user_id)): Path<(i64, i64)>,
) -> ApiResult<Empty> {
    require_admin(&claims)?;
    if !enrollment::Model::unenroll(state.db(), user_id, course_id).await? {
        return Err(ApiError::not_found("Student is not enrolled in this course"));
    }
    ok(Empty {}, "Student unenrolled successfully")
}

/// DELETE /api/courses/{course_id}/sessions/{session_id}
///
/// Teacher of the course or admin.
pub async fn delete_session(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path((course_id, session_id)): Path<(i64, i64)>,
) -> ApiResult<Empty> {
    let db = state.db();
    let actor = current_user(db, &claims).await?;
    course_for(db, &actor, course_id, CourseAccess::Staff).await?;

    let session = class_session::Model::find_by_id(db, session_id)
        .await?
        .filter(|s| s.course_id == course_id)
        .ok_or_else(|| ApiError::not_found("Class session not found"))?;
    class_session::Model::delete(db, session.id).await?;

    tracing::info!(course_id, session_id, "Class session deleted");
    ok(Empty {}, "Class session deleted successfully")
}
