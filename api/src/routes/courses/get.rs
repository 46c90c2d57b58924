use axum::extract::{Path, State};
use db::models::{class_session, course, course_teacher, enrollment, user::Role};
use db::reports::{self, CourseStats};
use serde::Serialize;
use util::{state::AppState, time};

use crate::auth::AuthUser;
use crate::response::{ApiResult, ok};
use crate::routes::common::{
    CourseAccess, CourseResponse, SessionResponse, UserResponse, course_for, current_user,
};

/// GET /api/courses
///
/// Admins see every course, teachers the courses they teach and students the
/// courses they are enrolled in.
pub async fn list_courses(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> ApiResult<Vec<CourseResponse>> {
    let db = state.db();
    let courses = match claims.role {
        Role::Admin => course::Model::list(db).await?,
        Role::Teacher => course::Model::taught_by(db, claims.sub).await?,
        Role::Student => course::Model::enrolled_by(db, claims.sub).await?,
    };
    ok(
        courses.into_iter().map(CourseResponse::from).collect(),
        "Courses retrieved successfully",
    )
}

#[derive(Debug, Serialize)]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: CourseResponse,
    pub teachers: Vec<UserResponse>,
}

/// GET /api/courses/{course_id}
///
/// ### Responses
/// - `200 OK` with the course and its teachers
/// - `403 Forbidden` for non-members
/// - `404 Not Found`
pub async fn get_course(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(course_id): Path<i64>,
) -> ApiResult<CourseDetail> {
    let db = state.db();
    let actor = current_user(db, &claims).await?;
    let course = course_for(db, &actor, course_id, CourseAccess::Member).await?;
    let teachers = course_teacher::Model::teachers_of(db, course.id).await?;

    ok(
        CourseDetail {
            course: course.into(),
            teachers: teachers.into_iter().map(UserResponse::from).collect(),
        },
        "Course retrieved successfully",
    )
}

/// GET /api/courses/{course_id}/enrollments
///
/// Enrolled students, ordered by username.
pub async fn list_enrollments(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(course_id): Path<i64>,
) -> ApiResult<Vec<UserResponse>> {
    let db = state.db();
    let actor = current_user(db, &claims).await?;
    course_for(db, &actor, course_id, CourseAccess::Staff).await?;

    let students = enrollment::Model::students_of(db, course_id).await?;
    ok(
        students.into_iter().map(UserResponse::from).collect(),
        "Enrollments retrieved successfully",
    )
}

/// GET /api/courses/{course_id}/sessions
///
/// All sessions of the course in chronological order.
pub async fn list_sessions(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(course_id): Path<i64>,
) -> ApiResult<Vec<SessionResponse>> {
    let db = state.db();
    let actor = current_user(db, &claims).await?;
    let course = course_for(db, &actor, course_id, CourseAccess::Member).await?;

    let sessions = class_session::Model::for_course(db, course_id).await?;
    ok(
        sessions
            .into_iter()
            .map(|s| SessionResponse::from((s, Some(course.clone()))))
            .collect(),
        "Sessions retrieved successfully",
    )
}

/// GET /api/courses/{course_id}/stats
///
/// Per-student attendance over the sessions that have already ended.
pub async fn course_stats(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(course_id): Path<i64>,
) -> ApiResult<CourseStats> {
    let db = state.db();
    let actor = current_user(db, &claims).await?;
    course_for(db, &actor, course_id, CourseAccess::Staff).await?;

    let stats = reports::course_stats(db, course_id, time::local_now()).await?;
    ok(stats, "Course statistics retrieved successfully")
}
