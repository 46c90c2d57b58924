//! Helpers and response DTOs shared by several route groups.

use chrono::{NaiveDate, NaiveTime};
use db::models::{class_session, course, course_teacher, enrollment, user};
use sea_orm::DbConn;
use serde::Serialize;

use crate::auth::Claims;
use crate::response::ApiError;

/// Loads the account behind a token. A token for a deleted account is 401.
pub async fn current_user(db: &DbConn, claims: &Claims) -> Result<user::Model, ApiError> {
    user::Model::find_by_id(db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::unauthorized("User no longer exists"))
}

/// Who may see a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseAccess {
    /// Teachers of the course and admins.
    Staff,
    /// Staff plus enrolled students.
    Member,
}

/// Loads `course_id` and checks that `actor` may access it.
pub async fn course_for(
    db: &DbConn,
    actor: &user::Model,
    course_id: i64,
    access: CourseAccess,
) -> Result<course::Model, ApiError> {
    let course = course::Model::find_by_id(db, course_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Course not found"))?;

    let allowed = match actor.role {
        user::Role::Admin => true,
        user::Role::Teacher => course_teacher::Model::is_teacher(db, actor.id, course_id).await?,
        user::Role::Student => {
            access == CourseAccess::Member
                && enrollment::Model::is_enrolled(db, actor.id, course_id).await?
        }
    };

    if !allowed {
        return Err(ApiError::forbidden("You do not have access to this course"));
    }
    Ok(course)
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: user::Role,
    pub created_at: String,
    pub updated_at: String,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CourseResponse {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
}

impl From<course::Model> for CourseResponse {
    fn from(course: course::Model) -> Self {
        Self {
            id: course.id,
            name: course.name,
            code: course.code,
            description: course.description,
        }
    }
}

/// A class session flattened with its course.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: i64,
    pub course_id: i64,
    pub course_code: Option<String>,
    pub course_name: Option<String>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl From<class_session::SessionWithCourse> for SessionResponse {
    fn from((session, course): class_session::SessionWithCourse) -> Self {
        Self {
            id: session.id,
            course_id: session.course_id,
            course_code: course.as_ref().map(|c| c.code.clone()),
            course_name: course.map(|c| c.name),
            date: session.date,
            start_time: session.start_time,
            end_time: session.end_time,
        }
    }
}

impl From<class_session::Model> for SessionResponse {
    fn from(session: class_session::Model) -> Self {
        (session, None).into()
    }
}

/// Per-handler admin gate for groups that mix admin and member routes.
pub fn require_admin(claims: &Claims) -> Result<(), ApiError> {
    if claims.is_admin() {
        Ok(())
    } else {
        Err(ApiError::forbidden("Admin access required"))
    }
}
