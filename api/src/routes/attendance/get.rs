use axum::extract::{Path, Query, State};
use chrono::Utc;
use db::fraud::FraudPolicy;
use db::models::absence_justification::{self, JustificationStatus};
use db::models::attendance_code::{self, CodeStatus};
use db::models::{class_session, course};
use db::reports::{self, Submission, TeacherDashboard};
use serde::{Deserialize, Serialize};
use util::{state::AppState, time};

use super::common::CodeResponse;
use crate::auth::AuthUser;
use crate::response::{ApiError, ApiResult, ok};
use crate::routes::common::{SessionResponse, current_user};

#[derive(Debug, Serialize)]
pub struct CurrentCodeResponse {
    pub status: CodeStatus,
    pub code: Option<CodeResponse>,
    pub session: Option<SessionResponse>,
}

/// GET /api/attendance/codes/current
///
/// The teacher's most relevant code today: an active one if any session has
/// it, else the latest expired one, else `inactive` with no code.
pub async fn current_code(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> ApiResult<CurrentCodeResponse> {
    let now = Utc::now();
    let current =
        attendance_code::Model::current_for_teacher(state.db(), claims.sub, now, time::to_local(now))
            .await?;

    ok(
        CurrentCodeResponse {
            status: current.status,
            code: current.code.map(|c| CodeResponse::at(c, now)),
            session: current.session.map(SessionResponse::from),
        },
        "Current code retrieved successfully",
    )
}

/// GET /api/attendance/dashboard
///
/// Today's ongoing and upcoming sessions with the focused session's code and
/// submissions.
pub async fn dashboard(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> ApiResult<TeacherDashboard> {
    let now = Utc::now();
    let locations = vec![FraudPolicy::from_config().reference];
    let dashboard =
        reports::teacher_dashboard(state.db(), claims.sub, now, time::to_local(now), locations)
            .await?;
    ok(dashboard, "Dashboard retrieved successfully")
}

#[derive(Debug, Serialize)]
pub struct SessionSubmissions {
    pub session: SessionResponse,
    pub code: Option<CodeResponse>,
    pub submissions: Vec<Submission>,
}

/// GET /api/attendance/sessions/{session_id}/submissions
///
/// ### Responses
/// - `200 OK`
/// - `403 Forbidden` unless a teacher of the course or an admin
/// - `404 Not Found`
pub async fn session_submissions(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(session_id): Path<i64>,
) -> ApiResult<SessionSubmissions> {
    let db = state.db();
    let actor = current_user(db, &claims).await?;
    let session = class_session::Model::find_by_id(db, session_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Class session not found"))?;
    if !actor.is_admin() && !session.is_taught_by(db, actor.id).await? {
        return Err(ApiError::forbidden("Permission denied."));
    }

    let now = Utc::now();
    let course = course::Model::find_by_id(db, session.course_id).await?;
    let code = attendance_code::Model::find_for_session(db, session.id).await?;
    let submissions = reports::submissions(db, session.id).await?;

    ok(
        SessionSubmissions {
            session: (session, course).into(),
            code: code.map(|c| CodeResponse::at(c, now)),
            submissions,
        },
        "Submissions retrieved successfully",
    )
}

#[derive(Debug, Deserialize)]
pub struct JustificationQuery {
    pub status: Option<JustificationStatus>,
}

/// GET /api/attendance/justifications
///
/// Teachers see justifications for sessions of the courses they teach,
/// admins see all of them, newest first.
///
/// ### Query Parameters
/// - `status` (optional): `pending`, `approved` or `rejected`
pub async fn list_justifications(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Query(query): Query<JustificationQuery>,
) -> ApiResult<Vec<absence_justification::Model>> {
    let db = state.db();
    let actor = current_user(db, &claims).await?;
    let items = absence_justification::Model::for_reviewer(db, &actor, query.status).await?;
    ok(items, "Justifications retrieved successfully")
}
