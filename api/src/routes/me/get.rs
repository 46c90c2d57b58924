use axum::extract::State;
use db::models::{absence_justification, class_session};
use db::reports::{self, HistoryEntry};
use serde::Serialize;
use util::{state::AppState, time};

use crate::auth::AuthUser;
use crate::response::{ApiResult, ok};
use crate::routes::common::SessionResponse;

/// GET /api/me/classes/current
///
/// Enrolled sessions running right now.
pub async fn current_classes(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> ApiResult<Vec<SessionResponse>> {
    let now = time::local_now();
    let today = now.date();
    let sessions =
        class_session::Model::enrolled_between(state.db(), claims.sub, Some(today), Some(today))
            .await?
            .into_iter()
            .filter(|(s, _)| s.is_ongoing_at(now))
            .map(SessionResponse::from)
            .collect();
    ok(sessions, "Current classes retrieved successfully")
}

/// GET /api/me/classes/today
pub async fn today_classes(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> ApiResult<Vec<SessionResponse>> {
    let today = time::local_now().date();
    let sessions =
        class_session::Model::enrolled_between(state.db(), claims.sub, Some(today), Some(today))
            .await?;
    ok(
        sessions.into_iter().map(SessionResponse::from).collect(),
        "Today's classes retrieved successfully",
    )
}

/// GET /api/me/classes/weekly
///
/// Enrolled sessions from Monday to Sunday of the current week.
pub async fn weekly_classes(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> ApiResult<Vec<SessionResponse>> {
    let (monday, sunday) = time::week_bounds(time::local_now().date());
    let sessions =
        class_session::Model::enrolled_between(state.db(), claims.sub, Some(monday), Some(sunday))
            .await?;
    ok(
        sessions.into_iter().map(SessionResponse::from).collect(),
        "Weekly classes retrieved successfully",
    )
}

/// GET /api/me/attendance/history
///
/// Every ended session of the student's courses, newest first, with
/// `present`, `pending` or `absent` and any justification status.
pub async fn attendance_history(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> ApiResult<Vec<HistoryEntry>> {
    let history = reports::attendance_history(state.db(), claims.sub, time::local_now()).await?;
    ok(history, "Attendance history retrieved successfully")
}

/// One entry of the calendar feed.
#[derive(Debug, Serialize)]
pub struct CalendarEvent {
    pub id: i64,
    pub title: String,
    pub start: String,
    pub end: String,
}

const CALENDAR_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// GET /api/me/calendar
///
/// Enrolled sessions from today on, shaped for FullCalendar.
///
/// ```json
/// [{ "id": 4, "title": "Web Development", "start": "2025-10-01T09:00:00", "end": "2025-10-01T12:00:00" }]
/// ```
pub async fn calendar(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> ApiResult<Vec<CalendarEvent>> {
    let today = time::local_now().date();
    let events = class_session::Model::enrolled_between(state.db(), claims.sub, Some(today), None)
        .await?
        .into_iter()
        .map(|(session, course)| CalendarEvent {
            id: session.id,
            title: course.map(|c| c.name).unwrap_or_default(),
            start: session.starts_at().format(CALENDAR_FORMAT).to_string(),
            end: session.ends_at().format(CALENDAR_FORMAT).to_string(),
        })
        .collect();
    ok(events, "Calendar retrieved successfully")
}

/// GET /api/me/justifications
///
/// The student's justifications, newest first.
pub async fn my_justifications(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> ApiResult<Vec<absence_justification::Model>> {
    let items = absence_justification::Model::for_student(state.db(), claims.sub).await?;
    ok(items, "Justifications retrieved successfully")
}
