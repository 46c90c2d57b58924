use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use db::models::absence_justification::{self, JustificationStatus};
use serde::Deserialize;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::{ApiResult, ok};
use crate::routes::common::current_user;
use crate::ws::notifications::emit;
use crate::ws::notifications::payload::JustificationReviewed;

#[derive(Debug, Deserialize)]
pub struct ReviewJustificationRequest {
    pub status: JustificationStatus,
    pub teacher_comment: Option<String>,
}

/// PUT /api/attendance/justifications/{justification_id}
///
/// Approves or rejects a pending justification and notifies the student.
///
/// ### Request Body
/// ```json
/// { "status": "approved", "teacher_comment": "Certificate received." }
/// ```
///
/// ### Responses
/// - `200 OK` with the reviewed justification
/// - `400 Bad Request` if the justification was already reviewed or the
///   status is `pending`
/// - `403 Forbidden` unless a teacher of the course or an admin
/// - `404 Not Found`
pub async fn review_justification(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(justification_id): Path<i64>,
    Json(req): Json<ReviewJustificationRequest>,
) -> ApiResult<absence_justification::Model> {
    let db = state.db();
    let actor = current_user(db, &claims).await?;
    let reviewed = absence_justification::Model::review(
        db,
        justification_id,
        &actor,
        req.status,
        req.teacher_comment,
        Utc::now(),
    )
    .await?;

    emit::justification_reviewed(
        state.ws(),
        reviewed.student_id,
        JustificationReviewed {
            justification_id: reviewed.id,
            class_session_id: reviewed.class_session_id,
            status: reviewed.status,
            teacher_comment: reviewed.teacher_comment.clone(),
        },
    )
    .await;

    ok(reviewed, "Justification reviewed successfully")
}
