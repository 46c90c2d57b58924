use axum::{Json, extract::State};
use chrono::Utc;
use common::{format_validation_errors, not_blank};
use db::models::absence_justification::{self, JustificationType, NewJustification};
use serde::Deserialize;
use util::state::AppState;
use validator::Validate;

use crate::auth::AuthUser;
use crate::response::{ApiError, ApiResult, created};

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitJustificationRequest {
    pub class_session_id: i64,

    #[validate(
        custom(function = "not_blank", message = "Description is required."),
        length(max = 500, message = "Description must be at most 500 characters.")
    )]
    pub description: String,

    pub document_path: Option<String>,

    #[serde(default = "default_type")]
    pub justification_type: JustificationType,
}

fn default_type() -> JustificationType {
    JustificationType::Absence
}

/// POST /api/me/justifications
///
/// ### Request Body
/// ```json
/// { "class_session_id": 4, "description": "Medical appointment", "justification_type": "absence" }
/// ```
///
/// ### Responses
/// - `201 Created`
/// - `400 Bad Request` on a blank or overlong description
/// - `403 Forbidden` if not enrolled in the session's course
/// - `404 Not Found` for an unknown session
/// - `409 Conflict` if a justification for the session already exists
pub async fn submit_justification(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<SubmitJustificationRequest>,
) -> ApiResult<absence_justification::Model> {
    req.validate()
        .map_err(|e| ApiError::bad_request(format_validation_errors(&e)))?;

    let justification = absence_justification::Model::submit(
        state.db(),
        claims.sub,
        NewJustification {
            class_session_id: req.class_session_id,
            description: req.description,
            document_path: req.document_path,
            justification_type: req.justification_type,
        },
        Utc::now(),
    )
    .await?;

    tracing::info!(
        justification_id = justification.id,
        student_id = claims.sub,
        "Justification submitted"
    );
    created(justification, "Justification submitted successfully")
}
