use chrono::{DateTime, Utc};
use db::models::absence_justification::JustificationStatus;
use serde::Serialize;

/// `{message, context}` body carried by every notification.
#[derive(Debug, Clone, Serialize)]
pub struct Notification<C: Serialize> {
    pub message: String,
    pub context: C,
}

#[derive(Debug, Clone, Serialize)]
pub struct CodeGenerated {
    pub class_session_id: i64,
    pub course_code: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentSubmitted {
    pub class_session_id: i64,
    pub record_id: i64,
    pub student_id: i64,
    pub student_username: String,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceValidated {
    pub class_session_id: i64,
    pub record_id: i64,
    pub validated_by: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct JustificationReviewed {
    pub justification_id: i64,
    pub class_session_id: i64,
    pub status: JustificationStatus,
    pub teacher_comment: Option<String>,
}
