use serde::Serialize;
use util::ws::WebSocketManager;

use super::payload::{
    AttendanceValidated, CodeGenerated, JustificationReviewed, Notification, StudentSubmitted,
};
use crate::ws::core::{envelope, event::Event};
use crate::ws::topics::{session_topic, teacher_general_topic, user_topic};

#[derive(Debug, Serialize)]
pub struct CodeGeneratedEvent {
    #[serde(skip)]
    pub teacher_id: i64,
    #[serde(flatten)]
    pub body: Notification<CodeGenerated>,
}
impl Event for CodeGeneratedEvent {
    const NAME: &'static str = "code_generated_for_teacher";
    fn topic_path(&self) -> String {
        teacher_general_topic(self.teacher_id)
    }
}

#[derive(Debug, Serialize)]
pub struct StudentSubmittedEvent {
    #[serde(flatten)]
    pub body: Notification<StudentSubmitted>,
}
impl Event for StudentSubmittedEvent {
    const NAME: &'static str = "student_submitted";
    fn topic_path(&self) -> String {
        session_topic(self.body.context.class_session_id)
    }
}

#[derive(Debug, Serialize)]
pub struct AttendanceValidatedEvent {
    #[serde(skip)]
    pub student_id: i64,
    #[serde(flatten)]
    pub body: Notification<AttendanceValidated>,
}
impl Event for AttendanceValidatedEvent {
    const NAME: &'static str = "attendance_validated";
    fn topic_path(&self) -> String {
        user_topic(self.student_id)
    }
}

#[derive(Debug, Serialize)]
pub struct JustificationReviewedEvent {
    #[serde(skip)]
    pub student_id: i64,
    #[serde(flatten)]
    pub body: Notification<JustificationReviewed>,
}
impl Event for JustificationReviewedEvent {
    const NAME: &'static str = "justification_reviewed";
    fn topic_path(&self) -> String {
        user_topic(self.student_id)
    }
}

/* ---------- one-liner helpers ---------- */

pub async fn code_generated(ws: &WebSocketManager, teacher_id: i64, ctx: CodeGenerated) {
    let body = Notification {
        message: format!(
            "New attendance code {} generated for {}.",
            ctx.code, ctx.course_code
        ),
        context: ctx,
    };
    envelope::emit(ws, &CodeGeneratedEvent { teacher_id, body }).await;
}

pub async fn student_submitted(ws: &WebSocketManager, ctx: StudentSubmitted) {
    let body = Notification {
        message: format!("{} submitted an attendance code.", ctx.student_username),
        context: ctx,
    };
    envelope::emit(ws, &StudentSubmittedEvent { body }).await;
}

pub async fn attendance_validated(ws: &WebSocketManager, student_id: i64, ctx: AttendanceValidated) {
    let body = Notification {
        message: "Your attendance has been validated.".to_string(),
        context: ctx,
    };
    envelope::emit(ws, &AttendanceValidatedEvent { student_id, body }).await;
}

pub async fn justification_reviewed(
    ws: &WebSocketManager,
    student_id: i64,
    ctx: JustificationReviewed,
) {
    let body = Notification {
        message: format!("Your justification was {}.", ctx.status),
        context: ctx,
    };
    envelope::emit(ws, &JustificationReviewedEvent { student_id, body }).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::Value;
    use tokio::time::{Duration, timeout};

    #[tokio::test]
    async fn student_submission_reaches_session_group_in_envelope() {
        let ws = WebSocketManager::new();
        let mut rx = ws.subscribe(&session_topic(4)).await;

        student_submitted(
            &ws,
            StudentSubmitted {
                class_session_id: 4,
                record_id: 10,
                student_id: 3,
                student_username: "student1".into(),
                submitted_at: Utc::now(),
            },
        )
        .await;

        let raw = timeout(Duration::from_millis(50), rx.recv()).await.unwrap().unwrap();
        let json: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["type"], "event");
        assert_eq!(json["event"], "student_submitted");
        assert_eq!(json["topic"], "class_session_4_notifications");
        assert_eq!(json["payload"]["message"], "student1 submitted an attendance code.");
        assert_eq!(json["payload"]["context"]["record_id"], 10);
    }

    #[tokio::test]
    async fn routing_fields_are_not_serialized() {
        let ev = AttendanceValidatedEvent {
            student_id: 9,
            body: Notification {
                message: "m".into(),
                context: AttendanceValidated {
                    class_session_id: 1,
                    record_id: 2,
                    validated_by: 3,
                },
            },
        };
        assert_eq!(ev.topic_path(), "user_9_notifications");
        let json = serde_json::to_value(&ev).unwrap();
        assert!(json.get("student_id").is_none());
        assert_eq!(json["context"]["validated_by"], 3);
    }
}
