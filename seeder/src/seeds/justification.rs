use crate::seed::Seeder;
use crate::seeds::db_err;
use db::AttendanceError;
use db::models::absence_justification::{self, JustificationType, NewJustification};
use db::models::{attendance_record, class_session, course, enrollment};
use fake::{Fake, faker::lorem::en::Sentence};
use sea_orm::{DatabaseConnection, DbErr};
use util::time;

pub struct JustificationSeeder;

const JUSTIFICATION_COUNT: usize = 3;

const REASONS: [(&str, JustificationType); 3] = [
    ("Medical appointment", JustificationType::Absence),
    ("Public transport strike", JustificationType::LateArrival),
    ("Family emergency", JustificationType::Absence),
];

#[async_trait::async_trait]
impl Seeder for JustificationSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        let local_now = time::local_now();
        let mut written = 0;

        'courses: for course in course::Model::list(db).await? {
            let students = enrollment::Model::students_of(db, course.id).await?;
            for session in class_session::Model::for_course(db, course.id).await? {
                if !session.has_ended_at(local_now) {
                    continue;
                }

                for student in &students {
                    if written == JUSTIFICATION_COUNT {
                        break 'courses;
                    }
                    if attendance_record::Model::find_for(db, session.id, student.id)
                        .await?
                        .is_some()
                    {
                        continue;
                    }

                    let (reason, justification_type) = REASONS[written % REASONS.len()];
                    let detail: String = Sentence(4..8).fake();
                    let new = NewJustification {
                        class_session_id: session.id,
                        description: format!("{reason}. {detail}"),
                        document_path: None,
                        justification_type,
                    };

                    let submitted_at = time::from_local(session.ends_at());
                    match absence_justification::Model::submit(db, student.id, new, submitted_at).await {
                        Ok(_) => written += 1,
                        Err(AttendanceError::Conflict(_)) => {}
                        Err(e) => return Err(db_err(e)),
                    }
                    // One per session keeps them spread across classes
                    break;
                }
            }
        }

        Ok(())
    }
}
