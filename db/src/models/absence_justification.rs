use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::QueryOrder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::{class_session, course_teacher, enrollment, user};
use crate::error::{AttendanceError, is_unique_violation};

pub const MAX_DESCRIPTION_LEN: usize = 500;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Deserialize, Serialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "justification_type")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum JustificationType {
    #[sea_orm(string_value = "absence")]
    Absence,

    #[sea_orm(string_value = "late_arrival")]
    LateArrival,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Deserialize, Serialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "justification_status")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum JustificationStatus {
    #[sea_orm(string_value = "pending")]
    Pending,

    #[sea_orm(string_value = "approved")]
    Approved,

    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// A student's explanation for missing, or arriving late to, a session.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "absence_justifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub class_session_id: i64,
    pub description: String,
    /// Reference to supporting evidence. The file itself is not managed here.
    pub document_path: Option<String>,
    pub justification_type: JustificationType,
    pub status: JustificationStatus,
    pub teacher_comment: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::StudentId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::class_session::Entity",
        from = "Column::ClassSessionId",
        to = "super::class_session::Column::Id",
        on_delete = "Cascade"
    )]
    Session,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::class_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Fields a student provides.
#[derive(Debug, Clone)]
pub struct NewJustification {
    pub class_session_id: i64,
    pub description: String,
    pub document_path: Option<String>,
    pub justification_type: JustificationType,
}

impl Model {
    pub async fn find_by_id(db: &DbConn, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn submit(
        db: &DbConn,
        student_id: i64,
        new: NewJustification,
        now: DateTime<Utc>,
    ) -> Result<Model, AttendanceError> {
        let description = new.description.trim();
        if description.is_empty() {
            return Err(AttendanceError::invalid("Description is required."));
        }
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(AttendanceError::invalid(format!(
                "Description must be at most {MAX_DESCRIPTION_LEN} characters."
            )));
        }

        let session = class_session::Model::find_by_id(db, new.class_session_id)
            .await?
            .ok_or(AttendanceError::NotFound("Class session"))?;
        if !enrollment::Model::is_enrolled(db, student_id, session.course_id).await? {
            return Err(AttendanceError::NotEnrolled);
        }

        let justification = ActiveModel {
            student_id: Set(student_id),
            class_session_id: Set(session.id),
            description: Set(description.to_owned()),
            document_path: Set(new.document_path.filter(|p| !p.trim().is_empty())),
            justification_type: Set(new.justification_type),
            status: Set(JustificationStatus::Pending),
            submitted_at: Set(now),
            ..Default::default()
        };

        justification.insert(db).await.map_err(|e| {
            if is_unique_violation(&e) {
                AttendanceError::conflict("A justification for this class already exists.")
            } else {
                e.into()
            }
        })
    }

    pub async fn for_student(db: &DbConn, student_id: i64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::SubmittedAt)
            .all(db)
            .await
    }

    /// Justifications visible to `actor`: everything for admins, the taught
    /// courses' sessions for teachers.
    pub async fn for_reviewer(
        db: &DbConn,
        actor: &user::Model,
        status: Option<JustificationStatus>,
    ) -> Result<Vec<Model>, DbErr> {
        let mut query = Entity::find().order_by_desc(Column::SubmittedAt);
        if let Some(status) = status {
            query = query.filter(Column::Status.eq(status));
        }
        if !actor.is_admin() {
            let course_ids: Vec<i64> = course_teacher::Entity::find()
                .filter(course_teacher::Column::UserId.eq(actor.id))
                .all(db)
                .await?
                .into_iter()
                .map(|ct| ct.course_id)
                .collect();
            if course_ids.is_empty() {
                return Ok(Vec::new());
            }
            let session_ids: Vec<i64> = class_session::Entity::find()
                .filter(class_session::Column::CourseId.is_in(course_ids))
                .all(db)
                .await?
                .into_iter()
                .map(|s| s.id)
                .collect();
            if session_ids.is_empty() {
                return Ok(Vec::new());
            }
            query = query.filter(Column::ClassSessionId.is_in(session_ids));
        }
        query.all(db).await
    }

    /// Approves or rejects a pending justification.
    pub async fn review(
        db: &DbConn,
        id: i64,
        actor: &user::Model,
        decision: JustificationStatus,
        comment: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Model, AttendanceError> {
        if decision == JustificationStatus::Pending {
            return Err(AttendanceError::invalid("Status must be approved or rejected."));
        }

        let existing = Self::find_by_id(db, id)
            .await?
            .ok_or(AttendanceError::NotFound("Justification"))?;
        let session = class_session::Model::find_by_id(db, existing.class_session_id)
            .await?
            .ok_or(AttendanceError::NotFound("Class session"))?;
        if !actor.is_admin() && !session.is_taught_by(db, actor.id).await? {
            return Err(AttendanceError::PermissionDenied);
        }
        if existing.status != JustificationStatus::Pending {
            return Err(AttendanceError::invalid("Justification has already been reviewed."));
        }

        // Conditional on Pending so a concurrent review cannot overwrite this one
        let res = Entity::update_many()
            .set(ActiveModel {
                status: Set(decision),
                teacher_comment: Set(comment.filter(|c| !c.trim().is_empty())),
                reviewed_at: Set(Some(now)),
                reviewed_by: Set(Some(actor.id)),
                ..Default::default()
            })
            .filter(Column::Id.eq(existing.id))
            .filter(Column::Status.eq(JustificationStatus::Pending))
            .exec(db)
            .await?;
        if res.rows_affected == 0 {
            return Err(AttendanceError::invalid("Justification has already been reviewed."));
        }
        let updated = Self::find_by_id(db, existing.id)
            .await?
            .ok_or(AttendanceError::NotFound("Justification"))?;

        tracing::info!(justification_id = id, reviewer = actor.id, status = %decision, "Justification reviewed");
        Ok(updated)
    }
}
