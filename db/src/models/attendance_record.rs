//! Student attendance submissions.
//!
//! A record is created unvalidated (`is_present = false`) when a student
//! submits a live code. The only later transitions are the teacher's fraud
//! screening and validation, which flips `is_present` to true.

use chrono::{DateTime, Utc};
use rand::Rng;
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::QueryOrder;
use serde::{Deserialize, Serialize};

use super::{attendance_code, class_session, enrollment, user};
use crate::error::{AttendanceError, is_unique_violation};
use crate::fraud::{self, FraudPolicy};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "attendance_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub class_session_id: i64,
    pub student_id: i64,
    pub submitted_at: DateTime<Utc>,
    pub is_present: bool,
    pub simulated_ip: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_fraudulent: Option<bool>,
    pub fraud_explanation: Option<String>,
    pub fraud_checked_at: Option<DateTime<Utc>>,
    pub validated_by: Option<i64>,
    pub validated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::class_session::Entity",
        from = "Column::ClassSessionId",
        to = "super::class_session::Column::Id",
        on_delete = "Cascade"
    )]
    Session,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::StudentId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Student,
}

impl Related<super::class_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// A device position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geolocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl Geolocation {
    /// Builds a location only when both parts are present and finite.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) if latitude.is_finite() && longitude.is_finite() => {
                Some(Self {
                    latitude,
                    longitude,
                })
            }
            _ => None,
        }
    }
}

/// Outcome of a fraud screening.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FraudCheck {
    pub is_fraudulent: bool,
    pub explanation: String,
}

/// Simulated device data sent along with a code.
#[derive(Debug, Clone, Default)]
pub struct Telemetry {
    pub simulated_ip: Option<String>,
    pub geolocation: Option<Geolocation>,
}

#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    Recorded(Model),
    /// The student already has a record for this session; nothing was written.
    AlreadySubmitted(Model),
}

impl Model {
    pub fn geolocation(&self) -> Option<Geolocation> {
        Geolocation::from_parts(self.latitude, self.longitude)
    }

    pub fn fraud_check(&self) -> Option<FraudCheck> {
        self.is_fraudulent.map(|is_fraudulent| FraudCheck {
            is_fraudulent,
            explanation: self.fraud_explanation.clone().unwrap_or_default(),
        })
    }

    pub fn is_validated(&self) -> bool {
        self.validated_at.is_some()
    }

    pub async fn find_by_id(db: &DbConn, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn find_for(
        db: &DbConn,
        session_id: i64,
        student_id: i64,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::ClassSessionId.eq(session_id))
            .filter(Column::StudentId.eq(student_id))
            .one(db)
            .await
    }

    /// Records of a session with their students, earliest submission first.
    pub async fn for_session(
        db: &DbConn,
        session_id: i64,
    ) -> Result<Vec<(Model, Option<user::Model>)>, DbErr> {
        Entity::find()
            .filter(Column::ClassSessionId.eq(session_id))
            .order_by_asc(Column::SubmittedAt)
            .find_also_related(user::Entity)
            .all(db)
            .await
    }

    pub async fn for_student(db: &DbConn, student_id: i64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .all(db)
            .await
    }

    /// Submits `raw_code` for `student_id`.
    ///
    /// Checks run in order: blank code, unknown code, expired code, enrollment,
    /// existing record. A concurrent duplicate that trips the unique index is
    /// reported the same way as a sequential one.
    pub async fn submit(
        db: &DbConn,
        student_id: i64,
        raw_code: &str,
        telemetry: Telemetry,
        now: DateTime<Utc>,
    ) -> Result<SubmitOutcome, AttendanceError> {
        let code = attendance_code::normalize(raw_code);
        if code.is_empty() {
            return Err(AttendanceError::CodeRequired);
        }

        let attendance_code = attendance_code::Model::find_by_code(db, &code)
            .await?
            .ok_or(AttendanceError::InvalidCode)?;
        if !attendance_code.is_valid_at(now) {
            return Err(AttendanceError::CodeExpired);
        }

        let session = class_session::Model::find_by_id(db, attendance_code.class_session_id)
            .await?
            .ok_or(AttendanceError::InvalidCode)?;
        if !enrollment::Model::is_enrolled(db, student_id, session.course_id).await? {
            return Err(AttendanceError::NotEnrolled);
        }

        if let Some(existing) = Self::find_for(db, session.id, student_id).await? {
            return Ok(SubmitOutcome::AlreadySubmitted(existing));
        }

        let geo = telemetry.geolocation;
        let record = ActiveModel {
            class_session_id: Set(session.id),
            student_id: Set(student_id),
            submitted_at: Set(now),
            is_present: Set(false),
            simulated_ip: Set(telemetry.simulated_ip),
            latitude: Set(geo.map(|g| g.latitude)),
            longitude: Set(geo.map(|g| g.longitude)),
            ..Default::default()
        };

        Self::insert_or_existing(db, record, session.id, student_id).await
    }

    /// Inserts `record`, folding a lost race on the (session, student) index
    /// into `AlreadySubmitted` with the row that won.
    async fn insert_or_existing(
        db: &DbConn,
        record: ActiveModel,
        session_id: i64,
        student_id: i64,
    ) -> Result<SubmitOutcome, AttendanceError> {
        match record.insert(db).await {
            Ok(model) => Ok(SubmitOutcome::Recorded(model)),
            Err(e) if is_unique_violation(&e) => {
                let existing = Self::find_for(db, session_id, student_id)
                    .await?
                    .ok_or(AttendanceError::Db(e))?;
                Ok(SubmitOutcome::AlreadySubmitted(existing))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Loads the record and its session, requiring `actor` to teach the course.
    async fn load_for_teacher(
        db: &DbConn,
        record_id: i64,
        actor: &user::Model,
    ) -> Result<(Model, class_session::Model), AttendanceError> {
        let record = Self::find_by_id(db, record_id)
            .await?
            .ok_or(AttendanceError::NotFound("Attendance record"))?;
        let session = class_session::Model::find_by_id(db, record.class_session_id)
            .await?
            .ok_or(AttendanceError::NotFound("Class session"))?;
        if !actor.is_admin() && !session.is_taught_by(db, actor.id).await? {
            return Err(AttendanceError::PermissionDenied);
        }
        Ok((record, session))
    }

    /// Runs the fraud heuristic on a record of `session_id` and stores the result.
    pub async fn run_fraud_check<R: Rng + Send>(
        db: &DbConn,
        session_id: i64,
        record_id: i64,
        actor: &user::Model,
        rng: &mut R,
        policy: &FraudPolicy,
        now: DateTime<Utc>,
    ) -> Result<(Model, FraudCheck), AttendanceError> {
        let (record, _) = Self::load_for_teacher(db, record_id, actor).await?;
        if record.class_session_id != session_id {
            return Err(AttendanceError::NotFound("Attendance record"));
        }

        let check = fraud::assess(rng, record.geolocation().as_ref(), policy);
        let updated = ActiveModel {
            id: Set(record.id),
            is_fraudulent: Set(Some(check.is_fraudulent)),
            fraud_explanation: Set(Some(check.explanation.clone())),
            fraud_checked_at: Set(Some(now)),
            ..Default::default()
        }
        .update(db)
        .await?;

        tracing::info!(
            record_id,
            flagged = check.is_fraudulent,
            explanation = %check.explanation,
            "Fraud check completed"
        );
        Ok((updated, check))
    }

    /// Marks the record present. Validating twice keeps the first validator.
    pub async fn validate(
        db: &DbConn,
        record_id: i64,
        actor: &user::Model,
        now: DateTime<Utc>,
    ) -> Result<(Model, class_session::Model), AttendanceError> {
        let (record, session) = Self::load_for_teacher(db, record_id, actor).await?;
        if record.is_present {
            return Ok((record, session));
        }

        let updated = ActiveModel {
            id: Set(record.id),
            is_present: Set(true),
            validated_by: Set(Some(actor.id)),
            validated_at: Set(Some(now)),
            ..Default::default()
        }
        .update(db)
        .await?;

        tracing::info!(record_id, validator = actor.id, "Attendance validated");
        Ok((updated, session))
    }
}
