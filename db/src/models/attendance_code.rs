//! Short-lived attendance codes.
//!
//! A session owns at most one code. Regenerating replaces the previous row in
//! the same transaction, so an old code stops resolving the moment a new one
//! exists. Expiry is checked lazily at read time.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use rand::Rng;
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, TransactionTrait};
use serde::{Deserialize, Serialize};

use super::{class_session, user};
use crate::error::{AttendanceError, is_unique_violation};

pub const CODE_LENGTH: usize = 6;
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const MAX_GENERATE_ATTEMPTS: usize = 8;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "attendance_codes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub class_session_id: i64,
    #[sea_orm(unique)]
    pub code: String,
    pub generated_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
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
}

impl Related<super::class_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeStatus {
    Active,
    Expired,
    /// No code exists.
    Inactive,
}

/// Draws a code of [`CODE_LENGTH`] characters from `A-Z0-9`.
pub fn random_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Trims surrounding whitespace and upper-cases user input.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// The teacher's most relevant code today.
#[derive(Debug, Clone)]
pub struct CurrentCode {
    pub status: CodeStatus,
    pub code: Option<Model>,
    pub session: Option<class_session::SessionWithCourse>,
}

impl Model {
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    pub fn status_at(&self, now: DateTime<Utc>) -> CodeStatus {
        if self.is_valid_at(now) {
            CodeStatus::Active
        } else {
            CodeStatus::Expired
        }
    }

    /// Whole seconds until expiry, floored at zero.
    pub fn seconds_remaining(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds().max(0)
    }

    pub async fn find_by_code(db: &DbConn, code: &str) -> Result<Option<Model>, DbErr> {
        Entity::find().filter(Column::Code.eq(code)).one(db).await
    }

    pub async fn find_for_session(db: &DbConn, session_id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::ClassSessionId.eq(session_id))
            .one(db)
            .await
    }

    /// Replaces any code of `session_id` with a fresh one valid for `ttl`.
    ///
    /// A collision on the code value is retried with a new draw.
    pub async fn generate(
        db: &DbConn,
        session_id: i64,
        generated_by: Option<i64>,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Model, DbErr> {
        for attempt in 1..=MAX_GENERATE_ATTEMPTS {
            let code = random_code(&mut rand::thread_rng());

            let txn = db.begin().await?;
            Entity::delete_many()
                .filter(Column::ClassSessionId.eq(session_id))
                .exec(&txn)
                .await?;

            let inserted = ActiveModel {
                class_session_id: Set(session_id),
                code: Set(code),
                generated_by: Set(generated_by),
                created_at: Set(now),
                expires_at: Set(now + ttl),
                ..Default::default()
            }
            .insert(&txn)
            .await;

            match inserted {
                Ok(model) => {
                    txn.commit().await?;
                    return Ok(model);
                }
                Err(e) if is_unique_violation(&e) => {
                    txn.rollback().await?;
                    tracing::debug!(session_id, attempt, "Attendance code collision, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(DbErr::Custom(format!(
            "could not draw a unique attendance code after {MAX_GENERATE_ATTEMPTS} attempts"
        )))
    }

    /// Issues a code on behalf of `actor`.
    ///
    /// The actor must teach the session's course (admins may issue for any
    /// course) and the session must be today and not yet over in local time.
    pub async fn issue(
        db: &DbConn,
        session_id: i64,
        actor: &user::Model,
        now: DateTime<Utc>,
        local_now: NaiveDateTime,
        ttl: Duration,
    ) -> Result<(Model, class_session::Model), AttendanceError> {
        let session = class_session::Model::find_by_id(db, session_id)
            .await?
            .ok_or(AttendanceError::NotFound("Class session"))?;

        if !actor.is_admin() && !session.is_taught_by(db, actor.id).await? {
            return Err(AttendanceError::PermissionDenied);
        }
        if !session.accepts_code_generation_at(local_now) {
            return Err(AttendanceError::SessionNotToday);
        }

        let code = Self::generate(db, session.id, Some(actor.id), now, ttl).await?;
        tracing::info!(
            session_id = session.id,
            teacher_id = actor.id,
            expires_at = %code.expires_at,
            "Attendance code generated"
        );
        Ok((code, session))
    }

    /// Among the teacher's sessions today, latest start first: the first with
    /// an active code, else the latest with an expired code, else inactive.
    pub async fn current_for_teacher(
        db: &DbConn,
        teacher_id: i64,
        now: DateTime<Utc>,
        local_now: NaiveDateTime,
    ) -> Result<CurrentCode, DbErr> {
        let today = local_now.date();
        let mut sessions =
            class_session::Model::taught_between(db, teacher_id, Some(today), Some(today)).await?;
        sessions.sort_by(|a, b| b.0.start_time.cmp(&a.0.start_time));

        let ids: Vec<i64> = sessions.iter().map(|(s, _)| s.id).collect();
        let codes = if ids.is_empty() {
            Vec::new()
        } else {
            Entity::find()
                .filter(Column::ClassSessionId.is_in(ids))
                .order_by_desc(Column::CreatedAt)
                .all(db)
                .await?
        };

        let mut expired: Option<(Model, class_session::SessionWithCourse)> = None;
        for session in sessions {
            let Some(code) = codes.iter().find(|c| c.class_session_id == session.0.id) else {
                continue;
            };
            if code.is_valid_at(now) {
                return Ok(CurrentCode {
                    status: CodeStatus::Active,
                    code: Some(code.clone()),
                    session: Some(session),
                });
            }
            if expired.is_none() {
                expired = Some((code.clone(), session));
            }
        }

        Ok(match expired {
            Some((code, session)) => CurrentCode {
                status: CodeStatus::Expired,
                code: Some(code),
                session: Some(session),
            },
            None => CurrentCode {
                status: CodeStatus::Inactive,
                code: None,
                session: None,
            },
        })
    }
}
