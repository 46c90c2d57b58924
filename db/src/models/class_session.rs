use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::QueryOrder;
use serde::{Deserialize, Serialize};

use super::{course, course_teacher, enrollment};
use crate::error::AttendanceError;

/// One scheduled meeting of a course, in campus local date/time.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "class_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id",
        on_delete = "Cascade"
    )]
    Course,
    #[sea_orm(has_one = "super::attendance_code::Entity")]
    Code,
    #[sea_orm(has_many = "super::attendance_record::Entity")]
    Records,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::attendance_code::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Code.def()
    }
}

impl Related<super::attendance_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Records.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// A session together with its course.
pub type SessionWithCourse = (Model, Option<course::Model>);

fn check_times(start_time: NaiveTime, end_time: NaiveTime) -> Result<(), AttendanceError> {
    if end_time <= start_time {
        return Err(AttendanceError::invalid("End time must be after start time."));
    }
    Ok(())
}

impl Model {
    pub async fn create(
        db: &DbConn,
        course_id: i64,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<Model, AttendanceError> {
        check_times(start_time, end_time)?;
        let session = ActiveModel {
            course_id: Set(course_id),
            date: Set(date),
            start_time: Set(start_time),
            end_time: Set(end_time),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        session.insert(db).await.map_err(|e| {
            if crate::error::is_unique_violation(&e) {
                AttendanceError::conflict("A session already starts at that time for this course.")
            } else {
                e.into()
            }
        })
    }

    pub async fn update(
        db: &DbConn,
        existing: &Model,
        date: Option<NaiveDate>,
        start_time: Option<NaiveTime>,
        end_time: Option<NaiveTime>,
    ) -> Result<Model, AttendanceError> {
        let start = start_time.unwrap_or(existing.start_time);
        let end = end_time.unwrap_or(existing.end_time);
        check_times(start, end)?;

        let session = ActiveModel {
            id: Set(existing.id),
            date: Set(date.unwrap_or(existing.date)),
            start_time: Set(start),
            end_time: Set(end),
            ..Default::default()
        };
        session.update(db).await.map_err(|e| {
            if crate::error::is_unique_violation(&e) {
                AttendanceError::conflict("A session already starts at that time for this course.")
            } else {
                e.into()
            }
        })
    }

    pub async fn delete(db: &DbConn, id: i64) -> Result<bool, DbErr> {
        let res = Entity::delete_by_id(id).exec(db).await?;
        Ok(res.rows_affected > 0)
    }

    pub async fn find_by_id(db: &DbConn, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn for_course(db: &DbConn, course_id: i64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::CourseId.eq(course_id))
            .order_by_asc(Column::Date)
            .order_by_asc(Column::StartTime)
            .all(db)
            .await
    }

    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.start_time)
    }

    pub fn ends_at(&self) -> NaiveDateTime {
        self.date.and_time(self.end_time)
    }

    /// `now` lies within `[start, end]`.
    pub fn is_ongoing_at(&self, now: NaiveDateTime) -> bool {
        self.starts_at() <= now && now <= self.ends_at()
    }

    pub fn has_ended_at(&self, now: NaiveDateTime) -> bool {
        self.ends_at() < now
    }

    /// A code may be issued only on the session's own day, before it ends.
    pub fn accepts_code_generation_at(&self, now: NaiveDateTime) -> bool {
        self.date == now.date() && self.end_time >= now.time()
    }

    /// Whether `user_id` teaches the course this session belongs to.
    pub async fn is_taught_by(&self, db: &DbConn, user_id: i64) -> Result<bool, DbErr> {
        course_teacher::Model::is_teacher(db, user_id, self.course_id).await
    }

    async fn with_courses(
        db: &DbConn,
        course_ids: Vec<i64>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<SessionWithCourse>, DbErr> {
        if course_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut query = Entity::find().filter(Column::CourseId.is_in(course_ids));
        if let Some(from) = from {
            query = query.filter(Column::Date.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(Column::Date.lte(to));
        }
        query
            .order_by_asc(Column::Date)
            .order_by_asc(Column::StartTime)
            .find_also_related(course::Entity)
            .all(db)
            .await
    }

    /// Sessions of courses `teacher_id` teaches, dated within `[from, to]`.
    pub async fn taught_between(
        db: &DbConn,
        teacher_id: i64,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<SessionWithCourse>, DbErr> {
        let ids = course_teacher::Entity::find()
            .filter(course_teacher::Column::UserId.eq(teacher_id))
            .all(db)
            .await?
            .into_iter()
            .map(|ct| ct.course_id)
            .collect();
        Self::with_courses(db, ids, from, to).await
    }

    /// Sessions of courses `student_id` is enrolled in, dated within `[from, to]`.
    pub async fn enrolled_between(
        db: &DbConn,
        student_id: i64,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<SessionWithCourse>, DbErr> {
        let ids = enrollment::Entity::find()
            .filter(enrollment::Column::StudentId.eq(student_id))
            .all(db)
            .await?
            .into_iter()
            .map(|e| e.course_id)
            .collect();
        Self::with_courses(db, ids, from, to).await
    }
}
