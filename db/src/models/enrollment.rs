use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::QueryOrder;
use serde::Serialize;

/// A student's enrollment in a course. Grants submission eligibility.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "enrollments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub student_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub course_id: i64,
    pub enrolled_at: DateTime<Utc>,
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
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id",
        on_delete = "Cascade"
    )]
    Course,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn enroll(db: &DbConn, student_id: i64, course_id: i64) -> Result<Model, DbErr> {
        ActiveModel {
            student_id: Set(student_id),
            course_id: Set(course_id),
            enrolled_at: Set(Utc::now()),
        }
        .insert(db)
        .await
    }

    pub async fn unenroll(db: &DbConn, student_id: i64, course_id: i64) -> Result<bool, DbErr> {
        let res = Entity::delete_by_id((student_id, course_id)).exec(db).await?;
        Ok(res.rows_affected > 0)
    }

    pub async fn is_enrolled(db: &DbConn, student_id: i64, course_id: i64) -> Result<bool, DbErr> {
        Ok(Entity::find_by_id((student_id, course_id))
            .one(db)
            .await?
            .is_some())
    }

    /// Students enrolled in `course_id`, ordered by username.
    pub async fn students_of(
        db: &DbConn,
        course_id: i64,
    ) -> Result<Vec<super::user::Model>, DbErr> {
        super::user::Entity::find()
            .inner_join(Entity)
            .filter(Column::CourseId.eq(course_id))
            .order_by_asc(super::user::Column::Username)
            .all(db)
            .await
    }
}
