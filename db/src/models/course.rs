use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{JoinType, QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};

use super::{course_teacher, enrollment};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(unique)]
    pub code: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::class_session::Entity")]
    Sessions,
    #[sea_orm(has_many = "super::course_teacher::Entity")]
    Teachers,
    #[sea_orm(has_many = "super::enrollment::Entity")]
    Enrollments,
}

impl Related<super::class_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl Related<super::course_teacher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teachers.def()
    }
}

impl Related<super::enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DbConn,
        name: &str,
        code: &str,
        description: Option<&str>,
    ) -> Result<Model, DbErr> {
        let now = Utc::now();
        let course = ActiveModel {
            name: Set(name.to_owned()),
            code: Set(code.to_owned()),
            description: Set(description.map(str::to_owned)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        course.insert(db).await
    }

    pub async fn find_by_id(db: &DbConn, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn list(db: &DbConn) -> Result<Vec<Model>, DbErr> {
        Entity::find().order_by_asc(Column::Code).all(db).await
    }

    /// Courses `user_id` teaches.
    pub async fn taught_by(db: &DbConn, user_id: i64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .join(JoinType::InnerJoin, Relation::Teachers.def())
            .filter(course_teacher::Column::UserId.eq(user_id))
            .order_by_asc(Column::Code)
            .all(db)
            .await
    }

    /// Courses `student_id` is enrolled in.
    pub async fn enrolled_by(db: &DbConn, student_id: i64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .join(JoinType::InnerJoin, Relation::Enrollments.def())
            .filter(enrollment::Column::StudentId.eq(student_id))
            .order_by_asc(Column::Code)
            .all(db)
            .await
    }

    pub async fn update(
        db: &DbConn,
        id: i64,
        name: Option<&str>,
        code: Option<&str>,
        description: Option<&str>,
    ) -> Result<Model, DbErr> {
        let mut course = ActiveModel {
            id: Set(id),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        if let Some(name) = name {
            course.name = Set(name.to_owned());
        }
        if let Some(code) = code {
            course.code = Set(code.to_owned());
        }
        if let Some(description) = description {
            course.description = Set(Some(description.to_owned()));
        }
        course.update(db).await
    }

    pub async fn delete(db: &DbConn, id: i64) -> Result<bool, DbErr> {
        let res = Entity::delete_by_id(id).exec(db).await?;
        Ok(res.rows_affected > 0)
    }
}
