use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Assignment of a teacher to a course.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "course_teachers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub course_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,
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
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn assign(db: &DbConn, course_id: i64, user_id: i64) -> Result<Model, DbErr> {
        ActiveModel {
            course_id: Set(course_id),
            user_id: Set(user_id),
        }
        .insert(db)
        .await
    }

    pub async fn unassign(db: &DbConn, course_id: i64, user_id: i64) -> Result<bool, DbErr> {
        let res = Entity::delete_by_id((course_id, user_id)).exec(db).await?;
        Ok(res.rows_affected > 0)
    }

    pub async fn is_teacher(db: &DbConn, user_id: i64, course_id: i64) -> Result<bool, DbErr> {
        Ok(Entity::find_by_id((course_id, user_id)).one(db).await?.is_some())
    }

    pub async fn teachers_of(db: &DbConn, course_id: i64) -> Result<Vec<super::user::Model>, DbErr> {
        super::user::Entity::find()
            .inner_join(Entity)
            .filter(Column::CourseId.eq(course_id))
            .all(db)
            .await
    }
}
