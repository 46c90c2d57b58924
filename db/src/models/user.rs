use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::rngs::OsRng;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, Set};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Global role of an account. Gates which handlers a request may reach.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Deserialize, Serialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role_type")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    #[sea_orm(string_value = "student")]
    Student,

    #[sea_orm(string_value = "teacher")]
    Teacher,

    #[sea_orm(string_value = "admin")]
    Admin,
}

/// Represents a user in the `users` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    /// Argon2 PHC string. Never serialized.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::enrollment::Entity")]
    Enrollments,
    #[sea_orm(has_many = "super::course_teacher::Entity")]
    Teaching,
    #[sea_orm(has_many = "super::attendance_record::Entity")]
    AttendanceRecords,
}

impl Related<super::enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl Related<super::course_teacher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teaching.def()
    }
}

impl Related<super::attendance_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttendanceRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Hashes `password` with Argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, DbErr> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DbErr::Custom(format!("password hashing failed: {e}")))
}

impl Model {
    pub async fn create(
        db: &DbConn,
        username: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<Model, DbErr> {
        let now = Utc::now();
        let user = ActiveModel {
            username: Set(username.to_owned()),
            email: Set(email.to_owned()),
            password_hash: Set(hash_password(password)?),
            role: Set(role),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        user.insert(db).await
    }

    pub fn verify_password(&self, password: &str) -> bool {
        match PasswordHash::new(&self.password_hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub async fn find_by_id(db: &DbConn, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn find_by_username(db: &DbConn, username: &str) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::Username.eq(username))
            .one(db)
            .await
    }

    /// Lists users ordered by username, optionally restricted to one role.
    pub async fn list(db: &DbConn, role: Option<Role>) -> Result<Vec<Model>, DbErr> {
        let mut query = Entity::find().order_by_asc(Column::Username);
        if let Some(role) = role {
            query = query.filter(Column::Role.eq(role));
        }
        query.all(db).await
    }

    pub async fn update(
        db: &DbConn,
        id: i64,
        email: Option<&str>,
        password: Option<&str>,
        role: Option<Role>,
    ) -> Result<Model, DbErr> {
        let mut user = ActiveModel {
            id: Set(id),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        if let Some(email) = email {
            user.email = Set(email.to_owned());
        }
        if let Some(password) = password {
            user.password_hash = Set(hash_password(password)?);
        }
        if let Some(role) = role {
            user.role = Set(role);
        }
        user.update(db).await
    }

    pub async fn delete(db: &DbConn, id: i64) -> Result<bool, DbErr> {
        let res = Entity::delete_by_id(id).exec(db).await?;
        Ok(res.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_create_and_verify_password() {
        let db = setup_test_db().await;

        let user = Model::create(&db, "prof.silva", "silva@school.edu", "password123", Role::Teacher)
            .await
            .expect("Failed to create user");

        assert_eq!(user.role, Role::Teacher);
        assert_ne!(user.password_hash, "password123");
        assert!(user.verify_password("password123"));
        assert!(!user.verify_password("wrong"));

        let found = Model::find_by_username(&db, "prof.silva").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));
    }

    #[tokio::test]
    async fn test_username_is_unique() {
        let db = setup_test_db().await;
        Model::create(&db, "student1", "s1@school.edu", "pw", Role::Student)
            .await
            .unwrap();
        let dup = Model::create(&db, "student1", "other@school.edu", "pw", Role::Student).await;
        assert!(dup.is_err());
    }

    #[tokio::test]
    async fn test_list_filters_by_role_and_update_changes_role() {
        let db = setup_test_db().await;
        let s = Model::create(&db, "student1", "s1@school.edu", "pw", Role::Student)
            .await
            .unwrap();
        Model::create(&db, "prof.santos", "santos@school.edu", "pw", Role::Teacher)
            .await
            .unwrap();

        let students = Model::list(&db, Some(Role::Student)).await.unwrap();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].username, "student1");

        let promoted = Model::update(&db, s.id, None, None, Some(Role::Teacher))
            .await
            .unwrap();
        assert_eq!(promoted.role, Role::Teacher);
        assert_eq!(Model::list(&db, Some(Role::Student)).await.unwrap().len(), 0);
    }

    #[test]
    fn test_role_parses_case_insensitively() {
        use std::str::FromStr;
        assert_eq!(Role::from_str("Teacher").unwrap(), Role::Teacher);
        assert_eq!(Role::Admin.to_string(), "admin");
    }
}
