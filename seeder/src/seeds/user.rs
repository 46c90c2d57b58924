use crate::seed::Seeder;
use crate::seeds::{DEFAULT_PASSWORD, STUDENT_COUNT, TEACHERS};
use db::models::user::{Model, Role};
use fake::{Fake, faker::internet::en::SafeEmail};
use sea_orm::{DatabaseConnection, DbErr};

pub struct UserSeeder;

async fn ensure(
    db: &DatabaseConnection,
    username: &str,
    email: &str,
    role: Role,
) -> Result<Model, DbErr> {
    match Model::find_by_username(db, username).await? {
        Some(user) => Ok(user),
        None => Model::create(db, username, email, DEFAULT_PASSWORD, role).await,
    }
}

#[async_trait::async_trait]
impl Seeder for UserSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        ensure(db, "admin", "admin@school.edu", Role::Admin).await?;

        for username in TEACHERS {
            let email = format!("{}@school.edu", username.trim_start_matches("prof."));
            ensure(db, username, &email, Role::Teacher).await?;
        }

        for n in 1..=STUDENT_COUNT {
            let username = format!("student{n}");
            // Local part from faker, suffixed so reruns never collide
            let fake_email: String = SafeEmail().fake();
            let local = fake_email.split('@').next().unwrap_or("student");
            let email = format!("{local}.{n}@school.edu");
            ensure(db, &username, &email, Role::Student).await?;
        }

        Ok(())
    }
}
