use migration::Migrator;
use sea_orm::{Database, DatabaseConnection};
use std::path::Path;
use sea_orm_migration::MigratorTrait;

/// Fresh in-memory database with every migration applied.
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory db");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Migrated database in a file at `path`, for tests that need several
/// pooled connections writing at once.
pub async fn setup_file_test_db(path: &Path) -> DatabaseConnection {
    let db = Database::connect(format!("sqlite://{}?mode=rwc", path.display()))
        .await
        .expect("Failed to open file-backed db");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}
