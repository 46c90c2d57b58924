use colored::*;
use futures::FutureExt;
use sea_orm::DatabaseConnection;
use sea_orm_migration::prelude::*;
use std::io::{self, Write};
use std::time::Instant;

const STATUS_COLUMN: usize = 80;

/// Applies every migration in order, printing one status line per step.
///
/// Each step is idempotent (`IF NOT EXISTS`), so rerunning against an
/// existing database only reports `done` for the tables already present.
pub async fn run_all_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    println!("Running migrations...");
    let schema_manager = SchemaManager::new(db);

    for migration in <migration::Migrator as MigratorTrait>::migrations() {
        run_migration(&schema_manager, migration).await?;
    }
    Ok(())
}

async fn run_migration(
    schema_manager: &SchemaManager<'_>,
    migration: Box<dyn MigrationTrait>,
) -> Result<(), DbErr> {
    let name_str = format!("Applying {}", migration.name().bold());
    let dots = ".".repeat(STATUS_COLUMN.saturating_sub(name_str.len()));
    print!("{}{} ", name_str, dots);
    let _ = io::stdout().flush();

    let start = Instant::now();
    let result = std::panic::AssertUnwindSafe(migration.up(schema_manager))
        .catch_unwind()
        .await;

    match result {
        Ok(Ok(())) => {
            let time_str = format!("({:.2?})", start.elapsed()).dimmed();
            println!("{} {}", "done".green(), time_str);
            Ok(())
        }
        Ok(Err(e)) => {
            println!("{}", "failed".red());
            Err(e)
        }
        Err(_) => {
            println!("{}", "panicked".red());
            Err(DbErr::Migration(format!(
                "migration {} panicked",
                migration.name()
            )))
        }
    }
}
