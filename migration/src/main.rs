use sea_orm::Database;
use std::{fs, path::Path, process};
use util::config;

mod runner;

#[tokio::main]
async fn main() {
    let db_path = config::database_path();
    let url = format!("sqlite://{}?mode=rwc", db_path);
    let command = std::env::args().nth(1);

    let result = match command.as_deref() {
        Some("clean") => remove_db_file(&db_path),
        Some("fresh") => match remove_db_file(&db_path) {
            Ok(()) => migrate(&db_path, &url).await,
            Err(e) => Err(e),
        },
        Some("up") | None => migrate(&db_path, &url).await,
        Some(other) => Err(format!("unknown command '{other}' (expected up, fresh or clean)")),
    };

    if let Err(e) = result {
        eprintln!("migration: {e}");
        process::exit(1);
    }
}

async fn migrate(db_path: &str, url: &str) -> Result<(), String> {
    create_db_dir(db_path)?;
    let db = Database::connect(url)
        .await
        .map_err(|e| format!("DB connection failed: {e}"))?;
    runner::run_all_migrations(&db)
        .await
        .map_err(|e| e.to_string())
}

fn remove_db_file(path: &str) -> Result<(), String> {
    let db_path = Path::new(path);
    if db_path.exists() {
        fs::remove_file(db_path).map_err(|e| format!("Failed to delete DB file: {e}"))?;
        println!("Deleted DB: {}", db_path.display());
    } else {
        println!("DB file does not exist: {}", db_path.display());
    }
    Ok(())
}

fn create_db_dir(path: &str) -> Result<(), String> {
    match Path::new(path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create DB directory: {e}")),
        _ => Ok(()),
    }
}
