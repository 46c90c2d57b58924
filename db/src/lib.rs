pub mod error;
pub mod fraud;
pub mod models;
pub mod reports;
pub mod test_utils;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::path::Path;
use util::config;

pub use error::AttendanceError;

/// Connects to the configured database.
///
/// `DATABASE_PATH` may be a full `sqlite:` DSN or a plain file path; for the
/// latter the parent directory is created and the file is opened in
/// read-write-create mode.
pub async fn connect() -> Result<DatabaseConnection, DbErr> {
    let path_or_url = config::database_path();
    let url = if path_or_url.starts_with("sqlite:") {
        path_or_url
    } else {
        if let Some(parent) = Path::new(&path_or_url).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DbErr::Custom(format!("cannot create {}: {e}", parent.display())))?;
            }
        }
        format!("sqlite://{path_or_url}?mode=rwc")
    };

    let mut opts = ConnectOptions::new(url);
    opts.sqlx_logging(false);
    Database::connect(opts).await
}
