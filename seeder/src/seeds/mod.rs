pub mod attendance;
pub mod course;
pub mod justification;
pub mod session;
pub mod user;

/// Password shared by every seeded account.
pub const DEFAULT_PASSWORD: &str = "password123";

pub const TEACHERS: [&str; 3] = ["prof.silva", "prof.santos", "prof.costa"];

pub const STUDENT_COUNT: usize = 8;

/// Flattens a domain error into the `DbErr` seeders report.
pub fn db_err(e: db::AttendanceError) -> sea_orm::DbErr {
    match e {
        db::AttendanceError::Db(e) => e,
        other => sea_orm::DbErr::Custom(other.to_string()),
    }
}
