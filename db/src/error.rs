//! Domain failures raised by model operations.
//!
//! Each variant's `Display` text is the message shown to API clients.

use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AttendanceError {
    #[error("Attendance code is required.")]
    CodeRequired,

    #[error("Invalid attendance code.")]
    InvalidCode,

    #[error("Attendance code has expired.")]
    CodeExpired,

    #[error("You are not enrolled in this course.")]
    NotEnrolled,

    #[error("Cannot generate code for past or non-today class.")]
    SessionNotToday,

    #[error("Permission denied.")]
    PermissionDenied,

    #[error("{0} not found.")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    Db(#[from] DbErr),
}

impl AttendanceError {
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// True when `err` is a violated UNIQUE constraint.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(sea_orm::SqlErr::UniqueConstraintViolation(_)))
}
