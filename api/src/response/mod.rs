//! JSON envelope shared by every endpoint, plus the mapping from domain
//! failures to HTTP status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::AttendanceError;
use sea_orm::DbErr;
use serde::Serialize;

/// Standardized API response wrapper for all outgoing JSON responses.
///
/// ```json
/// { "success": true, "data": { ... }, "message": "Some message" }
/// ```
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: T,
    pub message: String,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
        }
    }

    /// Constructs an error response with a message and default `data`.
    pub fn error(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            data: T::default(),
            message: message.into(),
        }
    }
}

/// Serializes as `{}`.
#[derive(Serialize, Default)]
pub struct Empty {}

/// Handler success shape.
pub type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

pub fn ok<T: Serialize>(data: T, message: impl Into<String>) -> ApiResult<T> {
    Ok((StatusCode::OK, Json(ApiResponse::success(data, message))))
}

pub fn created<T: Serialize>(data: T, message: impl Into<String>) -> ApiResult<T> {
    Ok((StatusCode::CREATED, Json(ApiResponse::success(data, message))))
}

/// An error rendered as `ApiResponse<Empty>` with `success = false`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiResponse::<Empty>::error(self.message))).into_response()
    }
}

pub fn status_for(err: &AttendanceError) -> StatusCode {
    match err {
        AttendanceError::CodeRequired
        | AttendanceError::InvalidCode
        | AttendanceError::CodeExpired
        | AttendanceError::SessionNotToday
        | AttendanceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        AttendanceError::NotEnrolled | AttendanceError::PermissionDenied => StatusCode::FORBIDDEN,
        AttendanceError::NotFound(_) => StatusCode::NOT_FOUND,
        AttendanceError::Conflict(_) => StatusCode::CONFLICT,
        AttendanceError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<AttendanceError> for ApiError {
    fn from(err: AttendanceError) -> Self {
        match err {
            AttendanceError::Db(db_err) => db_err.into(),
            other => Self::new(status_for(&other), other.to_string()),
        }
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        tracing::error!(error = %err, "Database error");
        Self::internal("An internal database error occurred")
    }
}
