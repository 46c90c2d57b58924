use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{Duration, Utc};
use db::fraud::FraudPolicy;
use db::models::attendance_code;
use db::models::attendance_record::{self, FraudCheck, Geolocation, SubmitOutcome, Telemetry};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use util::{config, state::AppState, time};

use super::common::{CodeResponse, PeerIp};
use crate::auth::AuthUser;
use crate::response::{ApiResponse, ApiResult, created, ok};
use crate::routes::common::current_user;
use crate::ws::notifications::emit;
use crate::ws::notifications::payload::{AttendanceValidated, CodeGenerated, StudentSubmitted};

#[derive(Debug, Deserialize)]
pub struct GenerateCodeRequest {
    pub class_session_id: i64,
}

/// POST /api/attendance/codes
///
/// Replaces the session's code with a fresh one valid for `CODE_TTL_MINUTES`.
/// The teacher's general notification group is told about the new code.
///
/// ### Responses
/// - `201 Created` with the code
/// - `400 Bad Request` if the session is not today or has already ended
/// - `403 Forbidden` unless a teacher of the course or an admin
/// - `404 Not Found`
pub async fn generate_code(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<GenerateCodeRequest>,
) -> ApiResult<CodeResponse> {
    let db = state.db();
    let actor = current_user(db, &claims).await?;
    let now = Utc::now();
    let ttl = Duration::minutes(config::code_ttl_minutes());

    let (code, session) = attendance_code::Model::issue(
        db,
        req.class_session_id,
        &actor,
        now,
        time::to_local(now),
        ttl,
    )
    .await?;

    let course_code = db::models::course::Model::find_by_id(db, session.course_id)
        .await?
        .map(|c| c.code)
        .unwrap_or_default();
    emit::code_generated(
        state.ws(),
        actor.id,
        CodeGenerated {
            class_session_id: session.id,
            course_code,
            code: code.code.clone(),
            expires_at: code.expires_at,
        },
    )
    .await;

    created(CodeResponse::at(code, now), "Attendance code generated successfully")
}

#[derive(Debug, Deserialize)]
pub struct SubmitCodeRequest {
    #[serde(default, alias = "attendance_code")]
    pub code: String,
    pub simulated_ip: Option<String>,
    #[serde(alias = "simulated_latitude")]
    pub latitude: Option<f64>,
    #[serde(alias = "simulated_longitude")]
    pub longitude: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    /// `success` for a new record, `info` when one already existed.
    pub status: &'static str,
    pub record: attendance_record::Model,
}

/// POST /api/attendance/submit
///
/// A student submits a code with simulated device telemetry. `simulated_ip`
/// is stored as sent; without one the peer address is recorded.
///
/// ### Request Body
/// ```json
/// { "code": "AB12CD", "simulated_ip": "192.168.1.20", "latitude": 41.5369, "longitude": -8.4239 }
/// ```
///
/// ### Responses
/// - `201 Created` with `status = "success"`
/// - `200 OK` with `status = "info"` if the student already submitted for the class
/// - `400 Bad Request` for a blank, unknown or expired code
/// - `403 Forbidden` if the student is not enrolled in the course
pub async fn submit_code(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    PeerIp(peer): PeerIp,
    Json(req): Json<SubmitCodeRequest>,
) -> ApiResult<SubmitResponse> {
    let db = state.db();
    let student = current_user(db, &claims).await?;

    // Simulated telemetry is stored as sent; only the code gates the request
    let simulated_ip = match req.simulated_ip.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => Some(raw.to_owned()),
        _ => peer.map(|ip| ip.to_string()),
    };
    let telemetry = Telemetry {
        simulated_ip,
        geolocation: Geolocation::from_parts(req.latitude, req.longitude),
    };

    let now = Utc::now();
    match attendance_record::Model::submit(db, student.id, &req.code, telemetry, now).await? {
        SubmitOutcome::Recorded(record) => {
            emit::student_submitted(
                state.ws(),
                StudentSubmitted {
                    class_session_id: record.class_session_id,
                    record_id: record.id,
                    student_id: student.id,
                    student_username: student.username,
                    submitted_at: record.submitted_at,
                },
            )
            .await;
            created(
                SubmitResponse {
                    status: "success",
                    record,
                },
                "Attendance submitted successfully! Waiting for teacher validation.",
            )
        }
        SubmitOutcome::AlreadySubmitted(record) => Ok((
            StatusCode::OK,
            Json(ApiResponse::success(
                SubmitResponse {
                    status: "info",
                    record,
                },
                "You have already submitted attendance for this class.",
            )),
        )),
    }
}

#[derive(Debug, Serialize)]
pub struct FraudCheckResponse {
    pub record: attendance_record::Model,
    pub fraud_check: FraudCheck,
}

/// POST /api/attendance/sessions/{session_id}/records/{record_id}/fraud-check
///
/// Runs the simulated fraud heuristic on one record and stores the verdict.
///
/// ### Responses
/// - `200 OK` with the record and the verdict
/// - `403 Forbidden` unless a teacher of the course or an admin
/// - `404 Not Found` for an unknown record or one of another session
pub async fn fraud_check(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path((session_id, record_id)): Path<(i64, i64)>,
) -> ApiResult<FraudCheckResponse> {
    let db = state.db();
    let actor = current_user(db, &claims).await?;
    let mut rng = StdRng::from_entropy();

    let (record, check) = attendance_record::Model::run_fraud_check(
        db,
        session_id,
        record_id,
        &actor,
        &mut rng,
        &FraudPolicy::from_config(),
        Utc::now(),
    )
    .await?;

    ok(
        FraudCheckResponse {
            record,
            fraud_check: check,
        },
        "Fraud check completed",
    )
}

/// POST /api/attendance/records/{record_id}/validate
///
/// Marks a record present and tells the student.
///
/// ### Responses
/// - `200 OK` with the record
/// - `403 Forbidden` unless a teacher of the course or an admin
/// - `404 Not Found`
pub async fn validate_record(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(record_id): Path<i64>,
) -> ApiResult<attendance_record::Model> {
    let db = state.db();
    let actor = current_user(db, &claims).await?;
    let (record, session) =
        attendance_record::Model::validate(db, record_id, &actor, Utc::now()).await?;

    emit::attendance_validated(
        state.ws(),
        record.student_id,
        AttendanceValidated {
            class_session_id: session.id,
            record_id: record.id,
            validated_by: record.validated_by.unwrap_or(actor.id),
        },
    )
    .await;

    ok(record, "Attendance validated successfully")
}
