use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use chrono::{DateTime, Utc};
use db::models::attendance_code;
use db::models::attendance_code::CodeStatus;
use serde::Serialize;

/// A code as shown to teachers.
#[derive(Debug, Serialize)]
pub struct CodeResponse {
    pub class_session_id: i64,
    pub code: String,
    pub status: CodeStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub seconds_remaining: i64,
}

impl CodeResponse {
    pub fn at(code: attendance_code::Model, now: DateTime<Utc>) -> Self {
        Self {
            status: code.status_at(now),
            seconds_remaining: code.seconds_remaining(now),
            class_session_id: code.class_session_id,
            created_at: code.created_at,
            expires_at: code.expires_at,
            code: code.code,
        }
    }
}

/// Peer IP from `ConnectInfo`, absent when the server was not started with
/// connect info (as under `oneshot` tests).
pub struct PeerIp(pub Option<IpAddr>);

impl<S> FromRequestParts<S> for PeerIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(PeerIp(
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip()),
        ))
    }
}
