use std::sync::Arc;

use axum::{
    extract::{Path, State, WebSocketUpgrade},
    response::{IntoResponse, Response},
};
use db::models::class_session;
use util::state::AppState;
use util::ws::axum_adapter::upgrade_to_groups;
use util::ws::serve::WsServerOptions;

use crate::auth::AuthUser;
use crate::response::ApiError;
use crate::routes::common::current_user;
use crate::ws::notifications::ws_handlers::NotificationsWsHandler;
use crate::ws::topics::session_topic;

/// GET /ws/attendance/sessions/{session_id}
///
/// Single-group socket on `class_session_{id}_notifications`, for teachers of
/// the course and admins.
///
/// ### Responses
/// - `101 Switching Protocols`
/// - `403 Forbidden` for anyone else
/// - `404 Not Found` for an unknown session
pub async fn attendance_session_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(session_id): Path<i64>,
) -> Result<Response, ApiError> {
    let db = state.db();
    let user = current_user(db, &claims).await?;
    let session = class_session::Model::find_by_id(db, session_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Class session not found"))?;
    if !user.is_admin() && !session.is_taught_by(db, user.id).await? {
        return Err(ApiError::forbidden("Permission denied."));
    }

    Ok(upgrade_to_groups(
        ws,
        state.ws_clone(),
        vec![session_topic(session.id)],
        Some(user.id),
        Arc::new(NotificationsWsHandler),
        WsServerOptions::default(),
    )
    .into_response())
}
