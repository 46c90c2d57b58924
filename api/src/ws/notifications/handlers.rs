use std::sync::Arc;

use axum::{
    extract::{State, WebSocketUpgrade},
    response::{IntoResponse, Response},
};
use db::models::{class_session, user};
use sea_orm::{DbConn, DbErr};
use util::state::AppState;
use util::time;
use util::ws::axum_adapter::upgrade_to_groups;
use util::ws::serve::WsServerOptions;

use super::ws_handlers::NotificationsWsHandler;
use crate::auth::AuthUser;
use crate::response::ApiError;
use crate::routes::common::current_user;
use crate::ws::topics::{session_topic, teacher_general_topic, user_topic};

/// Groups a user's notification socket joins.
///
/// Everyone joins their own group. Teachers (and admins, who may issue codes)
/// join their general group; teachers and students also join the groups of
/// the sessions of their courses dated today or later.
pub async fn notification_groups(
    db: &DbConn,
    user: &user::Model,
) -> Result<Vec<String>, DbErr> {
    let mut groups = vec![user_topic(user.id)];
    let today = Some(time::local_now().date());

    let sessions = match user.role {
        user::Role::Admin => {
            groups.push(teacher_general_topic(user.id));
            Vec::new()
        }
        user::Role::Teacher => {
            groups.push(teacher_general_topic(user.id));
            class_session::Model::taught_between(db, user.id, today, None).await?
        }
        user::Role::Student => class_session::Model::enrolled_between(db, user.id, today, None).await?,
    };
    groups.extend(sessions.into_iter().map(|(s, _)| session_topic(s.id)));
    Ok(groups)
}

/// GET /ws/notifications
///
/// Upgrades to a socket receiving every notification addressed to the user.
/// The first frame lists the joined groups:
///
/// ```json
/// { "type": "connected", "user_id": 7, "groups": ["user_7_notifications", "class_session_3_notifications"] }
/// ```
pub async fn notifications_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Response, ApiError> {
    let user = current_user(state.db(), &claims).await?;
    let groups = notification_groups(state.db(), &user).await?;

    Ok(upgrade_to_groups(
        ws,
        state.ws_clone(),
        groups,
        Some(user.id),
        Arc::new(NotificationsWsHandler),
        WsServerOptions::default(),
    )
    .into_response())
}
