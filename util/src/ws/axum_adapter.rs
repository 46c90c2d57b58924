// util/ws/axum_adapter.rs
use std::sync::Arc;

use axum::{
    extract::{WebSocketUpgrade, ws::WebSocket},
    response::Response,
};

use super::WebSocketManager;
use super::handler_trait::WsHandler;
use super::serve::{WsServerOptions, serve_topics};

/// Upgrades the request and serves the socket on `groups`.
///
/// Group membership is resolved by the caller before the upgrade so that
/// authorization failures surface as plain HTTP errors.
pub fn upgrade_to_groups<H>(
    ws: WebSocketUpgrade,
    manager: WebSocketManager,
    groups: Vec<String>,
    user_id: Option<i64>,
    handler: Arc<H>,
    opts: WsServerOptions,
) -> Response
where
    H: WsHandler,
{
    ws.on_upgrade(move |socket: WebSocket| async move {
        serve_topics(socket, manager, groups, user_id, handler, opts).await;
    })
}
