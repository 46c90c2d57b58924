use serde::Deserialize;
use serde_json::json;
use util::ws::handler_trait::WsHandler;
use util::ws::runtime::WsContext;

/// Client frames understood on notification sockets.
///
/// `{"type":"ping"}` is answered by the serving runtime before it gets here.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Ping,
    /// Asks the server to repeat which groups this socket is joined to.
    Groups,
}

fn groups_frame(kind: &str, ctx: &WsContext) -> String {
    json!({ "type": kind, "user_id": ctx.user_id, "groups": ctx.groups }).to_string()
}

/// Sends the joined groups on open and on request.
pub struct NotificationsWsHandler;

impl WsHandler for NotificationsWsHandler {
    type In = ClientMessage;

    async fn on_open(&self, ctx: &WsContext) {
        let _ = ctx.reply_text(groups_frame("connected", ctx)).await;
    }

    async fn on_message(&self, ctx: &WsContext, msg: Self::In) {
        match msg {
            ClientMessage::Groups => {
                let _ = ctx.reply_text(groups_frame("groups", ctx)).await;
            }
            ClientMessage::Ping => {}
        }
    }
}
