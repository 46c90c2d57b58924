use axum::extract::ws::{Message, Utf8Bytes};
use tokio::sync::mpsc;

/// Per-connection context handed to a [`WsHandler`](super::handler_trait::WsHandler).
pub struct WsContext {
    /// Primary group of the socket (first in `groups`).
    pub topic: String,
    /// Every group this socket is subscribed to.
    pub groups: Vec<String>,
    pub user_id: Option<i64>,
    // enqueue frames for the writer task
    out_tx: mpsc::Sender<Message>,
}

impl WsContext {
    pub fn new(
        groups: Vec<String>,
        user_id: Option<i64>,
        out_tx: mpsc::Sender<Message>,
    ) -> Self {
        let topic = groups.first().cloned().unwrap_or_default();
        Self {
            topic,
            groups,
            user_id,
            out_tx,
        }
    }

    /// Send a *single* text frame to this client only
    pub async fn reply_text(&self, text: impl Into<Utf8Bytes>) -> Result<(), ()> {
        self.out_tx
            .send(Message::Text(text.into()))
            .await
            .map_err(|_| ())
    }

    /// Send a WS-level pong to this client
    pub async fn reply_pong(&self, payload: bytes::Bytes) -> Result<(), ()> {
        self.out_tx
            .send(Message::Pong(payload))
            .await
            .map_err(|_| ())
    }
}
