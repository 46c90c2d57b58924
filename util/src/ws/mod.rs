// util/src/ws/mod.rs
pub mod axum_adapter;
pub mod handler_trait;
pub mod manager;
pub mod runtime;
pub mod serve;

pub use manager::WebSocketManager;

use chrono::Utc;
use serde::Serialize;

/// Standard event envelope sent over notification groups.
#[derive(Serialize)]
pub struct EventEnvelope<'a, T> {
    #[serde(rename = "type")]
    pub r#type: &'static str,
    pub event: &'a str,
    pub topic: &'a str,
    pub payload: T,
    pub ts: String,
}

/// Publish a JSON-serialized `EventEnvelope` on `group`.
///
/// Returns the number of sockets the frame was handed to. Nothing is
/// serialized for a group no socket has joined.
pub async fn emit<T: Serialize>(
    ws: &WebSocketManager,
    group: &str,
    event: &str,
    payload: &T,
) -> usize {
    if !ws.has_group(group).await {
        return 0;
    }
    let env = EventEnvelope {
        r#type: "event",
        event,
        topic: group,
        payload,
        ts: Utc::now().to_rfc3339(),
    };
    match serde_json::to_string(&env) {
        Ok(json) => ws.broadcast(group, json).await,
        Err(e) => {
            tracing::warn!(error = %e, event, group, "Failed to serialize notification");
            0
        }
    }
}
