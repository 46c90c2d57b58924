use crate::ws::core::event::Event;
use util::ws::{WebSocketManager, emit as emit_enveloped};

/// Publishes `ev` on its group inside the standard envelope.
pub async fn emit<E>(ws: &WebSocketManager, ev: &E) -> usize
where
    E: Event,
{
    let topic = ev.topic_path();
    let delivered = emit_enveloped(ws, &topic, E::NAME, ev).await;
    tracing::debug!(event = E::NAME, topic = %topic, delivered, "Notification emitted");
    delivered
}
