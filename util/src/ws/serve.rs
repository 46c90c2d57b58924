use axum::extract::ws::{Message, WebSocket};
use bytes::Bytes;
use chrono::Utc;
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{broadcast, broadcast::error::RecvError, mpsc};
use tokio::{task::JoinHandle, time};

use super::WebSocketManager;
use super::handler_trait::WsHandler;
use super::runtime::WsContext;

pub struct WsServerOptions {
    pub ws_ping_sec: u64,
    pub enable_app_ping: bool,
}

impl Default for WsServerOptions {
    fn default() -> Self {
        Self {
            ws_ping_sec: 30,
            enable_app_ping: true,
        }
    }
}

/// Serves a socket subscribed to every group in `groups`.
///
/// Broadcasts from any group are forwarded to the client as text frames.
pub async fn serve_topics<H: WsHandler>(
    socket: WebSocket,
    manager: WebSocketManager,
    groups: Vec<String>,
    user_id: Option<i64>,
    handler: Arc<H>,
    opts: WsServerOptions,
) {
    let mut receivers = Vec::with_capacity(groups.len());
    for group in &groups {
        receivers.push((group.clone(), manager.subscribe(group).await));
    }
    tracing::info!(user_id = ?user_id, groups = ?groups, "WS session opened");

    let (mut sink, mut socket_rx) = socket.split();

    // Outbound queue and writer task
    let (out_tx, mut out_rx) = mpsc::channel::<Message>(64);
    let writer_task = tokio::spawn(async move {
        while let Some(frame) = out_rx.recv().await {
            if sink.send(frame).await.is_err() {
                break;
            }
        }
    });

    let ctx = WsContext::new(groups, user_id, out_tx.clone());

    // S→C: one forwarder per group
    let forward_tasks: Vec<JoinHandle<()>> = receivers
        .into_iter()
        .map(|(group, rx)| {
            let out_tx = out_tx.clone();
            tokio::spawn(forward_group(group, rx, out_tx))
        })
        .collect();

    // WS-level periodic ping
    let ping_task = {
        let out_tx = out_tx.clone();
        let every = std::time::Duration::from_secs(opts.ws_ping_sec);
        tokio::spawn(async move {
            loop {
                time::sleep(every).await;
                if out_tx.send(Message::Ping(Bytes::new())).await.is_err() {
                    break;
                }
            }
        })
    };
    drop(out_tx);

    handler.on_open(&ctx).await;

    // C→S: parse & dispatch until the client goes away
    while let Some(Ok(msg)) = socket_rx.next().await {
        match msg {
            Message::Text(text) => {
                let raw = text.as_str();
                if opts.enable_app_ping && is_app_ping(raw) {
                    let _ = ctx
                        .reply_text(
                            serde_json::json!({
                                "event": "pong",
                                "topic": ctx.topic,
                                "payload": {},
                                "ts": Utc::now().to_rfc3339(),
                            })
                            .to_string(),
                        )
                        .await;
                    continue;
                }
                match serde_json::from_str::<H::In>(raw) {
                    Ok(parsed) => handler.on_message(&ctx, parsed).await,
                    Err(e) => tracing::warn!(
                        "WS invalid message on '{}': {e}; raw={raw}",
                        ctx.topic
                    ),
                }
            }
            Message::Ping(payload) => {
                let _ = ctx.reply_pong(payload).await;
            }
            Message::Pong(_) => {}
            Message::Binary(_) => {
                tracing::warn!("Ignoring binary on topic '{}'", ctx.topic);
            }
            Message::Close(_) => break,
        }
    }

    handler.on_close(&ctx).await;

    for task in &forward_tasks {
        task.abort();
    }
    ping_task.abort();
    drop(ctx);
    let _ = writer_task.await;

    tracing::info!(user_id = ?user_id, "WS session ended");
}

/// Copies one group's broadcasts into the socket's outbound queue.
///
/// A lagging receiver skips the overwritten frames and keeps going; the loop
/// ends when the group is closed or the client is gone.
async fn forward_group(group: String, mut rx: broadcast::Receiver<String>, out_tx: mpsc::Sender<Message>) {
    loop {
        let msg = match rx.recv().await {
            Ok(msg) => msg,
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(group = %group, skipped, "WS receiver lagged; frames dropped");
                continue;
            }
            Err(RecvError::Closed) => break,
        };
        if out_tx.send(Message::Text(msg.into())).await.is_err() {
            tracing::debug!("Client disconnected while sending to '{group}'");
            break;
        }
    }
}

fn is_app_ping(raw: &str) -> bool {
    matches!(
        serde_json::from_str::<Value>(raw),
        Ok(Value::Object(map)) if map.get("type").and_then(Value::as_str) == Some("ping")
    )
}
