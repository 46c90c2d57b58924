//! Notification group registry.
//!
//! Each named group (`user_7_notifications`, `class_session_3_notifications`, ...)
//! owns a Tokio broadcast channel. Publishing is fire-and-forget: no delivery
//! guarantee, no ordering guarantee across groups, no retry.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

/// Buffered messages per group before slow receivers start lagging.
const GROUP_CAPACITY: usize = 100;

type Group = String;
type Sender = broadcast::Sender<String>;
type Receiver = broadcast::Receiver<String>;

/// Manages broadcast channels per notification group.
///
/// Channels are created lazily on first subscription and dropped when a
/// publish finds no receivers left.
#[derive(Clone, Default)]
pub struct WebSocketManager {
    inner: Arc<RwLock<HashMap<Group, Sender>>>,
}

impl WebSocketManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to `group`, creating it if necessary.
    pub async fn subscribe(&self, group: &str) -> Receiver {
        let mut map = self.inner.write().await;
        map.entry(group.to_string())
            .or_insert_with(|| broadcast::channel(GROUP_CAPACITY).0)
            .subscribe()
    }

    /// Publishes `msg` to every current subscriber of `group`.
    ///
    /// Returns how many receivers the message was handed to. A group nobody
    /// listens to is a no-op and returns 0.
    pub async fn broadcast<T: Into<String>>(&self, group: &str, msg: T) -> usize {
        let mut map = self.inner.write().await;
        let Some(sender) = map.get(group) else {
            return 0;
        };
        let delivered = sender.send(msg.into()).unwrap_or(0);
        if sender.receiver_count() == 0 {
            tracing::debug!(group, "Dropping notification group without subscribers");
            map.remove(group);
        }
        delivered
    }

    /// Whether a channel currently exists for `group`.
    pub async fn has_group(&self, group: &str) -> bool {
        self.inner.read().await.contains_key(group)
    }
}
