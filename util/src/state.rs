//! Shared application state handed to every Axum handler via `State<AppState>`.

use crate::ws::{self, WebSocketManager};
use sea_orm::DatabaseConnection;
use serde::Serialize;

/// Database pool plus the notification group registry.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    ws: WebSocketManager,
}

impl AppState {
    pub fn new(db: DatabaseConnection, ws: WebSocketManager) -> Self {
        Self { db, ws }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn ws(&self) -> &WebSocketManager {
        &self.ws
    }

    /// Returns a cloned copy of the database connection for spawned tasks.
    pub fn db_clone(&self) -> DatabaseConnection {
        self.db.clone()
    }

    pub fn ws_clone(&self) -> WebSocketManager {
        self.ws.clone()
    }

    /// Best-effort push of `payload` to `group`.
    ///
    /// Delivery failures never affect the caller; an absent audience is logged
    /// at debug level only.
    pub async fn notify<T: Serialize>(&self, group: &str, event: &str, payload: &T) {
        let delivered = ws::emit(&self.ws, group, event, payload).await;
        tracing::debug!(group, event, delivered, "Notification published");
    }
}
