use serde::Serialize;

/// An event knows its stable name and the notification group it belongs to.
pub trait Event: Serialize {
    const NAME: &'static str;
    /// Canonical group name, e.g. `user_7_notifications`.
    fn topic_path(&self) -> String;
}
