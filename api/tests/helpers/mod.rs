pub mod app;
pub mod ws;

pub use app::{Fixture, fixture, make_test_app, send, token_for};
pub use ws::{connect_ws, next_event, spawn_server};
