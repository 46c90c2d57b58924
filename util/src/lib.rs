pub mod config;
pub mod state;
pub mod time;
pub mod ws;
