//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from environment variables. It provides
//! thread-safe access and mutation for testing or overrides in runtime environments.
//!
//! Most callers go through the free functions at the bottom of this module
//! (`config::host()`, `config::code_ttl_minutes()`, ...).

use std::env;
use std::str::FromStr;
use std::sync::{OnceLock, RwLock};

/// Represents the complete application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub database_path: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_duration_minutes: u64,
    /// Lifetime of a freshly generated attendance code.
    pub code_ttl_minutes: i64,
    /// Offset of the campus wall clock from UTC. Session dates and times are local.
    pub utc_offset_minutes: i32,
    pub classroom_latitude: f64,
    pub classroom_longitude: f64,
    pub fraud_radius_km: f64,
    pub fraud_random_rate: f64,
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Unparseable config value; using default");
            default
        }),
        Err(_) => default,
    }
}

const DEFAULT_CODE_TTL_MINUTES: i64 = 10;
/// Longest lifetime accepted for an attendance code.
pub const MAX_CODE_TTL_MINUTES: i64 = 24 * 60;

/// Keeps a code TTL within `1..=MAX_CODE_TTL_MINUTES`, else the default.
fn bounded_code_ttl(minutes: i64) -> i64 {
    if (1..=MAX_CODE_TTL_MINUTES).contains(&minutes) {
        minutes
    } else {
        tracing::warn!(
            value = minutes,
            default = DEFAULT_CODE_TTL_MINUTES,
            "CODE_TTL_MINUTES out of range; using default"
        );
        DEFAULT_CODE_TTL_MINUTES
    }
}

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    ///
    /// Every key has a development default. `JWT_SECRET` defaults to an empty
    /// string, which the server refuses to start with.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            env: env::var("APP_ENV").unwrap_or_else(|_| "development".into()),
            project_name: env::var("PROJECT_NAME").unwrap_or_else(|_| "rollcall".into()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "api=info".into()),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "api.log".into()),
            log_to_stdout: env::var("LOG_TO_STDOUT").unwrap_or_else(|_| "false".into()) == "true",
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "data/rollcall.db".into()),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into()),
            port: parse_or("PORT", 3000),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_default(),
            jwt_duration_minutes: parse_or("JWT_DURATION_MINUTES", 60),
            code_ttl_minutes: bounded_code_ttl(parse_or("CODE_TTL_MINUTES", DEFAULT_CODE_TTL_MINUTES)),
            utc_offset_minutes: parse_or("UTC_OFFSET_MINUTES", 0),
            classroom_latitude: parse_or("CLASSROOM_LATITUDE", 41.5369),
            classroom_longitude: parse_or("CLASSROOM_LONGITUDE", -8.4239),
            fraud_radius_km: parse_or("FRAUD_RADIUS_KM", 0.5),
            fraud_random_rate: parse_or("FRAUD_RANDOM_RATE", 0.2),
        }
    }

    /// Returns a shared reference to the global configuration.
    ///
    /// # Panics
    /// Panics if the lock cannot be acquired.
    pub fn global() -> std::sync::RwLockReadGuard<'static, AppConfig> {
        CONFIG_INSTANCE
            .get_or_init(|| RwLock::new(AppConfig::from_env()))
            .read()
            .expect("Failed to acquire AppConfig read lock")
    }

    /// Resets the configuration by reloading from environment variables.
    ///
    /// Useful in tests to clear overrides.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            if let Ok(mut guard) = lock.write() {
                *guard = AppConfig::from_env();
            }
        }
    }

    /// Generic internal setter for any field in the config.
    ///
    /// Used by public per-field setter methods.
    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        let mut guard = lock
            .write()
            .expect("Failed to acquire AppConfig write lock");
        setter(&mut guard);
    }

    // --- Per-field setters below ---

    pub fn set_env(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.env = value.into());
    }

    pub fn set_log_level(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.log_level = value.into());
    }

    pub fn set_database_path(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.database_path = value.into());
    }

    pub fn set_jwt_secret(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.jwt_secret = value.into());
    }

    pub fn set_jwt_duration_minutes(value: impl Into<u64>) {
        AppConfig::set_field(|cfg| cfg.jwt_duration_minutes = value.into());
    }

    pub fn set_code_ttl_minutes(value: i64) {
        let value = bounded_code_ttl(value);
        AppConfig::set_field(|cfg| cfg.code_ttl_minutes = value);
    }

    pub fn set_utc_offset_minutes(value: i32) {
        AppConfig::set_field(|cfg| cfg.utc_offset_minutes = value);
    }

    pub fn set_fraud_random_rate(value: f64) {
        AppConfig::set_field(|cfg| cfg.fraud_random_rate = value);
    }

    pub fn set_fraud_radius_km(value: f64) {
        AppConfig::set_field(|cfg| cfg.fraud_radius_km = value);
    }
}

// --- Free-function accessors ---

pub fn env() -> String {
    AppConfig::global().env.clone()
}

pub fn project_name() -> String {
    AppConfig::global().project_name.clone()
}

pub fn log_level() -> String {
    AppConfig::global().log_level.clone()
}

pub fn log_file() -> String {
    AppConfig::global().log_file.clone()
}

pub fn log_to_stdout() -> bool {
    AppConfig::global().log_to_stdout
}

pub fn database_path() -> String {
    AppConfig::global().database_path.clone()
}

pub fn host() -> String {
    AppConfig::global().host.clone()
}

pub fn port() -> u16 {
    AppConfig::global().port
}

pub fn jwt_secret() -> String {
    AppConfig::global().jwt_secret.clone()
}

pub fn jwt_duration_minutes() -> u64 {
    AppConfig::global().jwt_duration_minutes
}

pub fn code_ttl_minutes() -> i64 {
    AppConfig::global().code_ttl_minutes
}

pub fn utc_offset_minutes() -> i32 {
    AppConfig::global().utc_offset_minutes
}

/// Reference coordinate of the classroom as `(latitude, longitude)`.
pub fn classroom_location() -> (f64, f64) {
    let cfg = AppConfig::global();
    (cfg.classroom_latitude, cfg.classroom_longitude)
}

pub fn fraud_radius_km() -> f64 {
    AppConfig::global().fraud_radius_km
}

pub fn fraud_random_rate() -> f64 {
    AppConfig::global().fraud_random_rate
}
