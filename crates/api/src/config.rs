//! Server configuration

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
    pub request_timeout_secs: u64,
    /// How long a unit of work waits for the SQLite write lock
    pub busy_timeout_ms: u64,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_url: "sqlite:data/bankdesk.db".to_string(),
            max_connections: 5,
            request_timeout_secs: 30,
            busy_timeout_ms: 5_000,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load config from `BANKDESK_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load config through `lookup`; unset or unparseable values keep the default
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("BANKDESK_HOST").unwrap_or(defaults.host),
            port: parse_or(lookup("BANKDESK_PORT"), defaults.port),
            database_url: lookup("BANKDESK_DATABASE_URL").unwrap_or(defaults.database_url),
            max_connections: parse_or(lookup("BANKDESK_MAX_CONNECTIONS"), defaults.max_connections),
            request_timeout_secs: parse_or(
                lookup("BANKDESK_REQUEST_TIMEOUT_SECS"),
                defaults.request_timeout_secs,
            ),
            busy_timeout_ms: parse_or(lookup("BANKDESK_BUSY_TIMEOUT_MS"), defaults.busy_timeout_ms),
            log_level: lookup("BANKDESK_LOG_LEVEL").unwrap_or(defaults.log_level),
        }
    }

    /// Full bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}
