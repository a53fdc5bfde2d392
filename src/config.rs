use std::time::Duration;

use crate::errors::AppError;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_SESSION_COOKIE: &str = "portal_session";
pub const DEFAULT_IDENTITY_TIMEOUT_MS: u64 = 1500;

/// Runtime settings read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub session_cookie: String,
    /// Upper bound for one identity lookup; slower lookups count as anonymous.
    pub identity_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
            identity_timeout: Duration::from_millis(DEFAULT_IDENTITY_TIMEOUT_MS),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let port = match std::env::var("APP_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .map_err(|_| AppError::configuration("APP_PORT must be a valid port number"))?,
            Err(_) => DEFAULT_PORT,
        };

        let session_cookie = std::env::var("SESSION_COOKIE")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SESSION_COOKIE.to_string());

        let timeout_ms = match std::env::var("IDENTITY_TIMEOUT_MS") {
            Ok(value) => value
                .parse::<u64>()
                .map_err(|_| AppError::configuration("IDENTITY_TIMEOUT_MS must be a valid integer"))?,
            Err(_) => DEFAULT_IDENTITY_TIMEOUT_MS,
        };

        Ok(Self {
            port,
            session_cookie,
            identity_timeout: Duration::from_millis(timeout_ms),
        })
    }
}
