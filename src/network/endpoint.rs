use std::time::Duration;

use crate::config::AppConfig;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_READ_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(250);

pub const SOS_PATH: &str = "/sos";
pub const MESSAGES_PATH: &str = "/messages";
pub const UPLOADS_PATH: &str = "/uploads";
pub const SEND_MESSAGE_PATH: &str = "/send_message";
pub const SEND_VOICE_PATH: &str = "/send_voice/";
pub const SEND_SOS_PATH: &str = "/send_sos";

/// Where requests go and how reads behave. Passed explicitly to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub base_url: String,
    /// Applied to list reads only; writes and media downloads have none.
    pub read_timeout: Duration,
    /// Total tries for an idempotent read, including the first.
    pub read_attempts: u32,
    /// Delay before the second try; doubles on each further one.
    pub retry_backoff: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BACKEND_URL)
    }
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            read_timeout: DEFAULT_READ_TIMEOUT,
            read_attempts: DEFAULT_READ_ATTEMPTS,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    /// Backoff to wait after the given failed attempt (1-based).
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.retry_backoff.saturating_mul(1u32 << exponent)
    }
}

impl From<&AppConfig> for BackendConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            base_url: config.backend_url.clone(),
            read_timeout: Duration::from_secs(config.read_timeout_secs),
            read_attempts: config.read_attempts.max(1),
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
        }
    }
}

/// `base` without its trailing slashes, followed by `path`.
pub fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// Final path segment of a media url, ignoring any query or fragment.
pub fn media_file_name(media_url: &str) -> Option<&str> {
    let without_suffix = media_url
        .split(['?', '#'])
        .next()
        .unwrap_or(media_url);
    let name = without_suffix.rsplit('/').next().unwrap_or(without_suffix);
    if name.is_empty() { None } else { Some(name) }
}
