use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::command::DEFAULT_INTERVAL_MINUTES;
use crate::notification::DEFAULT_NOTIFICATION_TTL;
use crate::wire::AGENT_UPDATE_EVENT;

/// Notification lifetimes below this are flagged as too short to read.
const MIN_READABLE_TTL_MS: u64 = 500;

#[derive(Debug)]
pub enum ConfigError {
    Parse(String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "config parse error: {e}"),
            Self::Invalid(e) => write!(f, "invalid config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Panel client configuration, usually embedded in the page as TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Origin of the control API. Empty means the page origin.
    pub base_url: String,
    pub endpoints: EndpointsConfig,
    pub commands: CommandsConfig,
    pub notifications: NotificationsConfig,
    pub push: PushConfig,
}

/// Paths of the control API, relative to `base_url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointsConfig {
    pub status: String,
    pub start: String,
    pub stop: String,
    pub events: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            status: "/api/status".to_string(),
            start: "/api/start".to_string(),
            stop: "/api/stop".to_string(),
            events: "/api/events".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandsConfig {
    pub default_interval_minutes: u32,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            default_interval_minutes: DEFAULT_INTERVAL_MINUTES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationsConfig {
    pub ttl_ms: u64,
}

impl NotificationsConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            ttl_ms: DEFAULT_NOTIFICATION_TTL.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PushConfig {
    pub event_name: String,
    /// Delay before a native SSE reader reconnects, unless the server sends `retry:`.
    pub reconnect_delay_ms: u64,
}

impl PushConfig {
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            event_name: AGENT_UPDATE_EVENT.to_string(),
            reconnect_delay_ms: 3000,
        }
    }
}

impl ConsoleConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Reject unusable values; warn about suspicious ones.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_url.is_empty()
            && !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://"))
        {
            return Err(ConfigError::Invalid(format!(
                "base_url must be http(s), got {:?}",
                self.base_url
            )));
        }
        for (name, path) in [
            ("status", &self.endpoints.status),
            ("start", &self.endpoints.start),
            ("stop", &self.endpoints.stop),
            ("events", &self.endpoints.events),
        ] {
            if !path.starts_with('/') {
                return Err(ConfigError::Invalid(format!(
                    "endpoints.{name} must start with '/', got {path:?}"
                )));
            }
        }
        if self.commands.default_interval_minutes == 0 {
            return Err(ConfigError::Invalid(
                "commands.default_interval_minutes must be > 0".to_string(),
            ));
        }
        if self.notifications.ttl_ms == 0 {
            return Err(ConfigError::Invalid(
                "notifications.ttl_ms must be > 0".to_string(),
            ));
        }
        if self.push.event_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "push.event_name must not be empty".to_string(),
            ));
        }

        if self.notifications.ttl_ms < MIN_READABLE_TTL_MS {
            tracing::warn!(
                ttl_ms = self.notifications.ttl_ms,
                "Notifications will disappear before they can be read"
            );
        }
        if self.push.reconnect_delay_ms == 0 {
            tracing::warn!(
                "push.reconnect_delay_ms is 0, native push reader will reconnect in a tight loop"
            );
        }
        Ok(())
    }

    /// Copy of this config with `base_url` set, used when the page origin is
    /// only known at runtime.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    /// Absolute URL for an endpoint path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    pub fn status_url(&self) -> String {
        self.url(&self.endpoints.status)
    }

    pub fn start_url(&self) -> String {
        self.url(&self.endpoints.start)
    }

    pub fn stop_url(&self) -> String {
        self.url(&self.endpoints.stop)
    }

    pub fn events_url(&self) -> String {
        self.url(&self.endpoints.events)
    }
}
