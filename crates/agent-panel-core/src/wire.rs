use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::state::{StatusUpdate, Timestamp};

/// Name of the push event carrying agent state.
pub const AGENT_UPDATE_EVENT: &str = "agent_update";

#[derive(Debug)]
pub enum WireError {
    EmptyBody,
    DeserializeError(String),
}

impl std::fmt::Display for WireError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyBody => write!(f, "empty body"),
            Self::DeserializeError(e) => write!(f, "deserialize error: {e}"),
        }
    }
}

impl std::error::Error for WireError {}

/// Payload of an `agent_update` push event. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentUpdateEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_running: Option<bool>,
}

impl AgentUpdateEvent {
    /// Decode a push payload field by field. Fields with the wrong JSON type
    /// are dropped; anything that is not a JSON object yields the empty event.
    pub fn decode(data: &str) -> Self {
        let Ok(Value::Object(map)) = serde_json::from_str::<Value>(data) else {
            tracing::debug!(len = data.len(), "Ignoring non-object agent_update payload");
            return Self::default();
        };
        Self {
            timestamp: map
                .get("timestamp")
                .and_then(Value::as_str)
                .map(str::to_string),
            agent_running: map.get("agent_running").and_then(Value::as_bool),
        }
    }

    pub fn to_update(&self) -> StatusUpdate {
        StatusUpdate {
            running: self.agent_running,
            last_update: parse_optional_timestamp(self.timestamp.as_deref()),
        }
    }
}

/// Response of `GET /api/status`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub agent_running: bool,
    #[serde(default)]
    pub last_update: Option<String>,
    #[serde(default)]
    pub portfolio_available: bool,
    #[serde(default)]
    pub analysis_available: bool,
    #[serde(default)]
    pub tokens_analyzed: Vec<String>,
}

impl StatusResponse {
    pub fn to_update(&self) -> StatusUpdate {
        StatusUpdate::running(self.agent_running)
            .with_last_update(parse_optional_timestamp(self.last_update.as_deref()))
    }
}

/// Body of `POST /api/start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartRequest {
    pub interval: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
    #[serde(other)]
    Unknown,
}

/// Response of `POST /api/start` and `POST /api/stop`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub status: ResponseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CommandResponse {
    pub fn success(message: Option<&str>) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: message.map(str::to_string),
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: Some(message.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }
}

/// Decode a `/api/status` body.
pub fn decode_status(body: &str) -> Result<StatusResponse, WireError> {
    decode_json(body)
}

/// Decode a start/stop response body.
pub fn decode_command_response(body: &str) -> Result<CommandResponse, WireError> {
    decode_json(body)
}

fn decode_json<T: for<'de> Deserialize<'de>>(body: &str) -> Result<T, WireError> {
    if body.trim().is_empty() {
        return Err(WireError::EmptyBody);
    }
    serde_json::from_str(body).map_err(|e| WireError::DeserializeError(e.to_string()))
}

fn parse_optional_timestamp(raw: Option<&str>) -> Option<Timestamp> {
    let raw = raw?;
    let parsed = Timestamp::parse(raw);
    if parsed.is_none() {
        tracing::debug!(raw, "Dropping unparseable timestamp");
    }
    parsed
}
