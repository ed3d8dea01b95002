use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Offset-less layouts accepted in addition to RFC 3339.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Instant at which the agent last reported progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Parse an ISO-8601 timestamp. Strings without an offset (as produced by
    /// the server's `utcnow().isoformat()`) are read as UTC.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(Self(dt.with_timezone(&Utc)));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| Self(naive.and_utc()))
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// Milliseconds since the Unix epoch.
    pub fn epoch_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    pub fn to_iso(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Last-known run-state of the agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AgentState {
    pub running: bool,
    pub last_update: Option<Timestamp>,
}

/// Partial update from a push event, poll or command confirmation.
/// Absent fields leave the corresponding state untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusUpdate {
    pub running: Option<bool>,
    pub last_update: Option<Timestamp>,
}

impl StatusUpdate {
    pub fn running(running: bool) -> Self {
        Self {
            running: Some(running),
            last_update: None,
        }
    }

    pub fn last_update(ts: Timestamp) -> Self {
        Self {
            running: None,
            last_update: Some(ts),
        }
    }

    pub fn with_last_update(mut self, ts: Option<Timestamp>) -> Self {
        self.last_update = ts;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.running.is_none() && self.last_update.is_none()
    }
}

impl AgentState {
    /// State after folding `update` in. Only fields present in the update change.
    pub fn merged(self, update: &StatusUpdate) -> Self {
        Self {
            running: update.running.unwrap_or(self.running),
            last_update: update.last_update.or(self.last_update),
        }
    }

    pub fn apply(&mut self, update: &StatusUpdate) {
        *self = self.merged(update);
    }
}
