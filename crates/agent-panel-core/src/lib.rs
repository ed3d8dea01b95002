pub mod command;
pub mod config;
pub mod format;
pub mod notification;
pub mod sse;
pub mod state;
pub mod view;
pub mod wire;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use chrono::{TimeZone, Utc};

    use crate::state::{AgentState, StatusUpdate, Timestamp};
    use crate::wire::CommandResponse;

    /// Timestamp at the given second of 2026-01-01 UTC.
    pub fn make_timestamp(second: u32) -> Timestamp {
        let dt = Utc
            .with_ymd_and_hms(2026, 1, 1, 0, 0, second % 60)
            .single()
            .unwrap_or_default();
        Timestamp::from_datetime(dt)
    }

    /// A running agent last updated at `second`.
    pub fn running_state(second: u32) -> AgentState {
        AgentState {
            running: true,
            last_update: Some(make_timestamp(second)),
        }
    }

    /// Update carrying both fields.
    pub fn full_update(running: bool, second: u32) -> StatusUpdate {
        StatusUpdate {
            running: Some(running),
            last_update: Some(make_timestamp(second)),
        }
    }

    pub fn success_response() -> CommandResponse {
        CommandResponse::success(None)
    }

    pub fn error_response(message: &str) -> CommandResponse {
        CommandResponse::error(message)
    }
}
