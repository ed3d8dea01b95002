use crate::notification::NotificationLevel;
use crate::wire::{CommandResponse, StartRequest};

/// Minutes between agent cycles when the caller does not choose.
pub const DEFAULT_INTERVAL_MINUTES: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Start,
    Stop,
}

impl CommandKind {
    /// Run-state the agent is in once this command is confirmed.
    pub fn confirmed_running(self) -> bool {
        matches!(self, Self::Start)
    }

    fn past_tense(self) -> &'static str {
        match self {
            Self::Start => "started",
            Self::Stop => "stopped",
        }
    }

    fn progressive(self) -> &'static str {
        match self {
            Self::Start => "starting",
            Self::Stop => "stopping",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommandParams {
    pub interval: Option<u32>,
}

/// A user-issued start/stop request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub kind: CommandKind,
    pub params: CommandParams,
}

impl Command {
    pub fn start(interval_minutes: u32) -> Self {
        Self {
            kind: CommandKind::Start,
            params: CommandParams {
                interval: Some(interval_minutes),
            },
        }
    }

    pub fn stop() -> Self {
        Self {
            kind: CommandKind::Stop,
            params: CommandParams::default(),
        }
    }

    /// JSON body to send, if any. Stop carries none.
    pub fn start_body(&self) -> Option<StartRequest> {
        match self.kind {
            CommandKind::Start => Some(StartRequest {
                interval: self.params.interval.unwrap_or(DEFAULT_INTERVAL_MINUTES),
            }),
            CommandKind::Stop => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

/// How a command resolved, with the server's message if it sent one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub outcome: Outcome,
    pub message: Option<String>,
}

impl CommandResult {
    pub fn from_response(response: &CommandResponse) -> Self {
        let outcome = if response.is_success() {
            Outcome::Success
        } else {
            Outcome::Failure
        };
        Self {
            outcome,
            message: response.message.clone(),
        }
    }

    /// The request never produced a usable response.
    pub fn transport_failure() -> Self {
        Self {
            outcome: Outcome::Failure,
            message: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }

    pub fn notification_level(&self) -> NotificationLevel {
        match self.outcome {
            Outcome::Success => NotificationLevel::Success,
            Outcome::Failure => NotificationLevel::Danger,
        }
    }

    /// User-facing text reporting this result for `kind`.
    pub fn notification_text(&self, kind: CommandKind) -> String {
        match (self.outcome, self.message.as_deref()) {
            (Outcome::Success, _) => format!("Agent {} successfully", kind.past_tense()),
            (Outcome::Failure, Some(message)) if !message.is_empty() => {
                format!("Error {} agent: {message}", kind.progressive())
            },
            (Outcome::Failure, _) => format!("Error {} agent", kind.progressive()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{error_response, success_response};

    #[test]
    fn start_carries_interval_body() {
        let cmd = Command::start(30);
        assert_eq!(cmd.start_body(), Some(StartRequest { interval: 30 }));
        assert!(cmd.kind.confirmed_running());
    }

    #[test]
    fn stop_has_no_body() {
        let cmd = Command::stop();
        assert_eq!(cmd.start_body(), None);
        assert!(!cmd.kind.confirmed_running());
    }

    #[test]
    fn success_texts() {
        let result = CommandResult::from_response(&success_response());
        assert!(result.is_success());
        assert_eq!(result.notification_level(), NotificationLevel::Success);
        assert_eq!(
            result.notification_text(CommandKind::Start),
            "Agent started successfully"
        );
        assert_eq!(
            result.notification_text(CommandKind::Stop),
            "Agent stopped successfully"
        );
    }

    #[test]
    fn application_failure_includes_server_message() {
        let result = CommandResult::from_response(&error_response("busy"));
        assert!(!result.is_success());
        assert_eq!(result.notification_level(), NotificationLevel::Danger);
        assert_eq!(
            result.notification_text(CommandKind::Stop),
            "Error stopping agent: busy"
        );
    }

    #[test]
    fn transport_failure_uses_generic_text() {
        let result = CommandResult::transport_failure();
        assert_eq!(
            result.notification_text(CommandKind::Start),
            "Error starting agent"
        );
        assert_eq!(result.notification_level(), NotificationLevel::Danger);
    }
}
