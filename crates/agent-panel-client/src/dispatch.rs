use std::rc::Rc;

use agent_panel_core::command::{Command, CommandKind, CommandResult, DEFAULT_INTERVAL_MINUTES};
use agent_panel_core::state::StatusUpdate;

use crate::api::ControlApi;
use crate::notify::NotificationPresenter;
use crate::runtime;
use crate::sync::StatusSynchronizer;

/// Sends start/stop commands and reports their outcome.
///
/// The run-state only changes once the server confirms a command; a failed
/// command leaves it as it was. Duplicate clicks are not suppressed: each
/// click issues its own request and gets its own notification.
pub struct CommandDispatcher<A> {
    api: Rc<A>,
    sync: Rc<StatusSynchronizer>,
    notifier: Rc<NotificationPresenter>,
    default_interval: u32,
}

impl<A: ControlApi + 'static> CommandDispatcher<A> {
    pub fn new(
        api: Rc<A>,
        sync: Rc<StatusSynchronizer>,
        notifier: Rc<NotificationPresenter>,
    ) -> Self {
        Self {
            api,
            sync,
            notifier,
            default_interval: DEFAULT_INTERVAL_MINUTES,
        }
    }

    pub fn with_default_interval(mut self, minutes: u32) -> Self {
        self.default_interval = minutes;
        self
    }

    pub async fn start_agent(&self, interval: Option<u32>) -> CommandResult {
        self.dispatch(Command::start(interval.unwrap_or(self.default_interval)))
            .await
    }

    pub async fn stop_agent(&self) -> CommandResult {
        self.dispatch(Command::stop()).await
    }

    pub async fn dispatch(&self, command: Command) -> CommandResult {
        tracing::info!(
            kind = ?command.kind,
            interval = ?command.params.interval,
            "Sending command"
        );
        let result = match self.api.send_command(&command).await {
            Ok(response) => CommandResult::from_response(&response),
            Err(e) => {
                tracing::warn!(kind = ?command.kind, error = %e, "Command request failed");
                CommandResult::transport_failure()
            },
        };
        self.settle(command.kind, &result);
        result
    }

    fn settle(&self, kind: CommandKind, result: &CommandResult) {
        if result.is_success() {
            self.sync
                .apply_update(StatusUpdate::running(kind.confirmed_running()));
        } else {
            tracing::warn!(kind = ?kind, message = ?result.message, "Command rejected");
        }
        self.notifier
            .notify(result.notification_level(), result.notification_text(kind));
    }

    /// Fire-and-forget start, for UI event handlers.
    pub fn spawn_start(self: &Rc<Self>, interval: Option<u32>) {
        let dispatcher = Rc::clone(self);
        runtime::spawn_local(async move {
            dispatcher.start_agent(interval).await;
        });
    }

    pub fn spawn_stop(self: &Rc<Self>) {
        let dispatcher = Rc::clone(self);
        runtime::spawn_local(async move {
            dispatcher.stop_agent().await;
        });
    }
}
