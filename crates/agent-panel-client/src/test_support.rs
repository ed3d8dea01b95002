//! In-memory surfaces and a scripted control API for tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use agent_panel_core::command::Command;
use agent_panel_core::notification::{Notification, NotificationId};
use agent_panel_core::view::StatusView;
use agent_panel_core::wire::{CommandResponse, StatusResponse};

use crate::api::{ControlApi, TransportError};
use crate::notify::NotificationSurface;
use crate::runtime;
use crate::sync::StatusSurface;

#[derive(Default)]
pub struct RecordingStatusSurface {
    views: RefCell<Vec<StatusView>>,
}

impl RecordingStatusSurface {
    pub fn render_count(&self) -> usize {
        self.views.borrow().len()
    }

    pub fn last(&self) -> Option<StatusView> {
        self.views.borrow().last().cloned()
    }
}

impl StatusSurface for RecordingStatusSurface {
    fn render(&self, view: &StatusView) {
        self.views.borrow_mut().push(view.clone());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceOp {
    EnsureContainer,
    Append(Notification),
    Remove(NotificationId),
}

#[derive(Default)]
pub struct RecordingNotificationSurface {
    ops: RefCell<Vec<SurfaceOp>>,
    shown: RefCell<Vec<Notification>>,
}

impl RecordingNotificationSurface {
    pub fn ops(&self) -> Vec<SurfaceOp> {
        self.ops.borrow().clone()
    }

    /// Notifications currently on screen, in insertion order.
    pub fn shown(&self) -> Vec<Notification> {
        self.shown.borrow().clone()
    }

    pub fn visible(&self) -> Vec<NotificationId> {
        self.shown.borrow().iter().map(|n| n.id).collect()
    }

    pub fn texts(&self) -> Vec<String> {
        self.shown.borrow().iter().map(|n| n.text.clone()).collect()
    }

    pub fn containers_ensured(&self) -> usize {
        self.ops
            .borrow()
            .iter()
            .filter(|op| matches!(op, SurfaceOp::EnsureContainer))
            .count()
    }
}

impl NotificationSurface for RecordingNotificationSurface {
    fn ensure_container(&self) {
        self.ops.borrow_mut().push(SurfaceOp::EnsureContainer);
    }

    fn append(&self, notification: &Notification) {
        self.ops
            .borrow_mut()
            .push(SurfaceOp::Append(notification.clone()));
        self.shown.borrow_mut().push(notification.clone());
    }

    fn remove(&self, id: NotificationId) {
        self.ops.borrow_mut().push(SurfaceOp::Remove(id));
        self.shown.borrow_mut().retain(|n| n.id != id);
    }
}

type Scripted<T> = RefCell<VecDeque<(Duration, Result<T, TransportError>)>>;

/// Answers requests from queues of `(delay, result)` in call order. The
/// entry is taken when the call starts, so overlapping calls complete in
/// whatever order their delays dictate.
#[derive(Default)]
pub struct ScriptedApi {
    statuses: Scripted<StatusResponse>,
    commands: Scripted<CommandResponse>,
    sent: RefCell<Vec<Command>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_status(&self, delay: Duration, result: Result<StatusResponse, TransportError>) {
        self.statuses.borrow_mut().push_back((delay, result));
    }

    pub fn push_command(&self, delay: Duration, result: Result<CommandResponse, TransportError>) {
        self.commands.borrow_mut().push_back((delay, result));
    }

    pub fn sent(&self) -> Vec<Command> {
        self.sent.borrow().clone()
    }
}

async fn answer<T>(queue: &Scripted<T>) -> Result<T, TransportError> {
    let next = queue.borrow_mut().pop_front();
    match next {
        Some((delay, result)) => {
            runtime::sleep(delay).await;
            result
        },
        None => Err(TransportError::Request("no scripted response".to_string())),
    }
}

impl ControlApi for ScriptedApi {
    async fn fetch_status(&self) -> Result<StatusResponse, TransportError> {
        answer(&self.statuses).await
    }

    async fn send_command(&self, command: &Command) -> Result<CommandResponse, TransportError> {
        self.sent.borrow_mut().push(*command);
        answer(&self.commands).await
    }
}
