use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use agent_panel_core::notification::{
    DEFAULT_NOTIFICATION_TTL, Notification, NotificationId, NotificationLevel, NotificationQueue,
};

use crate::runtime;

/// Where notifications are drawn.
pub trait NotificationSurface {
    /// Create the notification container if the page lacks one.
    fn ensure_container(&self);
    fn append(&self, notification: &Notification);
    /// Remove a notification node. Must tolerate ids that are already gone.
    fn remove(&self, id: NotificationId);
}

/// Shows transient notifications and removes them after their lifetime or
/// when the user dismisses them, whichever comes first.
pub struct NotificationPresenter {
    queue: RefCell<NotificationQueue>,
    surface: Rc<dyn NotificationSurface>,
    default_ttl: Duration,
}

impl NotificationPresenter {
    pub fn new(surface: Rc<dyn NotificationSurface>) -> Self {
        Self::with_ttl(surface, DEFAULT_NOTIFICATION_TTL)
    }

    pub fn with_ttl(surface: Rc<dyn NotificationSurface>, default_ttl: Duration) -> Self {
        Self {
            queue: RefCell::new(NotificationQueue::new()),
            surface,
            default_ttl,
        }
    }

    pub fn notify(
        self: &Rc<Self>,
        level: NotificationLevel,
        text: impl Into<String>,
    ) -> NotificationId {
        self.notify_for(level, text, self.default_ttl)
    }

    /// Show a notification that expires after `ttl`.
    pub fn notify_for(
        self: &Rc<Self>,
        level: NotificationLevel,
        text: impl Into<String>,
        ttl: Duration,
    ) -> NotificationId {
        let notification = self.queue.borrow_mut().push(level, text.into(), ttl);
        tracing::debug!(
            id = notification.id,
            level = level.as_str(),
            "Showing notification"
        );
        self.surface.ensure_container();
        self.surface.append(&notification);

        let id = notification.id;
        let presenter: Weak<Self> = Rc::downgrade(self);
        runtime::spawn_local(async move {
            runtime::sleep(ttl).await;
            if let Some(presenter) = presenter.upgrade() {
                presenter.dismiss(id);
            }
        });
        id
    }

    /// Remove a notification. Returns `false` if it was already gone.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        let removed = self.queue.borrow_mut().remove(id).is_some();
        if removed {
            self.surface.remove(id);
        }
        removed
    }

    /// Notifications currently shown, oldest first.
    pub fn live(&self) -> Vec<Notification> {
        self.queue.borrow().live().to_vec()
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }
}
