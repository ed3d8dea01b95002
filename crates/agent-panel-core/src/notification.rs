use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default display duration for a notification.
pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_millis(5000);

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Danger,
    Warning,
    Info,
}

impl NotificationLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Danger => "danger",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }

    /// Full class list of the alert node for this level.
    pub fn alert_classes(self) -> String {
        format!("alert alert-{} alert-dismissible fade show", self.as_str())
    }
}

pub type NotificationId = u64;

/// A transient message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub level: NotificationLevel,
    pub text: String,
    pub ttl: Duration,
}

/// Live notifications in display order. New entries are appended; each one
/// is removed independently by id, and removing twice is harmless.
pub struct NotificationQueue {
    live: Vec<Notification>,
    next_id: NotificationId,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self {
            live: Vec::new(),
            next_id: 1,
        }
    }

    /// Append a notification and return a copy of it.
    pub fn push(&mut self, level: NotificationLevel, text: String, ttl: Duration) -> Notification {
        let notification = Notification {
            id: self.next_id,
            level,
            text,
            ttl,
        };
        self.next_id += 1;
        self.live.push(notification.clone());
        notification
    }

    /// Remove by id. Returns `None` when it was already gone.
    pub fn remove(&mut self, id: NotificationId) -> Option<Notification> {
        let index = self.live.iter().position(|n| n.id == id)?;
        Some(self.live.remove(index))
    }

    pub fn get(&self, id: NotificationId) -> Option<&Notification> {
        self.live.iter().find(|n| n.id == id)
    }

    pub fn live(&self) -> &[Notification] {
        &self.live
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_assigns_increasing_ids() {
        let mut queue = NotificationQueue::new();
        let a = queue.push(NotificationLevel::Info, "a".into(), DEFAULT_NOTIFICATION_TTL);
        let b = queue.push(NotificationLevel::Success, "b".into(), DEFAULT_NOTIFICATION_TTL);
        assert!(b.id > a.id);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.live()[0].text, "a");
        assert_eq!(queue.live()[1].text, "b");
    }

    #[test]
    fn remove_is_idempotent() {
        let mut queue = NotificationQueue::new();
        let n = queue.push(NotificationLevel::Danger, "boom".into(), DEFAULT_NOTIFICATION_TTL);
        assert!(queue.remove(n.id).is_some());
        assert!(queue.remove(n.id).is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn removing_one_keeps_the_others() {
        let mut queue = NotificationQueue::new();
        let a = queue.push(NotificationLevel::Info, "a".into(), Duration::from_millis(100));
        let b = queue.push(NotificationLevel::Info, "b".into(), Duration::from_millis(900));
        queue.remove(a.id);
        assert!(queue.get(a.id).is_none());
        assert_eq!(queue.get(b.id).map(|n| n.ttl), Some(Duration::from_millis(900)));
    }

    #[test]
    fn alert_classes_follow_level() {
        assert_eq!(
            NotificationLevel::Danger.alert_classes(),
            "alert alert-danger alert-dismissible fade show"
        );
        assert_eq!(NotificationLevel::Warning.as_str(), "warning");
    }
}
