//! Notification center: at most one transient message at a time.
//!
//! Expiry is not checked here. Whoever shows a notification schedules a
//! `NotificationExpired(id)` event and feeds it back through `expire`, which
//! only clears the slot when the id still matches.

use std::time::{Duration, Instant};

pub const NOTIFICATION_LIFETIME: Duration = Duration::from_secs(5);

/// Generation stamp; every `show` hands out a fresh one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: NotificationId,
    pub text: String,
    pub severity: Severity,
    pub created: Instant,
}

#[derive(Debug, Default)]
pub struct NotificationCenter {
    current: Option<Notification>,
    next_id: u64,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace whatever is showing with a new notification.
    pub fn show(&mut self, text: impl Into<String>, severity: Severity) -> NotificationId {
        self.next_id += 1;
        let id = NotificationId(self.next_id);
        self.current = Some(Notification {
            id,
            text: text.into(),
            severity,
            created: Instant::now(),
        });
        id
    }

    pub fn error(&mut self, text: impl Into<String>) -> NotificationId {
        self.show(text, Severity::Error)
    }

    pub fn success(&mut self, text: impl Into<String>) -> NotificationId {
        self.show(text, Severity::Success)
    }

    pub fn info(&mut self, text: impl Into<String>) -> NotificationId {
        self.show(text, Severity::Info)
    }

    /// Clear the notification if it is still `id`. Returns whether anything
    /// was cleared.
    pub fn expire(&mut self, id: NotificationId) -> bool {
        match &self.current {
            Some(n) if n.id == id => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_replaces_current() {
        let mut center = NotificationCenter::new();
        center.error("first");
        center.success("second");
        let n = center.current().unwrap();
        assert_eq!(n.text, "second");
        assert_eq!(n.severity, Severity::Success);
    }

    #[test]
    fn test_stale_expiry_keeps_newer_notification() {
        let mut center = NotificationCenter::new();
        let first = center.error("first");
        let second = center.info("second");
        assert_ne!(first, second);

        assert!(!center.expire(first));
        assert_eq!(center.current().unwrap().text, "second");

        assert!(center.expire(second));
        assert!(center.current().is_none());
        assert!(!center.expire(second));
    }

    #[test]
    fn test_dismiss() {
        let mut center = NotificationCenter::new();
        center.info("hello");
        center.dismiss();
        assert!(center.current().is_none());
    }
}
