//! Transient, self-expiring messages raised by the form store.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

/// Source of the current time for notification expiry.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub text: String,
    pub kind: NotificationKind,
    pub expires_at: DateTime<Utc>,
}

impl Notification {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Holds at most one notification. Posting a new one replaces the pending one and
/// restarts the expiry window.
#[derive(Debug, Clone)]
pub struct NotificationSlot {
    current: Option<Notification>,
    ttl: Duration,
}

impl NotificationSlot {
    pub fn new(ttl: Duration) -> Self {
        Self { current: None, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn post(&mut self, text: impl Into<String>, kind: NotificationKind, now: DateTime<Utc>) {
        self.current = Some(Notification {
            text: text.into(),
            kind,
            expires_at: now + self.ttl,
        });
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    /// Clears the notification when it has expired. Returns true if one was cleared.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        match &self.current {
            Some(notification) if notification.is_expired(now) => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn notification_expires_after_ttl() {
        let mut slot = NotificationSlot::new(Duration::seconds(5));
        slot.post("saved", NotificationKind::Success, start());
        assert!(!slot.tick(start() + Duration::seconds(4)));
        assert!(slot.current().is_some());
        assert!(slot.tick(start() + Duration::seconds(5)));
        assert!(slot.current().is_none());
    }

    #[test]
    fn newer_notification_restarts_the_window() {
        let mut slot = NotificationSlot::new(Duration::seconds(5));
        slot.post("first", NotificationKind::Success, start());
        slot.post("second", NotificationKind::Error, start() + Duration::seconds(4));
        assert!(!slot.tick(start() + Duration::seconds(6)));
        let current = slot.current().unwrap();
        assert_eq!(current.text, "second");
        assert_eq!(current.kind, NotificationKind::Error);
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::starting_at(start());
        let handle = clock.clone();
        handle.advance(Duration::seconds(3));
        assert_eq!(clock.now(), start() + Duration::seconds(3));
    }
}
