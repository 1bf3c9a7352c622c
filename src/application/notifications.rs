//! Transient notifications shown over the current screen.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// How long a notification stays visible.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

const MAX_VISIBLE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub text: String,
}

impl Notification {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            text: text.into(),
        }
    }
}

/// Bounded queue of live notifications, newest last.
#[derive(Debug, Default)]
pub struct Notifications {
    live: VecDeque<(Notification, Instant)>,
}

impl Notifications {
    pub fn push(&mut self, notification: Notification, now: Instant) {
        if self.live.len() == MAX_VISIBLE {
            self.live.pop_front();
        }
        self.live.push_back((notification, now + NOTIFICATION_TTL));
    }

    /// Drops everything that has expired by `now`.
    pub fn expire(&mut self, now: Instant) {
        self.live.retain(|(_, expires_at)| *expires_at > now);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.live.iter().map(|(n, _)| n)
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}
