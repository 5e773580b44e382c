//! Toast notifications stacked in the corner of the screen

use std::time::{Duration, Instant};

use crate::quiz::Notice;

/// How long a toast stays up
pub const TOAST_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct Toast {
    pub notice: Notice,
    /// Wall-clock time shown next to the message
    pub timestamp: String,
    shown_at: Instant,
}

#[derive(Debug, Clone, Default)]
pub struct Toasts {
    items: Vec<Toast>,
}

impl Toasts {
    pub fn push(&mut self, notice: Notice) {
        self.push_at(notice, Instant::now());
    }

    pub fn push_at(&mut self, notice: Notice, now: Instant) {
        self.items.push(Toast {
            notice,
            timestamp: chrono::Local::now().format("%H:%M:%S").to_string(),
            shown_at: now,
        });
    }

    /// Drop toasts older than [`TOAST_TTL`]. Returns whether any went away.
    pub fn expire(&mut self, now: Instant) -> bool {
        let before = self.items.len();
        self.items
            .retain(|t| now.saturating_duration_since(t.shown_at) < TOAST_TTL);
        self.items.len() != before
    }

    /// Newest last
    pub fn visible(&self) -> &[Toast] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::NoticeLevel;

    #[test]
    fn test_toasts_expire_after_ttl() {
        let start = Instant::now();
        let mut toasts = Toasts::default();
        toasts.push_at(Notice::new(NoticeLevel::Info, "Restored 2 answer(s)"), start);
        toasts.push_at(
            Notice::new(NoticeLevel::Warning, "later"),
            start + Duration::from_secs(3),
        );

        assert!(!toasts.expire(start + Duration::from_millis(4999)));
        assert_eq!(toasts.visible().len(), 2);

        assert!(toasts.expire(start + TOAST_TTL));
        assert_eq!(toasts.visible().len(), 1);
        assert_eq!(toasts.visible()[0].notice.message, "later");

        toasts.expire(start + Duration::from_secs(8));
        assert!(toasts.is_empty());
    }
}
