//! Advisory user notifications.
//!
//! The stages never fail toward the caller for recoverable problems; they
//! report them here instead. Hosts plug in whatever surface they have (an
//! editor panel, a status bar); the default just logs through tracing.

use tracing::{info, warn};

/// How prominent the notice should be. These are advisories, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// Sink for user-facing notices — implement for any host surface.
pub trait Notifier: Send + Sync {
    fn notify(&self, level: NoticeLevel, message: &str);

    fn info(&self, message: &str) {
        self.notify(NoticeLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.notify(NoticeLevel::Warning, message);
    }
}

/// Log-based notifier — uses tracing, zero external deps.
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for LogNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Info => info!(notice = %message, "user.notice"),
            NoticeLevel::Warning => warn!(notice = %message, "user.notice"),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{NoticeLevel, Notifier};
    use std::sync::Mutex;

    /// Captures notices so tests can assert on what the user would have seen.
    #[derive(Default)]
    pub struct RecordingNotifier {
        pub notices: Mutex<Vec<(NoticeLevel, String)>>,
    }

    impl RecordingNotifier {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn messages(&self) -> Vec<String> {
            self.notices
                .lock()
                .unwrap()
                .iter()
                .map(|(_, m)| m.clone())
                .collect()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, level: NoticeLevel, message: &str) {
            self.notices
                .lock()
                .unwrap()
                .push((level, message.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingNotifier;
    use super::*;

    #[test]
    fn recording_notifier_captures_in_order() {
        let notifier = RecordingNotifier::new();
        notifier.info("first");
        notifier.warn("second");
        let notices = notifier.notices.lock().unwrap();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0], (NoticeLevel::Info, "first".to_string()));
        assert_eq!(notices[1], (NoticeLevel::Warning, "second".to_string()));
    }

    #[test]
    fn log_notifier_does_not_panic() {
        LogNotifier::new().info("hello");
        LogNotifier::new().warn("world");
    }
}
