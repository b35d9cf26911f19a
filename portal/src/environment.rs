//! Environment dependencies injected into the portal reducers.

use crate::types::{Notification, NotificationLevel};
use bookfair_core::environment::Clock;
use std::sync::{Arc, Mutex};

/// The transient notification surface ("toasts").
///
/// Reducers never call this directly; they return an effect that does.
pub trait Notifier: Send + Sync {
    /// Show a notification to the user
    fn notify(&self, notification: &Notification);
}

/// Logs notifications through `tracing` and echoes them to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier {
    /// Also print to stdout (the interactive shell does)
    pub echo: bool,
}

impl Notifier for TracingNotifier {
    fn notify(&self, notification: &Notification) {
        match notification.level {
            NotificationLevel::Success => {
                tracing::info!(message = %notification.message, "notification");
            },
            NotificationLevel::Error => {
                tracing::warn!(message = %notification.message, "notification");
            },
        }
        if self.echo {
            println!("{notification}");
        }
    }
}

/// Captures notifications for assertions in tests.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// Creates an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything notified so far, oldest first
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        match self.seen.lock() {
            Ok(seen) => seen.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Messages only, oldest first
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.notifications().into_iter().map(|n| n.message).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) {
        match self.seen.lock() {
            Ok(mut seen) => seen.push(notification.clone()),
            Err(poisoned) => poisoned.into_inner().push(notification.clone()),
        }
    }
}

/// Environment dependencies for the portal reducers
#[derive(Clone)]
pub struct PortalEnvironment {
    /// Clock for reservation timestamps
    pub clock: Arc<dyn Clock>,
    /// Notification surface
    pub notifier: Arc<dyn Notifier>,
}

impl PortalEnvironment {
    /// Creates a new `PortalEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, notifier: Arc<dyn Notifier>) -> Self {
        Self { clock, notifier }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_keeps_order() {
        let recorder = RecordingNotifier::new();
        recorder.notify(&Notification::error("first"));
        recorder.notify(&Notification::success("second"));

        assert_eq!(recorder.messages(), vec!["first", "second"]);
        assert!(recorder.notifications()[0].is_error());
    }
}
