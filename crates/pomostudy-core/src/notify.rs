//! "Period over" notifications.
//!
//! The timer decides when to notify and which message to show; how the
//! notification is rendered belongs to the [`Notifier`] implementation.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    /// How long the notification should stay visible.
    #[serde(with = "duration_ms")]
    pub expiry: Duration,
}

impl Notification {
    /// Message shown when a period runs out.
    ///
    /// Finishing a study period is a success; the end of a break is just
    /// information.
    pub fn period_over(title: &str, finished_was_break: bool, expiry: Duration) -> Self {
        let (message, kind) = if finished_was_break {
            ("Break is over, time to study!", NotificationKind::Info)
        } else {
            ("Well done, take a break!", NotificationKind::Success)
        };
        Self {
            title: title.to_string(),
            message: message.to_string(),
            kind,
            expiry,
        }
    }
}

/// Fire-and-forget notification sink.
pub trait Notifier: Send {
    fn notify(&self, notification: &Notification);
}

/// Writes notifications to the tracing log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: &Notification) {
        tracing::info!(
            title = %notification.title,
            kind = ?notification.kind,
            "{}",
            notification.message
        );
    }
}

/// Discards every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, _notification: &Notification) {}
}

/// Keeps every notification in memory; clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(notification.clone());
        }
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}
