//! Transient shopper-facing messages ("toasts").
//!
//! Fire-and-forget: a notifier never fails and never blocks the cart.

use std::sync::Mutex;

use tracing::{info, warn};

/// Default auto-dismiss delay.
pub const DEFAULT_AUTO_HIDE_MS: u64 = 2000;

pub const ADDED_TO_CART: &str = "Added to cart!";
pub const REMOVED_FROM_CART: &str = "Removed from cart";
pub const ORDER_CREATED: &str = "Order created!";
pub const PAYMENT_CAPTURED: &str = "Payment received, thank you!";
pub const PAYMENT_FAILED: &str = "Payment could not be completed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationVariant {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub variant: NotificationVariant,
    /// Auto-dismiss delay in milliseconds.
    pub auto_hide_ms: u64,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Notification {
            message: message.into(),
            variant: NotificationVariant::Success,
            auto_hide_ms: DEFAULT_AUTO_HIDE_MS,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notification {
            message: message.into(),
            variant: NotificationVariant::Error,
            auto_hide_ms: DEFAULT_AUTO_HIDE_MS,
        }
    }
}

/// Sink for transient notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log. Used by headless clients.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.variant {
            NotificationVariant::Error | NotificationVariant::Warning => {
                warn!(message = %notification.message, "Notification")
            }
            _ => info!(message = %notification.message, "Notification"),
        }
    }
}

/// Keeps every notification in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        RecordingNotifier::default()
    }

    /// Everything notified so far, oldest first.
    pub fn sent(&self) -> Vec<Notification> {
        match self.sent.lock() {
            Ok(sent) => sent.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.sent().into_iter().map(|n| n.message).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        match self.sent.lock() {
            Ok(mut sent) => sent.push(notification),
            Err(poisoned) => poisoned.into_inner().push(notification),
        }
    }
}

impl<T: Notifier + ?Sized> Notifier for std::sync::Arc<T> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier_keeps_order() {
        let notifier = RecordingNotifier::new();
        notifier.notify(Notification::success(ADDED_TO_CART));
        notifier.notify(Notification::error(REMOVED_FROM_CART));

        let sent = notifier.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].variant, NotificationVariant::Success);
        assert_eq!(sent[1].variant, NotificationVariant::Error);
        assert_eq!(sent[1].auto_hide_ms, 2000);
    }
}
