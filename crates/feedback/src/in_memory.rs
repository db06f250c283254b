//! In-memory notifier for tests/dev.

use std::sync::{Mutex, mpsc};

use crate::bus::{Notifier, Subscription};
use crate::notification::Notification;

/// In-memory pub/sub notifier that also keeps a history of everything sent.
///
/// - No IO / no async
/// - Best-effort fan-out
#[derive(Debug, Default)]
pub struct InMemoryNotifier {
    subscribers: Mutex<Vec<mpsc::Sender<Notification>>>,
    history: Mutex<Vec<Notification>>,
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every notification published so far, oldest first.
    pub fn history(&self) -> Vec<Notification> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<Notification> {
        self.history.lock().ok().and_then(|h| h.last().cloned())
    }
}

impl Notifier for InMemoryNotifier {
    fn notify(&self, notification: Notification) {
        tracing::debug!(tone = ?notification.tone, message = %notification.message, "notify");

        if let Ok(mut subs) = self.subscribers.lock() {
            // Drop any dead subscribers while publishing.
            subs.retain(|tx| tx.send(notification.clone()).is_ok());
        }
        if let Ok(mut history) = self.history.lock() {
            history.push(notification);
        }
    }

    fn subscribe(&self) -> Subscription<Notification> {
        let (tx, rx) = mpsc::channel();

        // If the lock is poisoned, we still return a subscription;
        // it just won't receive messages.
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }

        Subscription::new(rx)
    }
}
