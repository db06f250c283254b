//! Notification fan-out (mechanics only).

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use crate::notification::Notification;

/// A subscription to the notification stream.
///
/// Each subscription receives a copy of every notification published after it
/// was created. Meant for a single consumer (the toast renderer, a test).
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, std::sync::mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, std::sync::mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Everything queued right now, without blocking.
    pub fn drain(&self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }
}

/// Fire-and-forget user feedback.
///
/// `notify` never fails from the caller's point of view: a toast that cannot be
/// shown is not a reason to undo the action that produced it.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);

    fn subscribe(&self) -> Subscription<Notification>;
}

impl<N> Notifier for Arc<N>
where
    N: Notifier + ?Sized,
{
    fn notify(&self, notification: Notification) {
        (**self).notify(notification)
    }

    fn subscribe(&self) -> Subscription<Notification> {
        (**self).subscribe()
    }
}
