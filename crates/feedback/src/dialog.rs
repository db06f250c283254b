//! Create/edit request-response contract.
//!
//! A screen opens a request and gets back a [`PendingEdit`]. Whoever hosts the
//! form answers through the paired [`DialogResponder`] once the user saves or
//! closes it. Dropping the responder without answering counts as a cancel.

use std::collections::VecDeque;
use std::sync::{Mutex, mpsc};

use thiserror::Error;

/// What the screen asks the form host to do.
#[derive(Debug, Clone, PartialEq)]
pub enum EditRequest<T> {
    /// Blank form for a new record.
    Create,
    /// Form pre-filled with an existing record.
    Edit(T),
}

/// How the form was closed.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome<T> {
    Saved(T),
    Cancelled,
}

impl<T> EditOutcome<T> {
    pub fn saved(self) -> Option<T> {
        match self {
            EditOutcome::Saved(v) => Some(v),
            EditOutcome::Cancelled => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RespondError {
    #[error("the requesting screen is gone")]
    RequesterGone,
}

/// Sending half: the form host answers exactly once.
#[derive(Debug)]
pub struct DialogResponder<T> {
    tx: mpsc::Sender<EditOutcome<T>>,
}

impl<T> DialogResponder<T> {
    pub fn respond(self, outcome: EditOutcome<T>) -> Result<(), RespondError> {
        self.tx.send(outcome).map_err(|_| RespondError::RequesterGone)
    }

    pub fn save(self, value: T) -> Result<(), RespondError> {
        self.respond(EditOutcome::Saved(value))
    }

    pub fn cancel(self) -> Result<(), RespondError> {
        self.respond(EditOutcome::Cancelled)
    }
}

/// Receiving half held by the screen.
#[derive(Debug)]
pub struct PendingEdit<T> {
    rx: mpsc::Receiver<EditOutcome<T>>,
}

impl<T> PendingEdit<T> {
    pub fn channel() -> (DialogResponder<T>, PendingEdit<T>) {
        let (tx, rx) = mpsc::channel();
        (DialogResponder { tx }, PendingEdit { rx })
    }

    /// An already-answered request.
    pub fn resolved(outcome: EditOutcome<T>) -> Self {
        let (responder, pending) = Self::channel();
        // The receiver is alive, so this cannot fail.
        let _ = responder.respond(outcome);
        pending
    }

    /// Block until the host answers. A vanished host means cancelled.
    pub fn wait(self) -> EditOutcome<T> {
        self.rx.recv().unwrap_or(EditOutcome::Cancelled)
    }

    /// Non-blocking poll: `None` while the form is still open.
    pub fn poll(&self) -> Option<EditOutcome<T>> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => Some(EditOutcome::Cancelled),
        }
    }
}

/// Hosts create/edit forms for records of type `T`.
pub trait DialogHost<T>: Send + Sync {
    fn open(&self, request: EditRequest<T>) -> PendingEdit<T>;
}

/// Answers requests from a queue of prepared outcomes (tests, headless runs).
///
/// An empty queue answers `Cancelled`.
#[derive(Debug)]
pub struct ScriptedDialog<T> {
    outcomes: Mutex<VecDeque<EditOutcome<T>>>,
    requests: Mutex<Vec<EditRequest<T>>>,
}

impl<T> ScriptedDialog<T> {
    pub fn new(outcomes: impl IntoIterator<Item = EditOutcome<T>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }
}

impl<T: Clone> ScriptedDialog<T> {
    pub fn requests(&self) -> Vec<EditRequest<T>> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl<T: Send> DialogHost<T> for ScriptedDialog<T> {
    fn open(&self, request: EditRequest<T>) -> PendingEdit<T> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        let outcome = self
            .outcomes
            .lock()
            .ok()
            .and_then(|mut o| o.pop_front())
            .unwrap_or(EditOutcome::Cancelled);
        PendingEdit::resolved(outcome)
    }
}
