//! User-feedback collaborators used by the entity screens.
//!
//! Screens never talk to a UI toolkit directly. They depend on three small
//! contracts instead:
//!
//! - [`Notifier`]: fire-and-forget toasts
//! - [`Confirm`]: blocking yes/no prompt before destructive actions
//! - [`DialogHost`]: create/edit request answered later with a typed outcome

pub mod bus;
pub mod confirm;
pub mod dialog;
pub mod in_memory;
pub mod notification;

pub use bus::{Notifier, Subscription};
pub use confirm::{AlwaysConfirm, Confirm, ScriptedConfirm};
pub use dialog::{
    DialogHost, DialogResponder, EditOutcome, EditRequest, PendingEdit, RespondError, ScriptedDialog,
};
pub use in_memory::InMemoryNotifier;
pub use notification::{Notification, Tone};
