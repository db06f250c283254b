use serde::{Deserialize, Serialize};

/// Visual weight of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Info,
    Success,
    Warning,
    /// A destructive action was refused by a guard.
    Blocked,
}

impl Tone {
    /// Display duration in milliseconds. Blocking messages linger longer.
    pub fn duration_ms(self) -> u32 {
        match self {
            Tone::Blocked => 5_000,
            _ => 3_000,
        }
    }
}

/// A toast message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub tone: Tone,
    pub duration_ms: u32,
}

impl Notification {
    pub fn new(tone: Tone, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            tone,
            duration_ms: tone.duration_ms(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Tone::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Tone::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Tone::Warning, message)
    }

    pub fn blocked(message: impl Into<String>) -> Self {
        Self::new(Tone::Blocked, message)
    }
}
