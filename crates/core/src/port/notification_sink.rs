// Notification Sink Port (Interface)

/// Severity of a user-facing status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Success,
    Info,
    Error,
}

/// Fire-and-forget channel for user-facing status messages.
///
/// Implementations render toasts, print to a terminal, or drop messages
/// entirely; they must never feed back into engine state.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, message: &str, notice: Notice);
}

/// Sink that forwards messages to the tracing pipeline (production default
/// for headless use).
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&self, message: &str, notice: Notice) {
        match notice {
            Notice::Error => tracing::warn!(message = %message, "notification"),
            _ => tracing::info!(message = %message, "notification"),
        }
    }
}

/// Sink that drops every message
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&self, _message: &str, _notice: Notice) {}
}
