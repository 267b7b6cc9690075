//! Error types for the notification boundary.

/// Result type for notification operations.
pub type NotifyResult<T> = Result<T, NotifyError>;

/// Errors raised while configuring or dispatching notifications.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NotifyError {
    /// A setting is missing or unusable.
    #[error("Notifier configuration error for {variable}: {reason}")]
    Config {
        variable: &'static str,
        reason: String,
    },

    /// The message failed validation before dispatch.
    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    /// The transport refused or failed to deliver the message.
    #[error("Delivery to {to} failed: {reason}")]
    Delivery { to: String, reason: String },
}
