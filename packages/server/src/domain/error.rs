//! Domain errors.

use thiserror::Error;

/// Input that fails the shape rules of a value object.
///
/// The display text is sent back to the client as-is in an `error` event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Username is required")]
    EmptyUsername,

    #[error("Username must be between {min} and {max} characters")]
    UsernameLength { min: usize, max: usize, actual: usize },

    #[error("Username contains invalid characters")]
    UsernameCharset,

    #[error("Room is required")]
    EmptyRoom,

    #[error("Message is empty")]
    EmptyMessage,

    #[error("Please keep messages under {max} characters")]
    MessageTooLong { max: usize, actual: usize },
}

/// Session store errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// No active session for the connection
    #[error("Session for connection '{0}' not found")]
    SessionNotFound(String),

    /// The connection sent a message before its minimum interval elapsed
    #[error("Rate limited, retry after {retry_after_ms} ms")]
    RateLimited { retry_after_ms: i64 },
}

/// Outbound delivery errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("Client '{0}' not found")]
    ClientNotFound(String),

    #[error("Failed to push message: {0}")]
    PushFailed(String),
}
