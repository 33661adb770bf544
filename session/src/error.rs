//! Error taxonomy for session and profile operations.
//!
//! UI layers only ever show `err.to_string()`, so every variant's `Display`
//! is the final user-facing message. The variant itself is kept for logging
//! and for the store's invalid-token policy.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Fallback when a rejected response carries no usable message.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";

/// Error returned by transports, validation, and store transitions.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Local validation failed before any network call was attempted.
    #[error("{0}")]
    Validation(String),
    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    /// No response was received.
    #[error("Network error occurred")]
    Network(String),
    /// A 2xx response body did not match the expected shape.
    #[error("Unexpected response from server")]
    Decode(String),
    /// An operation needing a bearer token ran without one.
    #[error("Not authenticated")]
    NotAuthenticated,
    /// The transport has no backing implementation in this build (SSR).
    #[error("not available on server")]
    Unavailable,
}

impl SessionError {
    /// Build a validation error from a static or owned message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// HTTP status of a server rejection, if this is one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the server told us the bearer token no longer identifies a user.
    #[must_use]
    pub fn is_invalid_token(&self) -> bool {
        matches!(self.status(), Some(401 | 403 | 404))
    }
}
