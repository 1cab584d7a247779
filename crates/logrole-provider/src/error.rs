//! Error types for provider calls.

use thiserror::Error;

/// An error returned by the provider.
///
/// `status` is the HTTP status the provider answered with, when there was
/// one. Transport failures (connection refused, timeouts inside the client)
/// have no status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("provider error: {message}")]
pub struct ProviderError {
    pub status: Option<u16>,
    pub message: String,
}

impl ProviderError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// A failure with no HTTP status.
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(400, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(403, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(404, message)
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(500, message)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}

/// Result type for provider calls.
pub type Result<T> = std::result::Result<T, ProviderError>;
