//! Error types for the cursor codec.

use thiserror::Error;

/// Errors that can occur while sealing or opening a token.
#[derive(Debug, Error)]
pub enum CursorError {
    /// The token is not URL-safe, unpadded base64.
    #[error("invalid token encoding: {0}")]
    Encoding(#[from] base64::DecodeError),

    /// The decoded token cannot hold a nonce and a tag.
    #[error("token too short: {len} bytes, need at least {min}")]
    TooShort { len: usize, min: usize },

    /// Authentication failed: wrong key, or the token was modified.
    #[error("token failed authentication")]
    Authentication,

    /// The plaintext is not UTF-8.
    #[error("token plaintext is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// The plaintext does not have the expected structure.
    #[error("malformed token payload: {0}")]
    Malformed(String),

    /// The token is past its expiry.
    #[error("token expired")]
    Expired,

    /// Key material is unusable.
    #[error("invalid secret key: {0}")]
    InvalidKey(String),

    /// Encryption failed.
    #[error("encryption error")]
    Encryption,
}

/// Result type for cursor operations.
pub type Result<T> = std::result::Result<T, CursorError>;
