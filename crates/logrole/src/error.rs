//! Error types for the view client.

use std::time::Duration;

use logrole_cursor::CursorError;
use logrole_perms::PermsError;
use logrole_provider::ProviderError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur while serving a view.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// The user may not see the resource, or it is past the age cutoff.
    #[error("permission error: {0}")]
    Permission(#[from] PermsError),

    /// A `next` cursor or media token failed to decode.
    #[error("decode error: {0}")]
    Decode(#[from] CursorError),

    /// Bad query input: unknown or duplicate key, malformed value, or a
    /// cursor naming the wrong collection.
    #[error("validation error: {0}")]
    Validation(String),

    /// The resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The provider failed for a reason other than a missing resource.
    #[error("upstream error: {0}")]
    Upstream(ProviderError),

    /// The request deadline passed before the provider answered.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// No identity with that name.
    #[error("unknown user: {0}")]
    UnknownUser(String),

    /// Settings failed validation.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl From<ProviderError> for ViewerError {
    fn from(e: ProviderError) -> Self {
        if e.is_not_found() {
            ViewerError::NotFound(e.message)
        } else {
            ViewerError::Upstream(e)
        }
    }
}

impl ViewerError {
    /// Classify for the response layer.
    pub fn outcome(&self) -> Outcome {
        match self {
            ViewerError::Permission(e) => Outcome::Forbidden(e.to_string()),
            ViewerError::UnknownUser(_) => Outcome::Forbidden(ACCESS_DENIED.to_string()),
            ViewerError::Decode(CursorError::Encryption | CursorError::InvalidKey(_)) => {
                Outcome::ServerError
            }
            ViewerError::Decode(CursorError::Expired) => {
                Outcome::BadRequest("This link has expired".to_string())
            }
            ViewerError::Decode(_) => {
                Outcome::BadRequest("Could not decode the page token".to_string())
            }
            ViewerError::Validation(msg) => Outcome::BadRequest(msg.clone()),
            ViewerError::NotFound(_) => Outcome::NotFound,
            ViewerError::Upstream(e) => match e.status {
                Some(400) => Outcome::BadRequest(e.message.clone()),
                Some(401) | Some(403) => Outcome::Forbidden(ACCESS_DENIED.to_string()),
                Some(404) => Outcome::NotFound,
                _ => Outcome::ServerError,
            },
            ViewerError::Timeout(_) | ViewerError::Config(_) => Outcome::ServerError,
        }
    }
}

const ACCESS_DENIED: &str = "Access denied";

/// The response class of a failed request, with a message safe to show the
/// user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    BadRequest(String),
    Forbidden(String),
    NotFound,
    ServerError,
}

impl Outcome {
    pub const fn status_code(&self) -> u16 {
        match self {
            Outcome::BadRequest(_) => 400,
            Outcome::Forbidden(_) => 403,
            Outcome::NotFound => 404,
            Outcome::ServerError => 500,
        }
    }

    pub const fn title(&self) -> &'static str {
        match self {
            Outcome::BadRequest(_) => "Bad Request",
            Outcome::Forbidden(_) => "Forbidden",
            Outcome::NotFound => "Not Found",
            Outcome::ServerError => "Server Error",
        }
    }

    /// The message to render. Server errors never carry detail.
    pub fn message(&self) -> &str {
        match self {
            Outcome::BadRequest(msg) | Outcome::Forbidden(msg) => msg,
            Outcome::NotFound => "The requested resource was not found",
            Outcome::ServerError => "Something went wrong, please try again later",
        }
    }
}

/// Result type for view client operations.
pub type Result<T> = std::result::Result<T, ViewerError>;
