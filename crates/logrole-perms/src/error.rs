//! Error types for the permissions module.

use thiserror::Error;

/// Reasons a resource or one of its fields is hidden from a user.
///
/// Both variants end up as a "forbidden" response. They are kept apart so the
/// caller can log them differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PermsError {
    /// A capability check failed.
    #[error("You do not have permission to access that information")]
    PermissionDenied,

    /// The resource is older than the configured maximum age.
    #[error("Cannot access this resource because its age exceeds the viewable limit")]
    TooOld,
}

impl PermsError {
    /// Short machine-readable reason, used as a log field.
    pub const fn reason(&self) -> &'static str {
        match self {
            PermsError::PermissionDenied => "permission_denied",
            PermsError::TooOld => "too_old",
        }
    }
}

/// Result type for permission checks.
pub type Result<T> = std::result::Result<T, PermsError>;
