//! The process-wide resource-age policy.

use std::time::Duration;

use crate::error::{PermsError, Result};

/// Policy applied to every resource regardless of who is asking.
///
/// A resource created before `now - max_resource_age` is never exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permission {
    max_resource_age: Duration,
}

impl Permission {
    pub const fn new(max_resource_age: Duration) -> Self {
        Self { max_resource_age }
    }

    pub const fn max_resource_age(&self) -> Duration {
        self.max_resource_age
    }

    /// The oldest creation time (Unix ms) still viewable at `now`.
    pub fn cutoff(&self, now: i64) -> i64 {
        let age = i64::try_from(self.max_resource_age.as_millis()).unwrap_or(i64::MAX);
        now.saturating_sub(age)
    }

    /// Check a creation timestamp (Unix ms) against the policy.
    pub fn check_age(&self, created_at: i64, now: i64) -> Result<()> {
        if created_at < self.cutoff(now) {
            return Err(PermsError::TooOld);
        }
        Ok(())
    }
}
