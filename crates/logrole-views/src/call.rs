//! Permission-checked call view.

use std::sync::Arc;

use logrole_perms::{Permission, PermsError, Result, User};
use logrole_provider::CallResource;
use serde::Serialize;

use crate::property::Property;

/// A call the user is allowed to know exists.
#[derive(Debug, Clone)]
pub struct CallView {
    call: CallResource,
    user: Arc<User>,
}

impl CallView {
    /// Wrap a raw call, failing with `TooOld` or `PermissionDenied`.
    pub fn new(
        call: CallResource,
        user: Arc<User>,
        permission: &Permission,
        now: i64,
    ) -> Result<Self> {
        permission.check_age(call.date_created, now)?;
        if !user.can_view_calls() {
            return Err(PermsError::PermissionDenied);
        }
        Ok(Self { call, user })
    }

    pub fn can_view_property(&self, name: &str) -> bool {
        match name.parse::<Property>() {
            Ok(property) => self.can_view(property),
            Err(_) => false,
        }
    }

    pub fn can_view(&self, property: Property) -> bool {
        match property {
            Property::Sid
            | Property::DateCreated
            | Property::Status
            | Property::Direction
            | Property::Duration => self.user.can_view_calls(),
            Property::From => self.user.can_view_call_from(),
            Property::To => self.user.can_view_call_to(),
            Property::Body | Property::NumMedia | Property::Media => false,
        }
    }

    fn check(&self, property: Property) -> Result<()> {
        if self.can_view(property) {
            Ok(())
        } else {
            Err(PermsError::PermissionDenied)
        }
    }

    pub fn sid(&self) -> &str {
        &self.call.sid
    }

    pub fn date_created(&self) -> i64 {
        self.call.date_created
    }

    pub fn status(&self) -> &str {
        &self.call.status
    }

    pub fn direction(&self) -> &str {
        &self.call.direction
    }

    /// Call length in seconds; `None` while the call is in progress.
    pub fn duration(&self) -> Result<Option<u32>> {
        self.check(Property::Duration)?;
        Ok(self.call.duration)
    }

    pub fn from(&self) -> Result<&str> {
        self.check(Property::From)?;
        Ok(&self.call.from)
    }

    pub fn to(&self) -> Result<&str> {
        self.check(Property::To)?;
        Ok(&self.call.to)
    }

    pub fn redacted(&self) -> RedactedCall {
        RedactedCall {
            sid: self.sid().to_string(),
            date_created: self.date_created(),
            status: self.status().to_string(),
            direction: self.direction().to_string(),
            duration: self.duration().ok().flatten(),
            from: self.from().ok().map(str::to_string),
            to: self.to().ok().map(str::to_string),
        }
    }
}

/// A call with hidden fields removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedactedCall {
    pub sid: String,
    pub date_created: i64,
    pub status: String,
    pub direction: String,
    pub duration: Option<u32>,
    pub from: Option<String>,
    pub to: Option<String>,
}
