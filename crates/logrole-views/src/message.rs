//! Permission-checked message view.

use std::sync::Arc;

use logrole_perms::{Permission, PermsError, Result, User};
use logrole_provider::MessageResource;
use serde::Serialize;

use crate::property::Property;

/// A message the user is allowed to know exists.
///
/// Construction runs the resource gate. Restricted fields are checked again
/// on every read.
#[derive(Debug, Clone)]
pub struct MessageView {
    message: MessageResource,
    user: Arc<User>,
}

impl MessageView {
    /// Wrap a raw message, failing with `TooOld` or `PermissionDenied`.
    ///
    /// `now` is the current time in Unix milliseconds.
    pub fn new(
        message: MessageResource,
        user: Arc<User>,
        permission: &Permission,
        now: i64,
    ) -> Result<Self> {
        permission.check_age(message.date_created, now)?;
        if !user.can_view_messages() {
            return Err(PermsError::PermissionDenied);
        }
        Ok(Self { message, user })
    }

    /// Whether the user may read the named field. Unknown names are hidden.
    pub fn can_view_property(&self, name: &str) -> bool {
        match name.parse::<Property>() {
            Ok(property) => self.can_view(property),
            Err(_) => false,
        }
    }

    pub fn can_view(&self, property: Property) -> bool {
        match property {
            Property::Sid | Property::DateCreated | Property::Status | Property::Direction => {
                self.user.can_view_messages()
            }
            Property::From => self.user.can_view_message_from(),
            Property::To => self.user.can_view_message_to(),
            Property::Body => self.user.can_view_message_body(),
            Property::NumMedia | Property::Media => self.user.can_view_num_media(),
            Property::Duration => false,
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
        &self.message.sid
    }

    /// Creation time (Unix ms).
    pub fn date_created(&self) -> i64 {
        self.message.date_created
    }

    pub fn status(&self) -> &str {
        &self.message.status
    }

    pub fn direction(&self) -> &str {
        &self.message.direction
    }

    pub fn from(&self) -> Result<&str> {
        self.check(Property::From)?;
        Ok(&self.message.from)
    }

    pub fn to(&self) -> Result<&str> {
        self.check(Property::To)?;
        Ok(&self.message.to)
    }

    pub fn body(&self) -> Result<&str> {
        self.check(Property::Body)?;
        Ok(&self.message.body)
    }

    /// Number of attached media. Hidden counts are an error, not zero.
    pub fn num_media(&self) -> Result<u32> {
        self.check(Property::NumMedia)?;
        Ok(self.message.num_media)
    }

    /// Snapshot with every hidden field set to `None`, for rendering.
    pub fn redacted(&self) -> RedactedMessage {
        RedactedMessage {
            sid: self.sid().to_string(),
            date_created: self.date_created(),
            status: self.status().to_string(),
            direction: self.direction().to_string(),
            from: self.from().ok().map(str::to_string),
            to: self.to().ok().map(str::to_string),
            body: self.body().ok().map(str::to_string),
            num_media: self.num_media().ok(),
        }
    }
}

/// A message with hidden fields removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedactedMessage {
    pub sid: String,
    pub date_created: i64,
    pub status: String,
    pub direction: String,
    pub from: Option<String>,
    pub to: Option<String>,
    pub body: Option<String>,
    pub num_media: Option<u32>,
}
