//! Users and their capabilities.

use serde::{Deserialize, Serialize};

/// Raw capability flags, as read from configuration.
///
/// These are the flags a [`User`] is built from. They are not effective on
/// their own: see [`User`] for how they compose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub can_view_messages: bool,
    pub can_view_message_from: bool,
    pub can_view_message_to: bool,
    pub can_view_message_body: bool,
    pub can_view_num_media: bool,

    pub can_view_calls: bool,
    pub can_view_call_from: bool,
    pub can_view_call_to: bool,
}

impl UserSettings {
    /// Settings with the widest possible set of permissions.
    pub const fn all() -> Self {
        Self {
            can_view_messages: true,
            can_view_message_from: true,
            can_view_message_to: true,
            can_view_message_body: true,
            can_view_num_media: true,
            can_view_calls: true,
            can_view_call_from: true,
            can_view_call_to: true,
        }
    }
}

/// An authenticated identity and what it may see.
///
/// Immutable after construction. Each sub-capability accessor returns
/// `parent && own`, evaluated on every call, so the parent flag stays the
/// single source of truth.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    can_view_messages: bool,
    can_view_message_from: bool,
    can_view_message_to: bool,
    can_view_message_body: bool,
    can_view_num_media: bool,

    can_view_calls: bool,
    can_view_call_from: bool,
    can_view_call_to: bool,
}

impl User {
    /// Build a user from raw settings.
    pub fn new(settings: UserSettings) -> Self {
        Self {
            can_view_messages: settings.can_view_messages,
            can_view_message_from: settings.can_view_message_from,
            can_view_message_to: settings.can_view_message_to,
            can_view_message_body: settings.can_view_message_body,
            can_view_num_media: settings.can_view_num_media,
            can_view_calls: settings.can_view_calls,
            can_view_call_from: settings.can_view_call_from,
            can_view_call_to: settings.can_view_call_to,
        }
    }

    /// A user holding every capability.
    pub fn all() -> Self {
        Self::new(UserSettings::all())
    }

    pub fn can_view_messages(&self) -> bool {
        self.can_view_messages
    }

    pub fn can_view_message_from(&self) -> bool {
        self.can_view_messages() && self.can_view_message_from
    }

    pub fn can_view_message_to(&self) -> bool {
        self.can_view_messages() && self.can_view_message_to
    }

    pub fn can_view_message_body(&self) -> bool {
        self.can_view_messages() && self.can_view_message_body
    }

    pub fn can_view_num_media(&self) -> bool {
        self.can_view_messages() && self.can_view_num_media
    }

    pub fn can_view_calls(&self) -> bool {
        self.can_view_calls
    }

    pub fn can_view_call_from(&self) -> bool {
        self.can_view_calls() && self.can_view_call_from
    }

    pub fn can_view_call_to(&self) -> bool {
        self.can_view_calls() && self.can_view_call_to
    }
}

impl From<UserSettings> for User {
    fn from(settings: UserSettings) -> Self {
        Self::new(settings)
    }
}
