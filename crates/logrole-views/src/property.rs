//! Field names a view can be asked about.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A resource field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    Sid,
    DateCreated,
    Status,
    Direction,
    From,
    To,
    Body,
    NumMedia,
    Media,
    Duration,
}

impl Property {
    /// The provider-style field name.
    pub const fn name(&self) -> &'static str {
        match self {
            Property::Sid => "Sid",
            Property::DateCreated => "DateCreated",
            Property::Status => "Status",
            Property::Direction => "Direction",
            Property::From => "From",
            Property::To => "To",
            Property::Body => "Body",
            Property::NumMedia => "NumMedia",
            Property::Media => "Media",
            Property::Duration => "Duration",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The name does not match any known field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown property: {0}")]
pub struct UnknownProperty(pub String);

impl FromStr for Property {
    type Err = UnknownProperty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Sid" => Property::Sid,
            "DateCreated" => Property::DateCreated,
            "Status" => Property::Status,
            "Direction" => Property::Direction,
            "From" => Property::From,
            "To" => Property::To,
            "Body" => Property::Body,
            "NumMedia" => Property::NumMedia,
            "Media" => Property::Media,
            "Duration" => Property::Duration,
            other => return Err(UnknownProperty(other.to_string())),
        })
    }
}
