//! # Logrole Permissions
//!
//! Capabilities and the resource-age policy.
//!
//! ## Overview
//!
//! Every request is evaluated against two independent rules:
//!
//! - **Capabilities**: boolean flags on a [`User`] that gate visibility of a
//!   resource class (messages, calls) or of one field (From, To, Body, ...).
//! - **Resource age**: a process-wide [`Permission`] that hides anything older
//!   than a configured duration, no matter which capabilities a user holds.
//!
//! ## Composition
//!
//! Capabilities compose top-down. A field capability is only effective when
//! its parent capability is also set, and the effective value is computed on
//! every call from the raw flags:
//!
//! ```rust
//! use logrole_perms::{User, UserSettings};
//!
//! let user = User::new(UserSettings {
//!     can_view_messages: false,
//!     can_view_message_from: true,
//!     ..UserSettings::default()
//! });
//!
//! // The parent flag wins.
//! assert!(!user.can_view_message_from());
//! ```
//!
//! ## Identity Lookup
//!
//! Users are resolved by name through the [`UserFinder`] trait rather than a
//! global registry. [`UserMap`] is the in-memory implementation.

pub mod error;
pub mod identity;
pub mod permission;
pub mod user;

pub use error::{PermsError, Result};
pub use identity::{UserFinder, UserMap};
pub use permission::Permission;
pub use user::{User, UserSettings};
