//! # Logrole Views
//!
//! Permission-checked wrappers around raw provider resources.
//!
//! ## Overview
//!
//! A raw [`MessageResource`](logrole_provider::MessageResource) exposes
//! everything. A [`MessageView`] exposes only what the requesting user may
//! see:
//!
//! 1. **Resource gate** (once, at construction): a resource older than the
//!    [`Permission`](logrole_perms::Permission) cutoff fails with `TooOld`;
//!    otherwise a user without the parent capability fails with
//!    `PermissionDenied`.
//! 2. **Field gate** (on every read): restricted fields return
//!    `Result<_, PermsError>` and re-check the capability each time.
//!
//! A hidden media count is an error, never `0`, so "hidden" can't be
//! mistaken for "none".
//!
//! ## Pages
//!
//! [`MessagePageView`] and [`CallPageView`] wrap a page. Provider pages are
//! newest first, so once one resource falls past the age cutoff every later
//! one does too: those resources are dropped and the next-page path is
//! cleared.

pub mod call;
pub mod message;
pub mod page;
pub mod property;

pub use call::{CallView, RedactedCall};
pub use logrole_perms::{PermsError, Result};
pub use message::{MessageView, RedactedMessage};
pub use page::{CallPageView, MessagePageView};
pub use property::{Property, UnknownProperty};
