//! Provider trait: the abstract interface to the telephony API.
//!
//! This trait keeps the view engine provider-agnostic. Implementations
//! include the HTTP client used in production (outside this workspace) and
//! [`MemoryProvider`](crate::MemoryProvider) for tests.

use async_trait::async_trait;
use logrole_perms::User;

use crate::error::Result;
use crate::types::{CallPage, CallResource, Filters, MessagePage, MessageResource};

/// The Provider trait: async access to raw message and call logs.
///
/// Every call receives the requesting user so an implementation can keep
/// per-user caches. Implementations do not enforce capabilities; the view
/// layer does that.
///
/// # Design Notes
///
/// - **Status codes**: errors carry the provider's HTTP status so callers
///   can tell "not found" from "server error" without provider knowledge.
/// - **Retries**: any retry or backoff belongs in the implementation.
/// - **Caching**: a next-page fetch may be issued speculatively to warm the
///   implementation's cache; the result is then discarded.
#[async_trait]
pub trait Provider: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Messages
    // ─────────────────────────────────────────────────────────────────────────

    /// Get a message by sid.
    async fn get_message(&self, user: &User, sid: &str) -> Result<MessageResource>;

    /// Get the first page of messages matching `filters`.
    async fn get_message_page(&self, user: &User, filters: &Filters) -> Result<MessagePage>;

    /// Get the page at a provider next-page path.
    async fn get_next_message_page(&self, user: &User, next_page_uri: &str)
        -> Result<MessagePage>;

    /// Get the URLs of the media attached to a message.
    async fn get_media_urls(&self, user: &User, sid: &str) -> Result<Vec<String>>;

    // ─────────────────────────────────────────────────────────────────────────
    // Calls
    // ─────────────────────────────────────────────────────────────────────────

    /// Get a call by sid.
    async fn get_call(&self, user: &User, sid: &str) -> Result<CallResource>;

    /// Get the first page of calls matching `filters`.
    async fn get_call_page(&self, user: &User, filters: &Filters) -> Result<CallPage>;

    /// Get the page at a provider next-page path.
    async fn get_next_call_page(&self, user: &User, next_page_uri: &str) -> Result<CallPage>;
}
