//! # Logrole Provider
//!
//! The contract between the view engine and the telephony provider.
//!
//! ## Overview
//!
//! The engine never talks HTTP itself. It consumes the [`Provider`] trait,
//! which returns raw resources ([`MessageResource`], [`CallResource`]) and
//! pages of them, or a [`ProviderError`] carrying the HTTP status the
//! provider answered with. The status lets the engine classify failures
//! (bad request, forbidden, not found, server error) without knowing
//! anything provider-specific.
//!
//! ## Key Types
//!
//! - [`Provider`] - The async trait the engine consumes
//! - [`MemoryProvider`] - In-memory provider for tests and local development
//! - [`MessagePage`] / [`CallPage`] - A page of resources plus the provider's
//!   next-page path
//! - [`uri`] - Query-string helpers for provider paths
//!
//! ## Usage
//!
//! ```rust,no_run
//! use logrole_perms::User;
//! use logrole_provider::{Filters, MemoryProvider, Provider};
//!
//! async fn example() {
//!     let provider = MemoryProvider::new("AC58f1e8f2b1c6b88ca90a012a4be0c279");
//!     let mut filters = Filters::new();
//!     filters.insert("PageSize".into(), "50".into());
//!
//!     let page = provider.get_message_page(&User::all(), &filters).await.unwrap();
//!     if let Some(next) = page.next_page_uri {
//!         let _ = provider.get_next_message_page(&User::all(), &next).await;
//!     }
//! }
//! ```

pub mod error;
pub mod memory;
pub mod traits;
pub mod types;
pub mod uri;

pub use error::{ProviderError, Result};
pub use memory::{MemoryProvider, ProviderCalls};
pub use traits::Provider;
pub use types::{
    CallPage, CallResource, Filters, MessagePage, MessageResource, API_VERSION, PAGE_SIZE,
};
