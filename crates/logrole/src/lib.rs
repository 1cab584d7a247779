//! # Logrole
//!
//! A permission-gated viewer for telephony message and call logs.
//!
//! ## Overview
//!
//! [`ViewClient`] sits between an authenticated user and the provider API.
//! For every request it:
//!
//! - Validates the query against a per-collection allow-list, or decrypts
//!   the `next` cursor the previous page handed out
//! - Fetches from the [`Provider`](provider::Provider) under a deadline
//! - Wraps the result in views that hide what the user may not see and drop
//!   anything past the age cutoff
//! - Encrypts the provider's next-page path so it never reaches the browser
//!   in the clear, and warms the next page in the background
//!
//! Detail views fetch media concurrently with the message and hand media URLs
//! out as sealed, expiring tokens.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use logrole::{Settings, ViewClient};
//! use logrole::provider::MemoryProvider;
//!
//! async fn example() {
//!     let settings = Settings::from_json(
//!         r#"{"secret_key": "2b7e151628aed2a6abf7158809cf4f3c2b7e151628aed2a6abf7158809cf4f3c",
//!             "users": ["test"]}"#,
//!     )
//!     .unwrap();
//!     let provider = MemoryProvider::new("AC58f1e8f2b1c6b88ca90a012a4be0c279");
//!     let client = ViewClient::from_settings(provider, &settings).unwrap();
//!
//!     let user = client.user("test").unwrap();
//!     let page = client.list_messages(&user, &[]).await.unwrap();
//!     if let Some(next) = page.next_page_token {
//!         let query = vec![("next".to_string(), next)];
//!         let _ = client.list_messages(&user, &query).await;
//!     }
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `logrole::perms` - Users, capabilities and the age policy
//! - `logrole::cursor` - Opaque page cursors and media tokens
//! - `logrole::provider` - The provider contract and the in-memory provider
//! - `logrole::views` - Permission-checked resource views

pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod prefetch;

// Re-export component crates
pub use logrole_cursor as cursor;
pub use logrole_perms as perms;
pub use logrole_provider as provider;
pub use logrole_views as views;

// Re-export main types for convenience
pub use client::{
    now_millis, CallListing, MediaLink, MediaOutcome, MessageDetail, MessageListing, ViewClient,
};
pub use config::{ClientConfig, ConfigError, Settings};
pub use error::{Outcome, Result, ViewerError};
pub use filter::Collection;
pub use prefetch::PrefetchScope;

// Re-export commonly used component types
pub use logrole_perms::{Permission, PermsError, User, UserFinder, UserMap, UserSettings};
pub use logrole_views::{CallView, MessageView, Property};
