//! # Logrole Testkit
//!
//! Testing utilities for Logrole.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: a key, an age policy and resource factories, plus a
//!   builder for a [`ViewClient`](logrole::ViewClient) over a
//!   [`MemoryProvider`](logrole_provider::MemoryProvider)
//! - **Generators**: Proptest strategies for sids, keys, capability sets and
//!   provider next-page paths
//!
//! ## Test Fixtures
//!
//! ```rust
//! use std::time::Duration;
//! use logrole_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let provider = fixture.provider();
//! provider
//!     .insert_message(fixture.make_message(1, Duration::from_secs(60)))
//!     .unwrap();
//! let client = fixture.client(provider);
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use logrole_testkit::generators::{next_path, secret_key};
//!
//! proptest! {
//!     #[test]
//!     fn cursor_roundtrip(key in secret_key(), path in next_path()) {
//!         let token = logrole_cursor::opaque(&path, &key).unwrap();
//!         prop_assert_eq!(logrole_cursor::unopaque(&token, &key).unwrap(), path);
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{init_tracing, nth_call_sid, nth_message_sid, TestFixture, ACCOUNT_SID, USER};
pub use generators::{call_sid, message_sid, next_path, phone_number, secret_key, user_settings};
