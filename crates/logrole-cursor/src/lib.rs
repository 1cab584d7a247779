//! # Logrole Cursor
//!
//! Opaque tokens for values that must round-trip through a browser without
//! being readable or forgeable there.
//!
//! ## Token Format
//!
//! ```text
//! token = base64url_nopad( nonce[24] || XChaCha20-Poly1305(key, nonce, plaintext) )
//! ```
//!
//! The nonce is drawn from the OS CSPRNG on every call, so encrypting the
//! same plaintext twice yields two different tokens. Decoding fails closed:
//! bad base64, a truncated token, a flipped bit or the wrong key all return an
//! error and no plaintext.
//!
//! ## Uses
//!
//! - **Page cursors** ([`opaque`] / [`unopaque`]): the plaintext is the
//!   provider's next-page path. Checking that the path has the expected shape
//!   is left to the caller.
//! - **Media tokens** ([`MediaToken`]): a media URL plus an expiry, sealed
//!   under a key derived for that purpose only.
//!
//! ```rust
//! use logrole_cursor::{opaque, unopaque, SecretKey};
//!
//! let key = SecretKey::generate();
//! let token = opaque("/2010-04-01/Accounts/AC123/Messages.json?Page=1", &key).unwrap();
//! assert_eq!(
//!     unopaque(&token, &key).unwrap(),
//!     "/2010-04-01/Accounts/AC123/Messages.json?Page=1"
//! );
//! ```

pub mod crypto;
pub mod cursor;
pub mod error;
pub mod media;

pub use crypto::{SecretKey, NONCE_LEN, TAG_LEN};
pub use cursor::{opaque, unopaque};
pub use error::{CursorError, Result};
pub use media::MediaToken;
