//! Page cursors.
//!
//! A cursor is the encrypted form of the provider's next-page path. The
//! provider path never reaches the browser in the clear.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

use crate::crypto::SecretKey;
use crate::error::Result;

/// Encrypt `plaintext` into a URL-safe token.
pub fn opaque(plaintext: &str, key: &SecretKey) -> Result<String> {
    let sealed = key.seal(plaintext.as_bytes())?;
    Ok(URL_SAFE_NO_PAD.encode(sealed))
}

/// Decrypt a token produced by [`opaque`].
///
/// Fails on non-base64 input, a token shorter than nonce plus tag, an
/// authentication failure or non-UTF-8 plaintext.
pub fn unopaque(token: &str, key: &SecretKey) -> Result<String> {
    let sealed = URL_SAFE_NO_PAD.decode(token)?;
    let plaintext = key.open(&sealed)?;
    Ok(String::from_utf8(plaintext)?)
}
