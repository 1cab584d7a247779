//! Key material and the XChaCha20-Poly1305 seal/open primitive.

use std::fmt;

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    XChaCha20Poly1305, XNonce,
};
use rand::{rngs::OsRng, RngCore};

use crate::error::{CursorError, Result};

/// Nonce size for XChaCha20-Poly1305.
pub const NONCE_LEN: usize = 24;

/// Poly1305 authentication tag size.
pub const TAG_LEN: usize = 16;

/// A 256-bit symmetric key shared by every request.
///
/// Read-only after startup. `Debug` never prints the key bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey([u8; 32]);

impl SecretKey {
    /// Generate a new random key.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from raw bytes.
    ///
    /// The all-zero key is rejected: it is what an unset or zeroed
    /// config value decodes to.
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self> {
        if bytes.iter().all(|b| *b == 0) {
            return Err(CursorError::InvalidKey("key is all zeroes".into()));
        }
        Ok(Self(bytes))
    }

    /// Parse a 64-character hex string.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim()).map_err(|e| CursorError::InvalidKey(e.to_string()))?;
        let arr: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
            CursorError::InvalidKey(format!("expected 32 bytes, got {}", bytes.len()))
        })?;
        Self::from_bytes(arr)
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Derive a subkey for one purpose.
    ///
    /// Tokens sealed under different contexts can never be opened with each
    /// other's key.
    pub fn derive(&self, context: &str) -> SecretKey {
        SecretKey(blake3::derive_key(context, &self.0))
    }

    /// Encrypt `plaintext` under a fresh nonce, returning `nonce || ciphertext`.
    pub fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let cipher = XChaCha20Poly1305::new_from_slice(&self.0)
            .map_err(|e| CursorError::InvalidKey(e.to_string()))?;

        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        let ciphertext = cipher
            .encrypt(XNonce::from_slice(&nonce), plaintext)
            .map_err(|_| CursorError::Encryption)?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);
        Ok(sealed)
    }

    /// Decrypt the output of [`SecretKey::seal`].
    pub fn open(&self, sealed: &[u8]) -> Result<Vec<u8>> {
        let min = NONCE_LEN + TAG_LEN;
        if sealed.len() < min {
            return Err(CursorError::TooShort {
                len: sealed.len(),
                min,
            });
        }

        let cipher = XChaCha20Poly1305::new_from_slice(&self.0)
            .map_err(|e| CursorError::InvalidKey(e.to_string()))?;

        let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);
        cipher
            .decrypt(XNonce::from_slice(nonce), ciphertext)
            .map_err(|_| CursorError::Authentication)
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seal_open() {
        let key = SecretKey::generate();
        let sealed = key.seal(b"hello, world!").unwrap();

        assert_eq!(sealed.len(), NONCE_LEN + 13 + TAG_LEN);
        assert_eq!(key.open(&sealed).unwrap(), b"hello, world!");
    }

    #[test]
    fn test_open_wrong_key_fails() {
        let key1 = SecretKey::generate();
        let key2 = SecretKey::generate();

        let sealed = key1.seal(b"secret").unwrap();
        assert!(matches!(key2.open(&sealed), Err(CursorError::Authentication)));
    }

    #[test]
    fn test_open_too_short() {
        let key = SecretKey::generate();
        let err = key.open(&[0u8; NONCE_LEN + TAG_LEN - 1]).unwrap_err();
        assert!(matches!(err, CursorError::TooShort { len: 39, min: 40 }));
    }

    #[test]
    fn test_empty_plaintext_is_sealable() {
        let key = SecretKey::generate();
        let sealed = key.seal(b"").unwrap();
        assert_eq!(sealed.len(), NONCE_LEN + TAG_LEN);
        assert!(key.open(&sealed).unwrap().is_empty());
    }

    #[test]
    fn test_from_hex() {
        let key = SecretKey::from_hex(&"42".repeat(32)).unwrap();
        assert_eq!(key.as_bytes(), &[0x42; 32]);

        assert!(SecretKey::from_hex(&"00".repeat(32)).is_err());
        assert!(SecretKey::from_hex("abcd").is_err());
        assert!(SecretKey::from_hex(&"zz".repeat(32)).is_err());
    }

    #[test]
    fn test_from_bytes_rejects_zero_key() {
        let err = SecretKey::from_bytes([0u8; 32]).unwrap_err();
        assert!(matches!(err, CursorError::InvalidKey(_)));

        let mut bytes = [0u8; 32];
        bytes[31] = 1;
        assert!(SecretKey::from_bytes(bytes).is_ok());
    }

    #[test]
    fn test_derive_deterministic_and_separated() {
        let key = SecretKey::from_bytes([0x42; 32]).unwrap();

        assert_eq!(key.derive("a"), key.derive("a"));
        assert_ne!(key.derive("a"), key.derive("b"));
        assert_ne!(&key.derive("a"), &key);
    }

    #[test]
    fn test_debug_hides_key() {
        let key = SecretKey::from_bytes([0x42; 32]).unwrap();
        assert_eq!(format!("{:?}", key), "SecretKey(..)");
    }
}
