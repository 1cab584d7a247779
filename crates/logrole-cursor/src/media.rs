//! Media tokens.
//!
//! Media attached to a message is served through our own image route rather
//! than by linking the provider URL directly. The route receives a token
//! that names the message, the provider URL and an expiry.
//!
//! Same seal/open primitive as page cursors, but under a subkey derived for
//! this purpose, so a page cursor can never be opened as a media token.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::crypto::SecretKey;
use crate::error::{CursorError, Result};

/// blake3 derive-key context for the media subkey.
const MEDIA_CONTEXT: &str = "logrole 2016-09-01 media token v1";

/// A media URL the holder may fetch until `expires_at` (Unix ms).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MediaToken {
    /// The message the media belongs to.
    pub message_sid: String,

    /// Provider URL of the media resource.
    pub url: String,

    /// Expiry (Unix milliseconds).
    pub expires_at: i64,
}

impl MediaToken {
    pub fn new(message_sid: impl Into<String>, url: impl Into<String>, expires_at: i64) -> Self {
        Self {
            message_sid: message_sid.into(),
            url: url.into(),
            expires_at,
        }
    }

    /// Encrypt into a URL-safe token.
    pub fn seal(&self, key: &SecretKey) -> Result<String> {
        let json = serde_json::to_vec(self).map_err(|e| CursorError::Malformed(e.to_string()))?;
        let sealed = key.derive(MEDIA_CONTEXT).seal(&json)?;
        Ok(URL_SAFE_NO_PAD.encode(sealed))
    }

    /// Decrypt a token and check its expiry against `now` (Unix ms).
    pub fn open(token: &str, key: &SecretKey, now: i64) -> Result<Self> {
        let sealed = URL_SAFE_NO_PAD.decode(token)?;
        let json = key.derive(MEDIA_CONTEXT).open(&sealed)?;
        let media: MediaToken =
            serde_json::from_slice(&json).map_err(|e| CursorError::Malformed(e.to_string()))?;

        if now > media.expires_at {
            return Err(CursorError::Expired);
        }
        Ok(media)
    }

    pub fn is_expired(&self, now: i64) -> bool {
        now > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::{opaque, unopaque};

    const SID: &str = "MM89a8c4a6891c53054e9cd604922bfb61";
    const URL: &str = "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages/MM89a8c4a6891c53054e9cd604922bfb61/Media/ME123";

    #[test]
    fn test_media_roundtrip() {
        let key = SecretKey::generate();
        let media = MediaToken::new(SID, URL, 10_000);

        let token = media.seal(&key).unwrap();
        assert!(!token.contains("twilio"));

        let opened = MediaToken::open(&token, &key, 5_000).unwrap();
        assert_eq!(opened, media);
    }

    #[test]
    fn test_media_expired() {
        let key = SecretKey::generate();
        let token = MediaToken::new(SID, URL, 10_000).seal(&key).unwrap();

        assert!(MediaToken::open(&token, &key, 10_000).is_ok());
        assert!(matches!(
            MediaToken::open(&token, &key, 10_001),
            Err(CursorError::Expired)
        ));
    }

    #[test]
    fn test_cursor_is_not_a_media_token() {
        let key = SecretKey::generate();
        let json = serde_json::to_string(&MediaToken::new(SID, URL, i64::MAX)).unwrap();

        // Sealed under the base key, as a page cursor would be.
        let cursor = opaque(&json, &key).unwrap();
        assert!(matches!(
            MediaToken::open(&cursor, &key, 0),
            Err(CursorError::Authentication)
        ));
    }

    #[test]
    fn test_media_token_is_not_a_cursor() {
        let key = SecretKey::generate();
        let token = MediaToken::new(SID, URL, i64::MAX).seal(&key).unwrap();
        assert!(matches!(unopaque(&token, &key), Err(CursorError::Authentication)));
    }

    #[test]
    fn test_malformed_payload() {
        let key = SecretKey::generate();
        let sealed = key.derive(MEDIA_CONTEXT).seal(b"{\"message_sid\": 1}").unwrap();
        let token = URL_SAFE_NO_PAD.encode(sealed);

        assert!(matches!(
            MediaToken::open(&token, &key, 0),
            Err(CursorError::Malformed(_))
        ));
    }
}
