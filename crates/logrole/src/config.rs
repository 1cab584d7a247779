//! Settings for the view client.
//!
//! Loaded once at startup, usually from a JSON file, then split into the
//! pieces the client needs: the shared key, the age policy, the user
//! registry and the runtime knobs in [`ClientConfig`].

use std::time::Duration;

use logrole_cursor::{CursorError, SecretKey};
use logrole_perms::{Permission, User, UserMap, UserSettings};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_PAGE_SIZE: u32 = 50;
const MAX_PAGE_SIZE: u32 = 1000;
const THIRTY_DAYS_SECS: u64 = 30 * 24 * 60 * 60;

/// Errors in the settings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("page_size must be between 1 and {max}, got {got}", max = MAX_PAGE_SIZE)]
    PageSize { got: u32 },

    #[error("invalid secret_key: {0}")]
    SecretKey(#[from] CursorError),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Runtime knobs for [`ViewClient`](crate::ViewClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Resources per page requested from the provider.
    pub page_size: u32,
    /// Deadline for the primary fetch and the media join.
    pub request_timeout: Duration,
    /// Upper bound on one detached prefetch.
    pub prefetch_timeout: Duration,
    /// How long a media token stays valid.
    pub media_url_ttl: Duration,
    /// Whether detail views expand media without a click.
    pub show_media_by_default: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout: Duration::from_secs(10),
            prefetch_timeout: Duration::from_secs(30),
            media_url_ttl: Duration::from_secs(60 * 60),
            show_media_by_default: false,
        }
    }
}

/// The settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub page_size: u32,
    /// 64 hex characters. Shared by every server that decodes our cursors.
    pub secret_key: String,
    pub max_resource_age_secs: u64,
    pub request_timeout_ms: u64,
    pub prefetch_timeout_ms: u64,
    pub media_url_ttl_secs: u64,
    pub show_media_by_default: bool,
    /// Names that authenticate as the shared identity.
    pub users: Vec<String>,
    /// Capabilities of the shared identity.
    pub user_settings: UserSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            secret_key: String::new(),
            max_resource_age_secs: THIRTY_DAYS_SECS,
            request_timeout_ms: 10_000,
            prefetch_timeout_ms: 30_000,
            media_url_ttl_secs: 60 * 60,
            show_media_by_default: false,
            users: Vec::new(),
            user_settings: UserSettings::all(),
        }
    }
}

impl Settings {
    /// Parse and validate a JSON settings document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(ConfigError::PageSize {
                got: self.page_size,
            });
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::Zero("request_timeout_ms"));
        }
        if self.prefetch_timeout_ms == 0 {
            return Err(ConfigError::Zero("prefetch_timeout_ms"));
        }
        if self.media_url_ttl_secs == 0 {
            return Err(ConfigError::Zero("media_url_ttl_secs"));
        }
        self.secret()?;
        Ok(())
    }

    pub fn secret(&self) -> Result<SecretKey, ConfigError> {
        Ok(SecretKey::from_hex(&self.secret_key)?)
    }

    pub fn permission(&self) -> Permission {
        Permission::new(Duration::from_secs(self.max_resource_age_secs))
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            page_size: self.page_size,
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            prefetch_timeout: Duration::from_millis(self.prefetch_timeout_ms),
            media_url_ttl: Duration::from_secs(self.media_url_ttl_secs),
            show_media_by_default: self.show_media_by_default,
        }
    }

    /// Every configured name maps to one shared identity.
    pub fn user_map(&self) -> UserMap {
        UserMap::shared(self.users.iter().cloned(), User::new(self.user_settings))
    }
}
