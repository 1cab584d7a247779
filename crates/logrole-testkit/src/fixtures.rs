//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::time::Duration;

use logrole::{ClientConfig, Settings, ViewClient};
use logrole_cursor::SecretKey;
use logrole_perms::{Permission, User, UserMap, UserSettings};
use logrole_provider::{CallResource, MemoryProvider, MessageResource};

/// Account every fixture provider serves.
pub const ACCOUNT_SID: &str = "AC58f1e8f2b1c6b88ca90a012a4be0c279";

/// Name the fixture client knows, holding every capability.
pub const USER: &str = "test";

const WEEK: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// A key, an age policy and client settings for one test.
pub struct TestFixture {
    pub secret: SecretKey,
    pub permission: Permission,
    pub config: ClientConfig,
}

impl TestFixture {
    /// Random key, one-week age limit, default client config.
    pub fn new() -> Self {
        Self {
            secret: SecretKey::generate(),
            permission: Permission::new(WEEK),
            config: ClientConfig::default(),
        }
    }

    /// Create with a fixed key.
    ///
    /// # Panics
    ///
    /// Panics if the seed is all zero.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self {
            secret: SecretKey::from_bytes(seed).expect("fixture seed must not be all zero"),
            ..Self::new()
        }
    }

    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.permission = Permission::new(max_age);
        self
    }

    /// The key as it appears in a settings file.
    pub fn secret_hex(&self) -> String {
        hex::encode(self.secret.as_bytes())
    }

    /// Settings equivalent to this fixture, with one user named [`USER`].
    pub fn settings(&self, user_settings: UserSettings) -> Settings {
        Settings {
            page_size: self.config.page_size,
            secret_key: self.secret_hex(),
            max_resource_age_secs: self.permission.max_resource_age().as_secs(),
            request_timeout_ms: self.config.request_timeout.as_millis() as u64,
            prefetch_timeout_ms: self.config.prefetch_timeout.as_millis() as u64,
            media_url_ttl_secs: self.config.media_url_ttl.as_secs(),
            show_media_by_default: self.config.show_media_by_default,
            users: vec![USER.to_string()],
            user_settings,
        }
    }

    pub fn provider(&self) -> MemoryProvider {
        MemoryProvider::new(ACCOUNT_SID)
    }

    /// A client where [`USER`] holds every capability.
    pub fn client(&self, provider: MemoryProvider) -> ViewClient<MemoryProvider> {
        self.client_with_users(provider, UserMap::new().with_user(USER, User::all()))
    }

    pub fn client_with_users(
        &self,
        provider: MemoryProvider,
        users: UserMap,
    ) -> ViewClient<MemoryProvider> {
        ViewClient::new(
            provider,
            users,
            self.secret.clone(),
            self.permission,
            self.config.clone(),
        )
    }

    /// A message created `age` ago.
    pub fn make_message(&self, n: u32, age: Duration) -> MessageResource {
        MessageResource {
            sid: nth_message_sid(n),
            date_created: logrole::now_millis() - age.as_millis() as i64,
            from: "+14155551212".to_string(),
            to: "+19253920364".to_string(),
            body: format!("message {}", n),
            num_media: 0,
            status: "delivered".to_string(),
            direction: "outbound-api".to_string(),
        }
    }

    /// A message with `num_media` attachments.
    pub fn make_mms(&self, n: u32, age: Duration, num_media: u32) -> MessageResource {
        MessageResource {
            sid: format!("MM{:032x}", n),
            num_media,
            ..self.make_message(n, age)
        }
    }

    /// A call created `age` ago.
    pub fn make_call(&self, n: u32, age: Duration) -> CallResource {
        CallResource {
            sid: nth_call_sid(n),
            date_created: logrole::now_millis() - age.as_millis() as i64,
            from: "+14155551212".to_string(),
            to: "+19253920364".to_string(),
            status: "completed".to_string(),
            direction: "inbound".to_string(),
            duration: Some(n),
        }
    }

    /// Provider media URLs for a message.
    pub fn media_urls(&self, sid: &str, count: usize) -> Vec<String> {
        (0..count)
            .map(|i| {
                format!(
                    "https://api.twilio.com/2010-04-01/Accounts/{}/Messages/{}/Media/ME{:032x}",
                    ACCOUNT_SID, sid, i
                )
            })
            .collect()
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Sid of the `n`th fixture SMS.
pub fn nth_message_sid(n: u32) -> String {
    format!("SM{:032x}", n)
}

/// Sid of the `n`th fixture call.
pub fn nth_call_sid(n: u32) -> String {
    format!("CA{:032x}", n)
}

/// Send log output to the test harness. Safe to call more than once.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .with_test_writer()
        .try_init();
}
