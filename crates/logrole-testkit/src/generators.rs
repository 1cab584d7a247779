//! Proptest generators for property-based testing.

use proptest::prelude::*;

use logrole_cursor::SecretKey;
use logrole_perms::UserSettings;
use logrole_provider::uri;

use crate::fixtures::ACCOUNT_SID;

/// Generate a usable (non-zero) secret key.
pub fn secret_key() -> impl Strategy<Value = SecretKey> {
    any::<[u8; 32]>().prop_filter_map("key must not be all zero", |bytes| {
        SecretKey::from_bytes(bytes).ok()
    })
}

/// Generate an arbitrary set of capability flags.
pub fn user_settings() -> impl Strategy<Value = UserSettings> {
    any::<[bool; 8]>().prop_map(|f| UserSettings {
        can_view_messages: f[0],
        can_view_message_from: f[1],
        can_view_message_to: f[2],
        can_view_message_body: f[3],
        can_view_num_media: f[4],
        can_view_calls: f[5],
        can_view_call_from: f[6],
        can_view_call_to: f[7],
    })
}

/// Generate an SMS or MMS sid.
pub fn message_sid() -> impl Strategy<Value = String> {
    "(MM|SM)[a-f0-9]{32}".prop_map(String::from)
}

/// Generate a call sid.
pub fn call_sid() -> impl Strategy<Value = String> {
    "CA[a-f0-9]{32}".prop_map(String::from)
}

/// Generate a US phone number in E.164 form.
pub fn phone_number() -> impl Strategy<Value = String> {
    "\\+1[2-9][0-9]{9}".prop_map(String::from)
}

/// Generate a provider next-page path for the fixture account.
pub fn next_path() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("Messages.json"), Just("Calls.json")],
        1u32..=1000,
        1u32..10_000,
        proptest::option::of(phone_number()),
    )
        .prop_map(|(collection, page_size, page, from)| {
            let path = format!("/2010-04-01/Accounts/{}/{}", ACCOUNT_SID, collection);
            let page_size = page_size.to_string();
            let page = page.to_string();
            let mut params = Vec::new();
            if let Some(from) = from.as_deref() {
                params.push(("From", from));
            }
            params.push(("PageSize", page_size.as_str()));
            params.push(("Page", page.as_str()));
            uri::build_uri(&path, params)
        })
}
