//! List views: filters, cursors, prefetch and the age cutoff.

use std::time::Duration;

use logrole::cursor::{opaque, unopaque, SecretKey};
use logrole::provider::MessageResource;
use logrole::{ClientConfig, Outcome, User, UserMap, UserSettings, ViewerError};
use logrole_testkit::{init_tracing, TestFixture, ACCOUNT_SID, USER};

const MINUTE: Duration = Duration::from_secs(60);

fn q(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn small_pages() -> TestFixture {
    TestFixture::new().with_config(ClientConfig {
        page_size: 2,
        ..ClientConfig::default()
    })
}

fn seed_messages(fixture: &TestFixture, count: u32) -> logrole::provider::MemoryProvider {
    let provider = fixture.provider();
    for n in 1..=count {
        provider
            .insert_message(fixture.make_message(n, MINUTE * n))
            .unwrap();
    }
    provider
}

fn messages_path(query: &str) -> String {
    format!("/2010-04-01/Accounts/{}/Messages.json?{}", ACCOUNT_SID, query)
}

async fn settle() {
    for _ in 0..50 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn test_next_token_is_encrypted_next_path() {
    init_tracing();
    let fixture = small_pages();
    let client = fixture.client(seed_messages(&fixture, 5));
    let user = client.user(USER).unwrap();

    let listing = client.list_messages(&user, &[]).await.unwrap();
    assert_eq!(listing.messages.len(), 2);

    let token = listing.next_page_token.unwrap();
    let expected = messages_path("PageSize=2&Page=1");
    assert_ne!(token, expected);
    assert!(!token.contains("Accounts"));
    assert_eq!(unopaque(&token, &fixture.secret).unwrap(), expected);
}

#[tokio::test]
async fn test_follow_next_token() {
    let fixture = small_pages();
    let client = fixture.client(seed_messages(&fixture, 5));
    let user = client.user(USER).unwrap();

    let first = client.list_messages(&user, &[]).await.unwrap();
    let token = first.next_page_token.unwrap();

    let second = client
        .list_messages(&user, &q(&[("next", token.as_str())]))
        .await
        .unwrap();
    let sids: Vec<&str> = second.messages.iter().map(|m| m.sid()).collect();
    assert_eq!(
        sids,
        vec![
            logrole_testkit::nth_message_sid(3),
            logrole_testkit::nth_message_sid(4)
        ]
    );
    assert!(second.next_page_token.is_some());
}

#[tokio::test]
async fn test_tampered_token_never_reaches_provider() {
    let fixture = small_pages();
    let client = fixture.client(seed_messages(&fixture, 5));
    let user = client.user(USER).unwrap();

    let mut token = opaque(&messages_path("PageSize=2&Page=1"), &fixture.secret).unwrap();
    let last = token.pop().unwrap();
    token.push(if last == 'A' { 'B' } else { 'A' });

    let err = client
        .list_messages(&user, &q(&[("next", token.as_str())]))
        .await
        .unwrap_err();
    assert!(matches!(err, ViewerError::Decode(_)));
    assert_eq!(err.outcome().status_code(), 400);
    assert_eq!(client.provider().calls().get_next_message_page, 0);
    assert_eq!(client.provider().calls().get_message_page, 0);
}

#[tokio::test]
async fn test_token_from_another_key_rejected() {
    let fixture = small_pages();
    let client = fixture.client(seed_messages(&fixture, 5));
    let user = client.user(USER).unwrap();

    let token = opaque(&messages_path("Page=1"), &SecretKey::generate()).unwrap();
    let err = client
        .list_messages(&user, &q(&[("next", token.as_str())]))
        .await
        .unwrap_err();
    assert_eq!(err.outcome().status_code(), 400);
    assert_eq!(client.provider().calls().get_next_message_page, 0);
}

#[tokio::test]
async fn test_cursor_for_wrong_collection_or_version_rejected() {
    let fixture = small_pages();
    let client = fixture.client(seed_messages(&fixture, 5));
    let user = client.user(USER).unwrap();

    let calls_path = format!("/2010-04-01/Accounts/{}/Calls.json?Page=1", ACCOUNT_SID);
    let old_version = format!("/2008-08-01/Accounts/{}/Messages.json?Page=1", ACCOUNT_SID);

    for path in [calls_path, old_version] {
        let token = opaque(&path, &fixture.secret).unwrap();
        let err = client
            .list_messages(&user, &q(&[("next", token.as_str())]))
            .await
            .unwrap_err();
        assert!(matches!(err, ViewerError::Validation(_)), "{}", path);
        assert_eq!(err.outcome().status_code(), 400);
    }
    assert_eq!(client.provider().calls().get_next_message_page, 0);
}

#[tokio::test]
async fn test_next_page_is_prefetched() {
    let fixture = small_pages();
    let client = fixture.client(seed_messages(&fixture, 5));
    let user = client.user(USER).unwrap();

    client.list_messages(&user, &[]).await.unwrap();
    settle().await;

    assert_eq!(client.provider().calls().get_next_message_page, 1);
    assert_eq!(client.prefetch_scope().in_flight(), 0);
}

#[tokio::test]
async fn test_no_prefetch_after_shutdown() {
    let fixture = small_pages();
    let client = fixture.client(seed_messages(&fixture, 5));
    let user = client.user(USER).unwrap();

    client.shutdown();
    let listing = client.list_messages(&user, &[]).await.unwrap();
    settle().await;

    assert!(listing.next_page_token.is_some());
    assert_eq!(client.provider().calls().get_next_message_page, 0);
}

#[tokio::test]
async fn test_too_old_messages_dropped_and_paging_stops() {
    let fixture = small_pages().with_max_age(Duration::from_secs(60 * 60));
    let provider = fixture.provider();
    for (n, age) in [(1, 10), (2, 120), (3, 180)] {
        provider
            .insert_message(fixture.make_message(n, MINUTE * age))
            .unwrap();
    }
    let client = fixture.client(provider);
    let user = client.user(USER).unwrap();

    let listing = client.list_messages(&user, &[]).await.unwrap();
    assert_eq!(listing.messages.len(), 1);
    assert!(listing.next_page_token.is_none());
    assert!(listing.oldest_viewable.is_some());
}

#[tokio::test]
async fn test_filters_applied_and_echoed() {
    let fixture = small_pages();
    let provider = seed_messages(&fixture, 5);
    for n in 10..13 {
        provider
            .insert_message(MessageResource {
                from: "+15105551234".to_string(),
                ..fixture.make_message(n, MINUTE * n)
            })
            .unwrap();
    }
    let client = fixture.client(provider);
    let user = client.user(USER).unwrap();

    let query = q(&[("from", "+1 (510) 555-1234"), ("to", ""), ("next", "")]);
    let first = client.list_messages(&user, &query).await.unwrap();
    assert_eq!(first.messages.len(), 2);
    for message in &first.messages {
        assert_eq!(message.from().unwrap(), "+15105551234");
    }
    assert_eq!(first.query, q(&[("from", "+1 (510) 555-1234")]));

    let token = first.next_page_token.unwrap();
    let second = client
        .list_messages(&user, &q(&[("next", token.as_str())]))
        .await
        .unwrap();
    assert_eq!(second.messages.len(), 1);
    assert_eq!(second.query, q(&[("from", "+15105551234")]));
    assert!(second.next_page_token.is_none());
}

#[tokio::test]
async fn test_invalid_filters_are_bad_requests() {
    let fixture = small_pages();
    let client = fixture.client(seed_messages(&fixture, 1));
    let user = client.user(USER).unwrap();

    for query in [
        q(&[("price", "1")]),
        q(&[("from", "pizza")]),
        q(&[("date-sent", "yesterday")]),
        q(&[("to", "+14155551212"), ("to", "+14155551213")]),
        q(&[("date-sent-before", "2001-01-01")]),
    ] {
        let err = client.list_messages(&user, &query).await.unwrap_err();
        assert!(matches!(err.outcome(), Outcome::BadRequest(_)), "{:?}", query);
    }
    assert_eq!(client.provider().calls().get_message_page, 0);
}

#[tokio::test]
async fn test_list_without_capability_is_forbidden() {
    let fixture = TestFixture::new();
    let users = UserMap::new().with_user(
        "calls-only",
        User::new(UserSettings {
            can_view_messages: false,
            ..UserSettings::all()
        }),
    );
    let client = fixture.client_with_users(seed_messages(&fixture, 3), users);
    let user = client.user("calls-only").unwrap();

    let err = client.list_messages(&user, &[]).await.unwrap_err();
    assert_eq!(err.outcome().status_code(), 403);
    assert_eq!(client.provider().calls().get_message_page, 0);

    assert!(client.list_calls(&user, &[]).await.is_ok());
}

#[tokio::test]
async fn test_call_listing() {
    let fixture = small_pages();
    let provider = fixture.provider();
    for n in 1..=3 {
        let mut call = fixture.make_call(n, MINUTE * n);
        if n == 2 {
            call.status = "busy".to_string();
        }
        provider.insert_call(call).unwrap();
    }
    let client = fixture.client(provider);
    let user = client.user(USER).unwrap();

    let all = client.list_calls(&user, &[]).await.unwrap();
    assert_eq!(all.calls.len(), 2);
    let token = all.next_page_token.unwrap();
    assert!(unopaque(&token, &fixture.secret)
        .unwrap()
        .contains("/Calls.json?"));

    let busy = client
        .list_calls(&user, &q(&[("status", "busy")]))
        .await
        .unwrap();
    assert_eq!(busy.calls.len(), 1);
    assert_eq!(busy.calls[0].status(), "busy");

    let messages_token = opaque(&messages_path("Page=1"), &fixture.secret).unwrap();
    let err = client
        .list_calls(&user, &q(&[("next", messages_token.as_str())]))
        .await
        .unwrap_err();
    assert_eq!(err.outcome().status_code(), 400);
}
