//! In-memory implementation of the Provider trait.
//!
//! Primarily for testing. It pages, filters and fails the way the real
//! provider does, keeps everything in memory, and counts every call so tests
//! can assert which requests were (or were not) issued.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use logrole_perms::User;
use tracing::debug;

use crate::error::{ProviderError, Result};
use crate::traits::Provider;
use crate::types::{
    CallPage, CallResource, Filters, MessagePage, MessageResource, API_VERSION, PAGE_SIZE,
};
use crate::uri;

const DEFAULT_PAGE_SIZE: usize = 50;
const MAX_PAGE_SIZE: usize = 1000;
const PAGE: &str = "Page";

/// Number of calls made to each provider operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProviderCalls {
    pub get_message: usize,
    pub get_message_page: usize,
    pub get_next_message_page: usize,
    pub get_media_urls: usize,
    pub get_call: usize,
    pub get_call_page: usize,
    pub get_next_call_page: usize,
}

#[derive(Default)]
struct Counters {
    get_message: AtomicUsize,
    get_message_page: AtomicUsize,
    get_next_message_page: AtomicUsize,
    get_media_urls: AtomicUsize,
    get_call: AtomicUsize,
    get_call_page: AtomicUsize,
    get_next_call_page: AtomicUsize,
}

/// In-memory provider.
///
/// Thread-safe via RwLock. Resources are kept newest first.
pub struct MemoryProvider {
    account_sid: String,
    inner: RwLock<MemoryProviderInner>,
    counters: Counters,
    latency: Duration,
    media_latency: Duration,
}

#[derive(Default)]
struct MemoryProviderInner {
    messages: Vec<MessageResource>,
    calls: Vec<CallResource>,

    /// Media URLs by message sid.
    media: HashMap<String, Vec<String>>,

    /// Injected failures by sid, returned instead of the resource.
    failures: HashMap<String, ProviderError>,

    /// Injected failures for media lookups by message sid.
    media_failures: HashMap<String, ProviderError>,
}

impl MemoryProvider {
    /// Create an empty provider for one account.
    pub fn new(account_sid: impl Into<String>) -> Self {
        Self {
            account_sid: account_sid.into(),
            inner: RwLock::new(MemoryProviderInner::default()),
            counters: Counters::default(),
            latency: Duration::ZERO,
            media_latency: Duration::ZERO,
        }
    }

    /// Delay every resource and page fetch by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Delay every media lookup by `latency`.
    pub fn with_media_latency(mut self, latency: Duration) -> Self {
        self.media_latency = latency;
        self
    }

    pub fn account_sid(&self) -> &str {
        &self.account_sid
    }

    pub fn insert_message(&self, message: MessageResource) -> Result<()> {
        let mut inner = self.write()?;
        inner.messages.retain(|m| m.sid != message.sid);
        inner.messages.push(message);
        inner
            .messages
            .sort_by(|a, b| b.date_created.cmp(&a.date_created));
        Ok(())
    }

    pub fn insert_call(&self, call: CallResource) -> Result<()> {
        let mut inner = self.write()?;
        inner.calls.retain(|c| c.sid != call.sid);
        inner.calls.push(call);
        inner.calls.sort_by(|a, b| b.date_created.cmp(&a.date_created));
        Ok(())
    }

    pub fn set_media(&self, message_sid: impl Into<String>, urls: Vec<String>) -> Result<()> {
        self.write()?.media.insert(message_sid.into(), urls);
        Ok(())
    }

    /// Make every fetch of `sid` fail with `error`.
    pub fn fail(&self, sid: impl Into<String>, error: ProviderError) -> Result<()> {
        self.write()?.failures.insert(sid.into(), error);
        Ok(())
    }

    /// Make media lookups for `message_sid` fail with `error`.
    pub fn fail_media(&self, message_sid: impl Into<String>, error: ProviderError) -> Result<()> {
        self.write()?
            .media_failures
            .insert(message_sid.into(), error);
        Ok(())
    }

    /// Snapshot of the call counters.
    pub fn calls(&self) -> ProviderCalls {
        let c = &self.counters;
        ProviderCalls {
            get_message: c.get_message.load(Ordering::SeqCst),
            get_message_page: c.get_message_page.load(Ordering::SeqCst),
            get_next_message_page: c.get_next_message_page.load(Ordering::SeqCst),
            get_media_urls: c.get_media_urls.load(Ordering::SeqCst),
            get_call: c.get_call.load(Ordering::SeqCst),
            get_call_page: c.get_call_page.load(Ordering::SeqCst),
            get_next_call_page: c.get_next_call_page.load(Ordering::SeqCst),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryProviderInner>> {
        self.inner
            .read()
            .map_err(|_| ProviderError::server("memory provider lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryProviderInner>> {
        self.inner
            .write()
            .map_err(|_| ProviderError::server("memory provider lock poisoned"))
    }

    fn collection_path(&self, collection: &str) -> String {
        format!("/{}/Accounts/{}/{}.json", API_VERSION, self.account_sid, collection)
    }

    async fn delay(latency: Duration) {
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }

    /// Split a next-page path into filters, page index and page size.
    fn parse_next(&self, next_page_uri: &str, collection: &str) -> Result<(Filters, usize)> {
        let parsed = uri::parse_path(next_page_uri).ok_or_else(|| {
            ProviderError::not_found(format!(
                "The requested resource {} was not found",
                next_page_uri
            ))
        })?;
        if parsed.path != self.collection_path(collection) {
            debug!(path = %parsed.path, collection, "next page path names another collection");
            return Err(ProviderError::not_found(format!(
                "The requested resource {} was not found",
                parsed.path
            )));
        }

        let mut filters = Filters::new();
        let mut page = 0;
        for (name, value) in parsed.query {
            if name == PAGE {
                page = value
                    .parse()
                    .map_err(|_| ProviderError::bad_request(format!("invalid Page: {}", value)))?;
            } else {
                filters.insert(name, value);
            }
        }
        Ok((filters, page))
    }

    /// Slice out one page and build the next-page path if more remain.
    fn paginate<T: Clone>(
        &self,
        items: Vec<T>,
        collection: &str,
        filters: &Filters,
        page: usize,
    ) -> Result<(Vec<T>, Option<String>)> {
        let size = page_size(filters)?;
        let start = page.saturating_mul(size);
        let end = start.saturating_add(size).min(items.len());

        let slice = if start < items.len() {
            items[start..end].to_vec()
        } else {
            Vec::new()
        };

        let next = if end < items.len() {
            let next_page = (page + 1).to_string();
            let params = filters
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .chain(std::iter::once((PAGE, next_page.as_str())));
            Some(uri::build_uri(&self.collection_path(collection), params))
        } else {
            None
        };

        Ok((slice, next))
    }

    fn message_page(&self, filters: &Filters, page: usize) -> Result<MessagePage> {
        let mut matched = Vec::new();
        for message in &self.read()?.messages {
            if message_matches(message, filters)? {
                matched.push(message.clone());
            }
        }
        let (messages, next_page_uri) = self.paginate(matched, "Messages", filters, page)?;
        Ok(MessagePage {
            messages,
            next_page_uri,
        })
    }

    fn call_page(&self, filters: &Filters, page: usize) -> Result<CallPage> {
        let mut matched = Vec::new();
        for call in &self.read()?.calls {
            if call_matches(call, filters)? {
                matched.push(call.clone());
            }
        }
        let (calls, next_page_uri) = self.paginate(matched, "Calls", filters, page)?;
        Ok(CallPage {
            calls,
            next_page_uri,
        })
    }
}

#[async_trait]
impl Provider for MemoryProvider {
    async fn get_message(&self, _user: &User, sid: &str) -> Result<MessageResource> {
        self.counters.get_message.fetch_add(1, Ordering::SeqCst);
        Self::delay(self.latency).await;

        let inner = self.read()?;
        if let Some(err) = inner.failures.get(sid) {
            return Err(err.clone());
        }
        inner
            .messages
            .iter()
            .find(|m| m.sid == sid)
            .cloned()
            .ok_or_else(|| {
                ProviderError::not_found(format!("The requested resource {} was not found", sid))
            })
    }

    async fn get_message_page(&self, _user: &User, filters: &Filters) -> Result<MessagePage> {
        self.counters.get_message_page.fetch_add(1, Ordering::SeqCst);
        Self::delay(self.latency).await;
        self.message_page(filters, 0)
    }

    async fn get_next_message_page(
        &self,
        _user: &User,
        next_page_uri: &str,
    ) -> Result<MessagePage> {
        self.counters
            .get_next_message_page
            .fetch_add(1, Ordering::SeqCst);
        Self::delay(self.latency).await;

        let (filters, page) = self.parse_next(next_page_uri, "Messages")?;
        self.message_page(&filters, page)
    }

    async fn get_media_urls(&self, _user: &User, sid: &str) -> Result<Vec<String>> {
        self.counters.get_media_urls.fetch_add(1, Ordering::SeqCst);
        Self::delay(self.media_latency).await;

        let inner = self.read()?;
        if let Some(err) = inner.media_failures.get(sid) {
            return Err(err.clone());
        }
        Ok(inner.media.get(sid).cloned().unwrap_or_default())
    }

    async fn get_call(&self, _user: &User, sid: &str) -> Result<CallResource> {
        self.counters.get_call.fetch_add(1, Ordering::SeqCst);
        Self::delay(self.latency).await;

        let inner = self.read()?;
        if let Some(err) = inner.failures.get(sid) {
            return Err(err.clone());
        }
        inner
            .calls
            .iter()
            .find(|c| c.sid == sid)
            .cloned()
            .ok_or_else(|| {
                ProviderError::not_found(format!("The requested resource {} was not found", sid))
            })
    }

    async fn get_call_page(&self, _user: &User, filters: &Filters) -> Result<CallPage> {
        self.counters.get_call_page.fetch_add(1, Ordering::SeqCst);
        Self::delay(self.latency).await;
        self.call_page(filters, 0)
    }

    async fn get_next_call_page(&self, _user: &User, next_page_uri: &str) -> Result<CallPage> {
        self.counters.get_next_call_page.fetch_add(1, Ordering::SeqCst);
        Self::delay(self.latency).await;

        let (filters, page) = self.parse_next(next_page_uri, "Calls")?;
        self.call_page(&filters, page)
    }
}

fn page_size(filters: &Filters) -> Result<usize> {
    match filters.get(PAGE_SIZE) {
        None => Ok(DEFAULT_PAGE_SIZE),
        Some(v) => match v.parse::<usize>() {
            Ok(n) if (1..=MAX_PAGE_SIZE).contains(&n) => Ok(n),
            _ => Err(ProviderError::bad_request(format!("invalid PageSize: {}", v))),
        },
    }
}

fn parse_date(name: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ProviderError::bad_request(format!("invalid {}: {}", name, value)))
}

fn created_date(created_at: i64) -> Result<NaiveDate> {
    DateTime::<Utc>::from_timestamp_millis(created_at)
        .map(|dt| dt.date_naive())
        .ok_or_else(|| ProviderError::server(format!("timestamp out of range: {}", created_at)))
}

fn message_matches(message: &MessageResource, filters: &Filters) -> Result<bool> {
    for (name, value) in filters {
        let ok = match name.as_str() {
            PAGE_SIZE => true,
            "From" => message.from == *value,
            "To" => message.to == *value,
            "DateSent" => created_date(message.date_created)? == parse_date(name, value)?,
            "DateSent>" => created_date(message.date_created)? >= parse_date(name, value)?,
            "DateSent<" => created_date(message.date_created)? <= parse_date(name, value)?,
            other => {
                return Err(ProviderError::bad_request(format!(
                    "unknown message filter: {}",
                    other
                )))
            }
        };
        if !ok {
            return Ok(false);
        }
    }
    Ok(true)
}

fn call_matches(call: &CallResource, filters: &Filters) -> Result<bool> {
    for (name, value) in filters {
        let ok = match name.as_str() {
            PAGE_SIZE => true,
            "From" => call.from == *value,
            "To" => call.to == *value,
            "Status" => call.status == *value,
            "StartTime>" => created_date(call.date_created)? >= parse_date(name, value)?,
            "StartTime<" => created_date(call.date_created)? <= parse_date(name, value)?,
            other => {
                return Err(ProviderError::bad_request(format!(
                    "unknown call filter: {}",
                    other
                )))
            }
        };
        if !ok {
            return Ok(false);
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCOUNT: &str = "AC58f1e8f2b1c6b88ca90a012a4be0c279";
    const DAY_MS: i64 = 24 * 60 * 60 * 1000;

    fn message(n: u32, date_created: i64) -> MessageResource {
        MessageResource {
            sid: format!("SM{:032x}", n),
            date_created,
            from: "+14155551212".into(),
            to: format!("+1925555{:04}", n),
            body: format!("message {}", n),
            num_media: 0,
            status: "delivered".into(),
            direction: "outbound-api".into(),
        }
    }

    fn filters(pairs: &[(&str, &str)]) -> Filters {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_pagination_follows_next_uri() {
        let provider = MemoryProvider::new(ACCOUNT);
        for n in 0..5 {
            provider.insert_message(message(n, 1000 + n as i64)).unwrap();
        }
        let user = User::all();

        let first = provider
            .get_message_page(&user, &filters(&[("PageSize", "2")]))
            .await
            .unwrap();
        assert_eq!(first.messages.len(), 2);
        // Newest first.
        assert_eq!(first.messages[0].sid, message(4, 0).sid);

        let next = first.next_page_uri.unwrap();
        assert!(next.starts_with("/2010-04-01/Accounts/"));

        let second = provider.get_next_message_page(&user, &next).await.unwrap();
        assert_eq!(second.messages[0].sid, message(2, 0).sid);

        let third = provider
            .get_next_message_page(&user, &second.next_page_uri.unwrap())
            .await
            .unwrap();
        assert_eq!(third.messages.len(), 1);
        assert!(third.next_page_uri.is_none());

        let calls = provider.calls();
        assert_eq!(calls.get_message_page, 1);
        assert_eq!(calls.get_next_message_page, 2);
    }

    #[tokio::test]
    async fn test_filters_survive_pagination() {
        let provider = MemoryProvider::new(ACCOUNT);
        for n in 0..4 {
            provider.insert_message(message(n, n as i64 * DAY_MS)).unwrap();
        }
        let user = User::all();

        let page = provider
            .get_message_page(
                &user,
                &filters(&[("PageSize", "1"), ("DateSent>", "1970-01-02")]),
            )
            .await
            .unwrap();
        let next = page.next_page_uri.unwrap();
        assert!(next.contains("DateSent%3E=1970-01-02"));

        let page = provider.get_next_message_page(&user, &next).await.unwrap();
        let page = provider
            .get_next_message_page(&user, &page.next_page_uri.unwrap())
            .await
            .unwrap();
        assert_eq!(page.messages[0].sid, message(1, 0).sid);
        assert!(page.next_page_uri.is_none());
    }

    #[tokio::test]
    async fn test_unknown_filter_is_bad_request() {
        let provider = MemoryProvider::new(ACCOUNT);
        let err = provider
            .get_message_page(&User::all(), &filters(&[("Body", "x")]))
            .await
            .unwrap_err();
        assert_eq!(err.status, Some(400));
    }

    #[tokio::test]
    async fn test_missing_and_failing_resources() {
        let provider = MemoryProvider::new(ACCOUNT);
        let user = User::all();

        let err = provider.get_message(&user, "SMmissing").await.unwrap_err();
        assert!(err.is_not_found());

        provider.insert_message(message(1, 0)).unwrap();
        provider
            .fail(message(1, 0).sid, ProviderError::server("boom"))
            .unwrap();
        let err = provider.get_message(&user, &message(1, 0).sid).await.unwrap_err();
        assert_eq!(err.status, Some(500));
    }

    #[tokio::test]
    async fn test_wrong_collection_path() {
        let provider = MemoryProvider::new(ACCOUNT);
        let err = provider
            .get_next_call_page(
                &User::all(),
                &format!("/2010-04-01/Accounts/{}/Messages.json?Page=1", ACCOUNT),
            )
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let err = provider
            .get_next_message_page(
                &User::all(),
                &format!("/2010-04-01/Accounts/{}/Calls/../Messages.json?Page=1", ACCOUNT),
            )
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_media_urls() {
        let provider = MemoryProvider::new(ACCOUNT);
        provider
            .set_media("MM1", vec!["https://example.com/a.png".into()])
            .unwrap();

        let urls = provider.get_media_urls(&User::all(), "MM1").await.unwrap();
        assert_eq!(urls.len(), 1);
        assert!(provider
            .get_media_urls(&User::all(), "MM2")
            .await
            .unwrap()
            .is_empty());
    }
}
