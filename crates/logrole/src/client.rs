//! The view client: permission-checked, cursor-protected fetches.
//!
//! Every operation takes the requesting user explicitly. The client holds
//! nothing per request: the key, the age policy and the users are shared and
//! immutable, and the only background work is the prefetch scope.

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use logrole_cursor::{opaque, unopaque, CursorError, MediaToken, SecretKey};
use logrole_perms::{Permission, PermsError, User, UserFinder};
use logrole_provider::{Filters, Provider, ProviderError, PAGE_SIZE};
use logrole_views::{CallPageView, CallView, MessagePageView, MessageView};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};

use crate::config::{ClientConfig, Settings};
use crate::error::{Result, ViewerError};
use crate::filter::{self, Collection, NEXT};
use crate::prefetch::PrefetchScope;

/// One page of messages, ready to render.
#[derive(Debug, Clone)]
pub struct MessageListing {
    pub messages: Vec<MessageView>,
    /// Encrypted cursor for the next page, to be sent back as `next`.
    pub next_page_token: Option<String>,
    /// The filters in effect, as user-facing query pairs.
    pub query: Vec<(String, String)>,
    /// The earliest date a resource can have and still be shown.
    pub oldest_viewable: Option<NaiveDate>,
}

/// One page of calls, ready to render.
#[derive(Debug, Clone)]
pub struct CallListing {
    pub calls: Vec<CallView>,
    pub next_page_token: Option<String>,
    pub query: Vec<(String, String)>,
    pub oldest_viewable: Option<NaiveDate>,
}

/// A sealed link to one media attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaLink {
    /// Opaque [`MediaToken`] for the image route.
    pub token: String,
    /// Expiry (Unix ms).
    pub expires_at: i64,
}

/// What a detail view shows about attached media.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaOutcome {
    /// The message has no media.
    NoMedia,
    /// The user may not see media counts.
    Hidden,
    Links(Vec<MediaLink>),
    /// The media lookup failed or missed the deadline. The message itself is
    /// still shown.
    Failed(String),
}

/// A message plus its media.
#[derive(Debug, Clone)]
pub struct MessageDetail {
    pub message: MessageView,
    pub media: MediaOutcome,
    pub show_media_by_default: bool,
}

struct ListRequest {
    filters: Filters,
    next: Option<String>,
    query: Vec<(String, String)>,
}

/// An in-flight media lookup. Dropping it aborts the task.
struct MediaFetch {
    rx: oneshot::Receiver<logrole_provider::Result<Vec<String>>>,
    handle: JoinHandle<()>,
}

impl Drop for MediaFetch {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Permission-checked access to one provider account.
pub struct ViewClient<P: Provider> {
    provider: Arc<P>,
    users: Arc<dyn UserFinder>,
    secret: SecretKey,
    permission: Permission,
    config: ClientConfig,
    prefetch: PrefetchScope,
}

impl<P: Provider + 'static> ViewClient<P> {
    pub fn new<U>(
        provider: P,
        users: U,
        secret: SecretKey,
        permission: Permission,
        config: ClientConfig,
    ) -> Self
    where
        U: UserFinder + 'static,
    {
        let prefetch = PrefetchScope::new(config.prefetch_timeout);
        Self {
            provider: Arc::new(provider),
            users: Arc::new(users),
            secret,
            permission,
            config,
            prefetch,
        }
    }

    /// Build a client from validated settings.
    pub fn from_settings(provider: P, settings: &Settings) -> Result<Self> {
        settings.validate()?;
        Ok(Self::new(
            provider,
            settings.user_map(),
            settings.secret()?,
            settings.permission(),
            settings.client_config(),
        ))
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn permission(&self) -> &Permission {
        &self.permission
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn prefetch_scope(&self) -> &PrefetchScope {
        &self.prefetch
    }

    /// Cancel background prefetches. Requests keep working.
    pub fn shutdown(&self) {
        self.prefetch.shutdown();
    }

    /// Resolve an authenticated name.
    pub fn user(&self, name: &str) -> Result<Arc<User>> {
        self.users.find(name).ok_or_else(|| {
            info!(reason = "unknown_user", "request from unknown user");
            ViewerError::UnknownUser(name.to_string())
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Messages
    // ─────────────────────────────────────────────────────────────────────────

    /// List messages, either a first page built from filters or the page a
    /// `next` cursor points at.
    pub async fn list_messages(
        &self,
        user: &Arc<User>,
        query: &[(String, String)],
    ) -> Result<MessageListing> {
        if !user.can_view_messages() {
            return Err(denied("message list", PermsError::PermissionDenied));
        }
        let start = Instant::now();
        let deadline = start + self.config.request_timeout;
        let now = now_millis();
        let request = self.list_request(Collection::Messages, query, now)?;

        let page = match &request.next {
            Some(next) => {
                self.within(deadline, self.provider.get_next_message_page(user, next))
                    .await?
            }
            None => {
                self.within(deadline, self.provider.get_message_page(user, &request.filters))
                    .await?
            }
        };

        let (messages, next) = MessagePageView::new(page, user, &self.permission, now_millis())
            .map_err(|e| denied("message list", e))?
            .into_parts();

        let next_page_token = match next {
            Some(next) => {
                let token = opaque(&next, &self.secret)?;
                let provider = Arc::clone(&self.provider);
                let user = Arc::clone(user);
                self.prefetch.spawn("message page", async move {
                    provider.get_next_message_page(&user, &next).await
                });
                Some(token)
            }
            None => None,
        };

        debug!(
            count = messages.len(),
            elapsed = ?start.elapsed(),
            "fetched message page"
        );
        Ok(MessageListing {
            messages,
            next_page_token,
            query: request.query,
            oldest_viewable: self.oldest_viewable(now),
        })
    }

    /// Fetch one message and, when the user may see it, its media.
    ///
    /// The media lookup starts before the message fetch and runs alongside
    /// it. Its result is only used once the message has passed the gate.
    pub async fn get_message(&self, user: &Arc<User>, sid: &str) -> Result<MessageDetail> {
        if !Collection::Messages.is_valid_sid(sid) {
            return Err(ViewerError::NotFound(sid.to_string()));
        }
        let start = Instant::now();
        let deadline = start + self.config.request_timeout;

        let mut fetch = user
            .can_view_num_media()
            .then(|| self.spawn_media(user, sid));

        let message = self
            .within(deadline, self.provider.get_message(user, sid))
            .await?;
        let message = MessageView::new(message, Arc::clone(user), &self.permission, now_millis())
            .map_err(|e| denied(sid, e))?;

        let media = match (message.num_media(), fetch.as_mut()) {
            (Err(_), _) | (Ok(_), None) => MediaOutcome::Hidden,
            (Ok(0), Some(_)) => MediaOutcome::NoMedia,
            (Ok(_), Some(fetch)) => self.join_media(fetch, sid, deadline).await,
        };

        debug!(sid = %sid, elapsed = ?start.elapsed(), "fetched message");
        Ok(MessageDetail {
            message,
            media,
            show_media_by_default: self.config.show_media_by_default,
        })
    }

    /// Decode a media token for the image route.
    pub fn open_media(&self, user: &User, token: &str) -> Result<MediaToken> {
        if !user.can_view_num_media() {
            return Err(denied("media", PermsError::PermissionDenied));
        }
        Ok(MediaToken::open(token, &self.secret, now_millis())?)
    }

    fn spawn_media(&self, user: &Arc<User>, sid: &str) -> MediaFetch {
        let (tx, rx) = oneshot::channel();
        let provider = Arc::clone(&self.provider);
        let user = Arc::clone(user);
        let sid = sid.to_string();
        let handle = tokio::spawn(async move {
            let _ = tx.send(provider.get_media_urls(&user, &sid).await);
        });
        MediaFetch { rx, handle }
    }

    async fn join_media(&self, fetch: &mut MediaFetch, sid: &str, deadline: Instant) -> MediaOutcome {
        let urls = match timeout_at(deadline, &mut fetch.rx).await {
            Ok(Ok(Ok(urls))) => urls,
            Ok(Ok(Err(e))) => {
                warn!(sid = %sid, error = %e, "media lookup failed");
                return MediaOutcome::Failed("Could not load media".to_string());
            }
            Ok(Err(_)) => {
                warn!(sid = %sid, "media lookup ended without a result");
                return MediaOutcome::Failed("Could not load media".to_string());
            }
            Err(_) => {
                warn!(sid = %sid, "media lookup missed the deadline");
                return MediaOutcome::Failed("Timed out loading media".to_string());
            }
        };

        let ttl = i64::try_from(self.config.media_url_ttl.as_millis()).unwrap_or(i64::MAX);
        let expires_at = now_millis().saturating_add(ttl);
        let links: std::result::Result<Vec<MediaLink>, CursorError> = urls
            .into_iter()
            .map(|url| -> std::result::Result<MediaLink, CursorError> {
                let token = MediaToken::new(sid, url, expires_at).seal(&self.secret)?;
                Ok(MediaLink { token, expires_at })
            })
            .collect();

        match links {
            Ok(links) => MediaOutcome::Links(links),
            Err(e) => {
                warn!(sid = %sid, error = %e, "could not seal media token");
                MediaOutcome::Failed("Could not load media".to_string())
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Calls
    // ─────────────────────────────────────────────────────────────────────────

    /// List calls. Same rules as [`list_messages`](Self::list_messages).
    pub async fn list_calls(
        &self,
        user: &Arc<User>,
        query: &[(String, String)],
    ) -> Result<CallListing> {
        if !user.can_view_calls() {
            return Err(denied("call list", PermsError::PermissionDenied));
        }
        let start = Instant::now();
        let deadline = start + self.config.request_timeout;
        let now = now_millis();
        let request = self.list_request(Collection::Calls, query, now)?;

        let page = match &request.next {
            Some(next) => {
                self.within(deadline, self.provider.get_next_call_page(user, next))
                    .await?
            }
            None => {
                self.within(deadline, self.provider.get_call_page(user, &request.filters))
                    .await?
            }
        };

        let (calls, next) = CallPageView::new(page, user, &self.permission, now_millis())
            .map_err(|e| denied("call list", e))?
            .into_parts();

        let next_page_token = match next {
            Some(next) => {
                let token = opaque(&next, &self.secret)?;
                let provider = Arc::clone(&self.provider);
                let user = Arc::clone(user);
                self.prefetch.spawn("call page", async move {
                    provider.get_next_call_page(&user, &next).await
                });
                Some(token)
            }
            None => None,
        };

        debug!(count = calls.len(), elapsed = ?start.elapsed(), "fetched call page");
        Ok(CallListing {
            calls,
            next_page_token,
            query: request.query,
            oldest_viewable: self.oldest_viewable(now),
        })
    }

    pub async fn get_call(&self, user: &Arc<User>, sid: &str) -> Result<CallView> {
        if !Collection::Calls.is_valid_sid(sid) {
            return Err(ViewerError::NotFound(sid.to_string()));
        }
        let deadline = Instant::now() + self.config.request_timeout;
        let call = self.within(deadline, self.provider.get_call(user, sid)).await?;
        CallView::new(call, Arc::clone(user), &self.permission, now_millis())
            .map_err(|e| denied(sid, e))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn list_request(
        &self,
        collection: Collection,
        query: &[(String, String)],
        now: i64,
    ) -> Result<ListRequest> {
        let mut filters = filter::build_filters(collection, query, self.oldest_viewable(now))?;

        let Some(token) = filter::next_token(query) else {
            filters.insert(PAGE_SIZE.to_string(), self.config.page_size.to_string());
            let query = query
                .iter()
                .filter(|(key, value)| key != NEXT && !value.trim().is_empty())
                .cloned()
                .collect();
            return Ok(ListRequest {
                filters,
                next: None,
                query,
            });
        };

        let next = unopaque(token, &self.secret).map_err(|e| {
            debug!(error = %e, "could not decode next cursor");
            e
        })?;
        if let Err(e) = filter::check_next_uri(collection, &next) {
            warn!(
                collection = collection.path_segment(),
                "rejected next cursor with an unexpected path"
            );
            return Err(e);
        }

        Ok(ListRequest {
            filters: Filters::new(),
            query: filter::query_from_next_uri(collection, &next),
            next: Some(next),
        })
    }

    async fn within<T, F>(&self, deadline: Instant, fut: F) -> Result<T>
    where
        F: std::future::Future<Output = std::result::Result<T, ProviderError>>,
    {
        match timeout_at(deadline, fut).await {
            Ok(res) => Ok(res?),
            Err(_) => Err(ViewerError::Timeout(self.config.request_timeout)),
        }
    }

    fn oldest_viewable(&self, now: i64) -> Option<NaiveDate> {
        Utc.timestamp_millis_opt(self.permission.cutoff(now))
            .single()
            .map(|dt| dt.date_naive())
    }
}

fn denied(what: &str, e: PermsError) -> ViewerError {
    info!(resource = %what, reason = e.reason(), "hidden from user");
    e.into()
}

/// Current time in Unix milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
