//! Permission-checked page views.

use std::sync::Arc;

use logrole_perms::{Permission, PermsError, Result, User};
use logrole_provider::{CallPage, MessagePage};
use tracing::debug;

use crate::call::CallView;
use crate::message::MessageView;

/// A page of messages with too-old entries removed.
#[derive(Debug, Clone)]
pub struct MessagePageView {
    messages: Vec<MessageView>,
    next_page_uri: Option<String>,
}

impl MessagePageView {
    /// Wrap a raw page.
    ///
    /// Fails with `PermissionDenied` if the user cannot view messages at
    /// all. Messages past the age cutoff are dropped, and if any were the
    /// next-page path is cleared: later pages only hold older messages.
    pub fn new(
        page: MessagePage,
        user: &Arc<User>,
        permission: &Permission,
        now: i64,
    ) -> Result<Self> {
        if !user.can_view_messages() {
            return Err(PermsError::PermissionDenied);
        }

        let mut messages = Vec::with_capacity(page.messages.len());
        let mut dropped = 0usize;
        for message in page.messages {
            match MessageView::new(message, Arc::clone(user), permission, now) {
                Ok(view) => messages.push(view),
                Err(PermsError::TooOld) => dropped += 1,
                Err(e) => return Err(e),
            }
        }

        let next_page_uri = if dropped > 0 {
            debug!(dropped, "dropped messages past the age cutoff");
            None
        } else {
            page.next_page_uri
        };

        Ok(Self {
            messages,
            next_page_uri,
        })
    }

    pub fn messages(&self) -> &[MessageView] {
        &self.messages
    }

    pub fn has_next_page(&self) -> bool {
        self.next_page_uri.is_some()
    }

    /// Split into the visible messages and the raw next-page path.
    ///
    /// The path must not reach the caller as-is; encrypt it first.
    pub fn into_parts(self) -> (Vec<MessageView>, Option<String>) {
        (self.messages, self.next_page_uri)
    }
}

/// A page of calls with too-old entries removed.
#[derive(Debug, Clone)]
pub struct CallPageView {
    calls: Vec<CallView>,
    next_page_uri: Option<String>,
}

impl CallPageView {
    /// Wrap a raw page. Same rules as [`MessagePageView::new`].
    pub fn new(
        page: CallPage,
        user: &Arc<User>,
        permission: &Permission,
        now: i64,
    ) -> Result<Self> {
        if !user.can_view_calls() {
            return Err(PermsError::PermissionDenied);
        }

        let mut calls = Vec::with_capacity(page.calls.len());
        let mut dropped = 0usize;
        for call in page.calls {
            match CallView::new(call, Arc::clone(user), permission, now) {
                Ok(view) => calls.push(view),
                Err(PermsError::TooOld) => dropped += 1,
                Err(e) => return Err(e),
            }
        }

        let next_page_uri = if dropped > 0 {
            debug!(dropped, "dropped calls past the age cutoff");
            None
        } else {
            page.next_page_uri
        };

        Ok(Self {
            calls,
            next_page_uri,
        })
    }

    pub fn calls(&self) -> &[CallView] {
        &self.calls
    }

    pub fn has_next_page(&self) -> bool {
        self.next_page_uri.is_some()
    }

    pub fn into_parts(self) -> (Vec<CallView>, Option<String>) {
        (self.calls, self.next_page_uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logrole_provider::{CallResource, MessageResource};
    use std::time::Duration;

    const NOW: i64 = 1_474_000_000_000;
    const HOUR_MS: i64 = 60 * 60 * 1000;
    const NEXT: &str = "/2010-04-01/Accounts/AC1/Messages.json?Page=1";

    fn message(n: u32, age_ms: i64) -> MessageResource {
        MessageResource {
            sid: format!("SM{:032x}", n),
            date_created: NOW - age_ms,
            from: "+14155551212".into(),
            to: "+19253920364".into(),
            body: String::new(),
            num_media: 0,
            status: "sent".into(),
            direction: "outbound-api".into(),
        }
    }

    fn permission() -> Permission {
        Permission::new(Duration::from_secs(24 * 60 * 60))
    }

    #[test]
    fn test_page_keeps_next_when_everything_is_fresh() {
        let page = MessagePage {
            messages: vec![message(1, HOUR_MS), message(2, 2 * HOUR_MS)],
            next_page_uri: Some(NEXT.into()),
        };
        let view = MessagePageView::new(page, &Arc::new(User::all()), &permission(), NOW).unwrap();

        assert_eq!(view.messages().len(), 2);
        assert!(view.has_next_page());
        assert_eq!(view.into_parts().1.as_deref(), Some(NEXT));
    }

    #[test]
    fn test_page_drops_old_and_clears_next() {
        let page = MessagePage {
            messages: vec![message(1, HOUR_MS), message(2, 25 * HOUR_MS), message(3, 30 * HOUR_MS)],
            next_page_uri: Some(NEXT.into()),
        };
        let view = MessagePageView::new(page, &Arc::new(User::all()), &permission(), NOW).unwrap();

        assert_eq!(view.messages().len(), 1);
        assert_eq!(view.messages()[0].sid(), message(1, 0).sid);
        assert!(!view.has_next_page());
    }

    #[test]
    fn test_page_denied_without_parent_capability() {
        let page = MessagePage::default();
        let err = MessagePageView::new(page, &Arc::new(User::default()), &permission(), NOW)
            .unwrap_err();
        assert_eq!(err, PermsError::PermissionDenied);
    }

    #[test]
    fn test_call_page() {
        let call = CallResource {
            sid: "CA00000000000000000000000000000001".into(),
            date_created: NOW - 25 * HOUR_MS,
            from: "+14155551212".into(),
            to: "+19253920364".into(),
            status: "completed".into(),
            direction: "inbound".into(),
            duration: Some(3),
        };
        let page = CallPage {
            calls: vec![call],
            next_page_uri: Some("/2010-04-01/Accounts/AC1/Calls.json?Page=1".into()),
        };
        let view = CallPageView::new(page, &Arc::new(User::all()), &permission(), NOW).unwrap();

        assert!(view.calls().is_empty());
        assert!(!view.has_next_page());
    }
}
