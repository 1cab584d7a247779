//! Raw provider resources.
//!
//! These are exactly what the provider hands back. Nothing here is filtered:
//! wrap a resource in a view before exposing any of it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Provider API version. Every next-page path starts with `/` + this.
pub const API_VERSION: &str = "2010-04-01";

/// Name of the page size filter.
pub const PAGE_SIZE: &str = "PageSize";

/// Provider filter name -> value, e.g. `"DateSent>" -> "2016-09-01"`.
pub type Filters = BTreeMap<String, String>;

/// A message as stored by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResource {
    pub sid: String,
    /// Creation time (Unix ms).
    pub date_created: i64,
    pub from: String,
    pub to: String,
    pub body: String,
    pub num_media: u32,
    pub status: String,
    pub direction: String,
}

/// A call as stored by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallResource {
    pub sid: String,
    /// Creation time (Unix ms).
    pub date_created: i64,
    pub from: String,
    pub to: String,
    pub status: String,
    pub direction: String,
    /// Call length in seconds, once the call has ended.
    pub duration: Option<u32>,
}

/// One page of messages, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePage {
    pub messages: Vec<MessageResource>,
    /// Provider path of the next page, if there is one.
    pub next_page_uri: Option<String>,
}

/// One page of calls, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallPage {
    pub calls: Vec<CallResource>,
    /// Provider path of the next page, if there is one.
    pub next_page_uri: Option<String>,
}
