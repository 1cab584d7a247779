//! Query validation for list views.
//!
//! Each collection has an allow-list of query keys. A key maps 1:1 to a
//! provider filter name and carries a value rule. Anything else in the query
//! is rejected before the provider is called.

use std::collections::HashSet;

use chrono::NaiveDate;
use logrole_provider::{uri, Filters, API_VERSION};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, ViewerError};

/// The query key carrying an encrypted next-page cursor.
pub const NEXT: &str = "next";

static PHONE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9]{2,15}$").expect("phone number pattern"));

static CLIENT_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^client:[A-Za-z0-9_.\-]{1,64}$").expect("client name pattern"));

static MESSAGE_SID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(MM|SM)[a-f0-9]{32}$").expect("message sid pattern"));

static CALL_SID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^CA[a-f0-9]{32}$").expect("call sid pattern"));

const CALL_STATUSES: &[&str] = &[
    "queued",
    "ringing",
    "in-progress",
    "canceled",
    "completed",
    "failed",
    "busy",
    "no-answer",
];

/// A listable resource collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Messages,
    Calls,
}

impl Collection {
    /// The provider path segment, e.g. `Messages.json`.
    pub const fn path_segment(&self) -> &'static str {
        match self {
            Collection::Messages => "Messages.json",
            Collection::Calls => "Calls.json",
        }
    }

    fn rules(&self) -> &'static [Rule] {
        match self {
            Collection::Messages => MESSAGE_RULES,
            Collection::Calls => CALL_RULES,
        }
    }

    /// Whether `sid` has the shape of a resource in this collection.
    pub fn is_valid_sid(&self, sid: &str) -> bool {
        match self {
            Collection::Messages => MESSAGE_SID.is_match(sid),
            Collection::Calls => CALL_SID.is_match(sid),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Value {
    Phone,
    Date,
    /// A date whose range must not end before the age cutoff.
    EndDate,
    CallStatus,
}

struct Rule {
    key: &'static str,
    filter: &'static str,
    value: Value,
}

const MESSAGE_RULES: &[Rule] = &[
    Rule { key: "from", filter: "From", value: Value::Phone },
    Rule { key: "to", filter: "To", value: Value::Phone },
    Rule { key: "date-sent", filter: "DateSent", value: Value::Date },
    Rule { key: "date-sent-after", filter: "DateSent>", value: Value::Date },
    Rule { key: "date-sent-before", filter: "DateSent<", value: Value::EndDate },
];

const CALL_RULES: &[Rule] = &[
    Rule { key: "from", filter: "From", value: Value::Phone },
    Rule { key: "to", filter: "To", value: Value::Phone },
    Rule { key: "status", filter: "Status", value: Value::CallStatus },
    Rule { key: "start-time-after", filter: "StartTime>", value: Value::Date },
    Rule { key: "start-time-before", filter: "StartTime<", value: Value::EndDate },
];

/// Validate a query and map it to provider filters.
///
/// `next` is allowed and skipped. Empty values count as absent. `oldest` is
/// the first viewable date, if the age policy has one.
pub fn build_filters(
    collection: Collection,
    query: &[(String, String)],
    oldest: Option<NaiveDate>,
) -> Result<Filters> {
    let mut seen = HashSet::new();
    let mut filters = Filters::new();

    for (key, value) in query {
        if !seen.insert(key.as_str()) {
            return Err(ViewerError::Validation(format!(
                "duplicate query parameter: {}",
                key
            )));
        }
        if key == NEXT {
            continue;
        }
        let rule = collection
            .rules()
            .iter()
            .find(|rule| rule.key == key)
            .ok_or_else(|| ViewerError::Validation(format!("unknown query parameter: {}", key)))?;

        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        let value = normalize(rule, value, oldest)?;
        filters.insert(rule.filter.to_string(), value);
    }
    Ok(filters)
}

/// The `next` cursor in a query, if present and non-empty.
pub fn next_token(query: &[(String, String)]) -> Option<&str> {
    query
        .iter()
        .find(|(key, _)| key == NEXT)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

fn normalize(rule: &Rule, value: &str, oldest: Option<NaiveDate>) -> Result<String> {
    match rule.value {
        Value::Phone => phone_number(value).ok_or_else(|| {
            ViewerError::Validation(format!("invalid phone number for {}", rule.key))
        }),
        Value::Date => Ok(date(rule, value)?.to_string()),
        Value::EndDate => {
            let end = date(rule, value)?;
            match oldest {
                Some(oldest) if end < oldest => Err(ViewerError::Validation(format!(
                    "{} is before the oldest viewable date {}",
                    rule.key, oldest
                ))),
                _ => Ok(end.to_string()),
            }
        }
        Value::CallStatus => {
            if CALL_STATUSES.contains(&value) {
                Ok(value.to_string())
            } else {
                Err(ViewerError::Validation(format!("invalid call status: {}", value)))
            }
        }
    }
}

fn phone_number(value: &str) -> Option<String> {
    if CLIENT_NAME.is_match(value) {
        return Some(value.to_string());
    }
    let stripped: String = value
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect();
    PHONE_NUMBER.is_match(&stripped).then_some(stripped)
}

fn date(rule: &Rule, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        ViewerError::Validation(format!("{} must be a date like 2016-09-01", rule.key))
    })
}

/// Check that a decrypted cursor is a next-page path for `collection`.
pub fn check_next_uri(collection: Collection, next: &str) -> Result<()> {
    let prefix = format!("/{}/", API_VERSION);
    let segment = format!("/{}", collection.path_segment());
    match uri::parse_path(next) {
        Some(parsed) if parsed.path.starts_with(&prefix) && parsed.path.ends_with(&segment) => {
            Ok(())
        }
        _ => Err(ViewerError::Validation("Invalid next page uri".to_string())),
    }
}

/// Recover the user-facing query from a next-page path, so the filters
/// stay visible while paging.
pub fn query_from_next_uri(collection: Collection, next: &str) -> Vec<(String, String)> {
    let Some(parsed) = uri::parse_path(next) else {
        return Vec::new();
    };
    parsed
        .query
        .into_iter()
        .filter_map(|(name, value)| {
            collection
                .rules()
                .iter()
                .find(|rule| rule.filter == name)
                .map(|rule| (rule.key.to_string(), value))
        })
        .collect()
}
