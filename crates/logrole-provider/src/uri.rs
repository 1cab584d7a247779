//! Query-string helpers for provider paths.
//!
//! Next-page paths look like
//! `/2010-04-01/Accounts/AC.../Messages.json?DateSent%3E=2016-09-01&PageSize=50&Page=1`.
//! Filter names such as `DateSent>` are form-encoded in the path.

use url::{form_urlencoded, Url};

/// Placeholder origin for resolving provider-relative paths.
const BASE: &str = "https://provider.invalid";

/// A provider-relative path split into its path and decoded query pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderPath {
    pub path: String,
    pub query: Vec<(String, String)>,
}

/// Parse a provider-relative path.
///
/// Returns `None` for absolute or protocol-relative URLs, for paths with a
/// fragment, and for paths that normalization would change (`..`, `.`,
/// characters needing escapes).
pub fn parse_path(uri: &str) -> Option<ProviderPath> {
    if !uri.starts_with('/') || uri.starts_with("//") {
        return None;
    }
    let url = Url::parse(BASE).ok()?.join(uri).ok()?;
    let raw_path = uri.split('?').next().unwrap_or(uri);
    if url.fragment().is_some() || url.path() != raw_path {
        return None;
    }
    Some(ProviderPath {
        path: url.path().to_string(),
        query: url.query_pairs().into_owned().collect(),
    })
}

/// Join a path and form-encoded query parameters.
pub fn build_uri<'a, I>(path: &str, params: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish();
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MESSAGES: &str = "/2010-04-01/Accounts/AC1/Messages.json";

    #[test]
    fn test_build_and_parse() {
        let uri = build_uri(
            MESSAGES,
            [("From", "+14155551212"), ("DateSent<", "2016-09-01"), ("Page", "2")],
        );
        assert_eq!(
            uri,
            "/2010-04-01/Accounts/AC1/Messages.json?From=%2B14155551212&DateSent%3C=2016-09-01&Page=2"
        );

        let parsed = parse_path(&uri).unwrap();
        assert_eq!(parsed.path, MESSAGES);
        assert_eq!(
            parsed.query,
            vec![
                ("From".to_string(), "+14155551212".to_string()),
                ("DateSent<".to_string(), "2016-09-01".to_string()),
                ("Page".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_path_without_query() {
        assert_eq!(build_uri(MESSAGES, []), MESSAGES);
        let parsed = parse_path(MESSAGES).unwrap();
        assert_eq!(parsed.path, MESSAGES);
        assert!(parsed.query.is_empty());
    }

    #[test]
    fn test_rejects_paths_that_leave_the_provider() {
        for uri in [
            "https://evil.example/2010-04-01/Accounts/AC1/Messages.json",
            "//evil.example/2010-04-01/Messages.json",
            "2010-04-01/Accounts/AC1/Messages.json",
            "/2010-04-01/../Accounts/AC1/Messages.json",
            "/2010-04-01/Accounts/AC1/Messages.json#frag",
        ] {
            assert!(parse_path(uri).is_none(), "{}", uri);
        }
    }
}
