//! Session Arguments
//!
//! Per-request configuration handed over by the host engine, parsed from
//! the page-render request's query arguments. Read-only for the pipeline;
//! a missing or malformed value always means "feature absent", never an
//! error.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Comma-separated list of domains the session may reach.
pub const ARG_ALLOWED_DOMAINS: &str = "allowed_domains";

/// Comma-separated filter-list names, or the literal `none`.
pub const ARG_FILTERS: &str = "filters";

/// The top-level page URL; sub-resource requests inherit its domain for
/// first-/third-party matching.
pub const ARG_PAGE_URL: &str = "url";

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// One render session's arguments, plus a stable numeric identity used to
/// correlate log lines across the requests the session makes.
#[derive(Debug, Clone)]
pub struct SessionArgs {
    id: u64,
    args: HashMap<String, String>,
}

impl SessionArgs {
    /// Wrap the host-supplied argument map, assigning a fresh session id.
    pub fn new(args: HashMap<String, String>) -> Self {
        Self {
            id: NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed),
            args,
        }
    }

    /// Convenience constructor for literal argument pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self::new(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Raw value; `None` when the key is absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.args.get(key).map(String::as_str)
    }

    /// Comma-separated list value with empty tokens dropped.
    ///
    /// Absent keys and empty values both come back as an empty list, so
    /// `key=` behaves exactly like not passing `key` at all.
    pub fn list(&self, key: &str) -> Vec<&str> {
        self.get(key)
            .map(|v| v.split(',').filter(|t| !t.is_empty()).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_absent_key() {
        let args = SessionArgs::from_pairs([("url", "https://example.com")]);
        assert_eq!(args.get("url"), Some("https://example.com"));
        assert_eq!(args.get("filters"), None);
    }

    #[test]
    fn test_list_splits_and_drops_empty_tokens() {
        let args = SessionArgs::from_pairs([("filters", "a,,b,")]);
        assert_eq!(args.list("filters"), vec!["a", "b"]);
    }

    #[test]
    fn test_list_empty_value_equals_absent() {
        let args = SessionArgs::from_pairs([("allowed_domains", "")]);
        assert!(args.list("allowed_domains").is_empty());
        assert!(args.list("filters").is_empty());
    }

    #[test]
    fn test_ids_are_unique() {
        let a = SessionArgs::from_pairs([]);
        let b = SessionArgs::from_pairs([]);
        assert_ne!(a.id(), b.id());
    }
}
