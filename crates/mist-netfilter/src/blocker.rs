//! Adblock Filter Middleware
//!
//! Voids requests that match one of the session's named filter lists.
//! Which lists apply is decided per request by the `filters` session
//! argument; the compiled rules live in a shared [`RuleRegistry`].

use crate::descriptor::{Method, RequestDescriptor};
use crate::middleware::Middleware;
use crate::session::{SessionArgs, ARG_FILTERS, ARG_PAGE_URL};
use mist_filters::{MatchOptions, RuleRegistry};
use std::sync::Arc;
use tracing::debug;

/// Filter list applied when a session names none.
const DEFAULT_FILTER: &str = "default";

/// Sentinel filter name that disables blocking for a session.
const BYPASS_FILTER: &str = "none";

/// Middleware that drops requests matching Adblock filter lists.
pub struct AdblockFilter {
    registry: Arc<RuleRegistry>,
    verbosity: u8,
}

impl AdblockFilter {
    pub fn new(registry: Arc<RuleRegistry>, verbosity: u8) -> Self {
        Self {
            registry,
            verbosity,
        }
    }
}

impl Middleware for AdblockFilter {
    fn process(
        &self,
        descriptor: RequestDescriptor,
        session: &SessionArgs,
        operation: Method,
    ) -> RequestDescriptor {
        if descriptor.is_voided() {
            return descriptor;
        }

        let mut names = session.list(ARG_FILTERS);
        if names == [BYPASS_FILTER] {
            return descriptor;
        }
        if names.is_empty() {
            if !self.registry.filter_is_known(DEFAULT_FILTER) {
                // no filters requested and no default list loaded
                return descriptor;
            }
            names.push(DEFAULT_FILTER);
        }

        // rules with party options match against the top-level page's
        // domain, not the sub-resource's own
        let options = MatchOptions::for_page_url(session.get(ARG_PAGE_URL));
        let Some(filter) =
            self.registry
                .get_blocking_filter(&names, descriptor.url().as_str(), &options)
        else {
            return descriptor;
        };

        if self.verbosity >= 2 {
            debug!(
                target: "request_middleware",
                session = session.id(),
                filter,
                "dropped {}",
                descriptor.repr(operation)
            );
        }
        descriptor.void()
    }
}
