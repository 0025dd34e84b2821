//! Domain Allow-List Middleware
//!
//! Voids requests to hosts outside the session's `allowed_domains`
//! argument. An absent or empty argument disables the allow-list for
//! that request.

use crate::descriptor::{Method, RequestDescriptor};
use crate::middleware::Middleware;
use crate::session::{SessionArgs, ARG_ALLOWED_DOMAINS};
use tracing::debug;

/// Middleware that drops off-site requests.
#[derive(Debug, Clone)]
pub struct DomainAllowlist {
    allow_subdomains: bool,
    verbosity: u8,
}

impl Default for DomainAllowlist {
    fn default() -> Self {
        Self {
            allow_subdomains: true,
            verbosity: 0,
        }
    }
}

impl DomainAllowlist {
    pub fn new(allow_subdomains: bool, verbosity: u8) -> Self {
        Self {
            allow_subdomains,
            verbosity,
        }
    }

    /// Case-insensitive host check: exact domain, or a dotted-subdomain
    /// suffix when subdomains are allowed. Comparing whole labels keeps
    /// `notexample.com` from matching `example.com`.
    fn host_allowed(&self, host: &str, domains: &[&str]) -> bool {
        if domains.is_empty() {
            // no allow-list supplied: allow everything
            return true;
        }
        let host = host.to_ascii_lowercase();
        domains.iter().any(|raw| {
            let domain = raw.to_ascii_lowercase();
            host == domain
                || (self.allow_subdomains && host.ends_with(&format!(".{domain}")))
        })
    }
}

impl Middleware for DomainAllowlist {
    fn process(
        &self,
        descriptor: RequestDescriptor,
        session: &SessionArgs,
        operation: Method,
    ) -> RequestDescriptor {
        if descriptor.is_voided() {
            return descriptor;
        }

        let domains = session.list(ARG_ALLOWED_DOMAINS);
        let host = descriptor.url().host_str().unwrap_or("");
        if self.host_allowed(host, &domains) {
            return descriptor;
        }

        if self.verbosity >= 2 {
            debug!(
                target: "request_middleware",
                session = session.id(),
                "dropped offsite {}",
                descriptor.repr(operation)
            );
        }
        descriptor.void()
    }
}
