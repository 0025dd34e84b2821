//! Request Logging Middleware

use crate::descriptor::{Method, RequestDescriptor};
use crate::middleware::Middleware;
use crate::session::SessionArgs;
use tracing::info;

/// Logs one line per outgoing request; never filters or rewrites.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestLogger;

impl Middleware for RequestLogger {
    fn process(
        &self,
        descriptor: RequestDescriptor,
        session: &SessionArgs,
        operation: Method,
    ) -> RequestDescriptor {
        info!(
            target: "network",
            session = session.id(),
            "request {}",
            descriptor.repr(operation)
        );
        descriptor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    #[test]
    fn test_logger_never_mutates() {
        let session = SessionArgs::from_pairs([]);
        let descriptor =
            RequestDescriptor::new(Url::parse("https://example.com/x").unwrap(), Method::Post);
        let out = RequestLogger.process(descriptor.clone(), &session, Method::Post);
        assert_eq!(out, descriptor);
    }
}
