//! Middleware Pipeline
//!
//! Ordered composition of request middleware, applied once per outgoing
//! request. Registration order is evaluation order.
//!
//! The pipeline never short-circuits: every stage runs even when an
//! earlier one already voided the request. Stages treat a voided
//! descriptor as a pass-through no-op, so the outcome is the same either
//! way; a logger-style stage still gets to see dropped requests.

use crate::descriptor::{Method, RequestDescriptor};
use crate::session::SessionArgs;

/// A pipeline stage that may inspect, rewrite, or void an outgoing
/// request.
///
/// Implementations must not panic on well-formed input and must treat
/// unknown or malformed session arguments as "feature absent". The
/// `operation` parameter identifies the HTTP method for log lines only.
pub trait Middleware: Send + Sync {
    fn process(
        &self,
        descriptor: RequestDescriptor,
        session: &SessionArgs,
        operation: Method,
    ) -> RequestDescriptor;
}

/// Ordered set of middleware applied to every outgoing request.
#[derive(Default)]
pub struct MiddlewarePipeline {
    stages: Vec<Box<dyn Middleware>>,
}

impl MiddlewarePipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage; it runs after every stage already registered.
    pub fn push(&mut self, stage: impl Middleware + 'static) {
        self.stages.push(Box::new(stage));
    }

    /// Builder-style [`push`](Self::push).
    pub fn with(mut self, stage: impl Middleware + 'static) -> Self {
        self.push(stage);
        self
    }

    /// Thread one request through every stage, in order.
    ///
    /// The returned descriptor carries the verdict: voided means the host
    /// must abort dispatch; anything else is dispatched as returned.
    pub fn run(
        &self,
        mut descriptor: RequestDescriptor,
        session: &SessionArgs,
        operation: Method,
    ) -> RequestDescriptor {
        for stage in &self.stages {
            descriptor = stage.process(descriptor, session, operation);
        }
        descriptor
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use url::Url;

    fn request(url: &str) -> RequestDescriptor {
        RequestDescriptor::new(Url::parse(url).unwrap(), Method::Get)
    }

    /// Counts invocations; voids when told to.
    struct Probe {
        calls: Arc<AtomicUsize>,
        void: bool,
    }

    impl Middleware for Probe {
        fn process(
            &self,
            descriptor: RequestDescriptor,
            _session: &SessionArgs,
            _operation: Method,
        ) -> RequestDescriptor {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.void {
                descriptor.void()
            } else {
                descriptor
            }
        }
    }

    #[test]
    fn test_stages_run_in_registration_order_after_void() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let pipeline = MiddlewarePipeline::new()
            .with(Probe {
                calls: Arc::clone(&first),
                void: true,
            })
            .with(Probe {
                calls: Arc::clone(&second),
                void: false,
            });

        let session = SessionArgs::from_pairs([]);
        let out = pipeline.run(request("https://example.com/"), &session, Method::Get);

        // the later stage still ran even though the request was voided
        assert!(out.is_voided());
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_pipeline_passes_request_through() {
        let pipeline = MiddlewarePipeline::new();
        assert!(pipeline.is_empty());

        let session = SessionArgs::from_pairs([]);
        let out = pipeline.run(request("https://example.com/"), &session, Method::Get);
        assert!(!out.is_voided());
        assert_eq!(out.url().as_str(), "https://example.com/");
    }
}
