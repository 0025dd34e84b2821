//! Mist Network Filter
//!
//! Request-interception pipeline for the mist rendering service.
//!
//! Every outgoing HTTP(S) request a rendered page makes is threaded
//! through an ordered middleware pipeline before it touches the network:
//!
//! 1. The host engine builds a [`RequestDescriptor`] and the session's
//!    [`SessionArgs`]
//! 2. [`MiddlewarePipeline::run`] threads the descriptor through every
//!    stage, in registration order
//! 3. A stage may rewrite the URL or void the request entirely
//! 4. The host dispatches the returned descriptor, or aborts dispatch
//!    when it comes back voided
//!
//! Voiding is a policy outcome, not an error; the host tells the two
//! apart by inspecting the descriptor, never by catching anything.
//!
//! Blocking rules come from named Adblock-style filter lists compiled
//! once at startup into a shared, read-only [`RuleRegistry`]
//! (see `mist-filters`).

mod allowlist;
mod blocker;
mod descriptor;
mod logger;
mod middleware;
mod session;
mod stack;

pub use allowlist::DomainAllowlist;
pub use blocker::AdblockFilter;
pub use descriptor::{Method, RequestDescriptor};
pub use logger::RequestLogger;
pub use middleware::{Middleware, MiddlewarePipeline};
pub use session::{SessionArgs, ARG_ALLOWED_DOMAINS, ARG_FILTERS, ARG_PAGE_URL};
pub use stack::{build_stack, FilterStack, FilterStackConfig};

pub use mist_filters::{CompiledFilterSet, MatchOptions, RegistryError, RuleRegistry};
