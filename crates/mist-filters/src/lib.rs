//! Mist Blocking Engine
//!
//! Named, compiled Adblock filter sets for the mist rendering service.
//!
//! Rule syntax and URL matching are delegated to Brave's `adblock` engine;
//! this crate owns naming, loading and lookup:
//!
//! 1. At startup, [`RuleRegistry::load`] scans a directory of `.txt` files
//! 2. Each file compiles into one immutable [`CompiledFilterSet`]
//! 3. Per request, [`RuleRegistry::get_blocking_filter`] answers which
//!    named set (if any) blocks a URL
//!
//! The registry never changes after `load`; concurrent page loads share it
//! behind an `Arc`.

mod registry;

pub use registry::{
    BadRule, CompiledFilterSet, MatchOptions, RegistryError, RuleRegistry,
};
