//! Default Middleware Stack
//!
//! Assembles the pipeline the rendering service runs in production: the
//! request logger at high verbosity, the domain allow-list, and the
//! adblock filter when a filter-list directory is configured.

use crate::allowlist::DomainAllowlist;
use crate::blocker::AdblockFilter;
use crate::logger::RequestLogger;
use crate::middleware::MiddlewarePipeline;
use mist_filters::{RegistryError, RuleRegistry};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Service-level options for the request filtering stack.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterStackConfig {
    /// Allow dotted subdomains of allow-listed domains.
    pub allow_subdomains: bool,
    /// 0 silent, 1 warnings, 2 per-request block/drop detail.
    pub verbosity: u8,
    /// Directory of named `.txt` filter lists; `None` disables adblock
    /// filtering entirely.
    pub filters_path: Option<PathBuf>,
}

impl Default for FilterStackConfig {
    fn default() -> Self {
        Self {
            allow_subdomains: true,
            verbosity: 0,
            filters_path: None,
        }
    }
}

/// The assembled default pipeline plus the registry it shares.
///
/// The registry handle is exposed so the host can validate filter names
/// up front and swap in a freshly loaded registry on reload.
pub struct FilterStack {
    pub pipeline: MiddlewarePipeline,
    pub registry: Option<Arc<RuleRegistry>>,
}

impl std::fmt::Debug for FilterStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterStack")
            .field("pipeline_len", &self.pipeline.len())
            .field("has_registry", &self.registry.is_some())
            .finish()
    }
}

/// Load filter lists (when configured) and assemble the default pipeline.
///
/// Registry construction is fail-fast: an unreadable file or an
/// unsupported rule aborts startup instead of serving with partial
/// coverage.
pub fn build_stack(config: &FilterStackConfig) -> Result<FilterStack, RegistryError> {
    let registry = match &config.filters_path {
        Some(path) => Some(Arc::new(RuleRegistry::load(path, config.verbosity)?)),
        None => None,
    };

    let mut pipeline = MiddlewarePipeline::new();
    if config.verbosity >= 2 {
        pipeline.push(RequestLogger);
    }
    pipeline.push(DomainAllowlist::new(
        config.allow_subdomains,
        config.verbosity,
    ));
    if let Some(registry) = &registry {
        pipeline.push(AdblockFilter::new(Arc::clone(registry), config.verbosity));
    }

    Ok(FilterStack { pipeline, registry })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_minimal_stack_is_allowlist_only() {
        let stack = build_stack(&FilterStackConfig::default()).unwrap();
        assert_eq!(stack.pipeline.len(), 1);
        assert!(stack.registry.is_none());
    }

    #[test]
    fn test_full_stack_with_filters_and_logging() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("default.txt"), "/ads/*\n").unwrap();

        let stack = build_stack(&FilterStackConfig {
            verbosity: 2,
            filters_path: Some(dir.path().to_path_buf()),
            ..Default::default()
        })
        .unwrap();

        // logger, allowlist, adblock
        assert_eq!(stack.pipeline.len(), 3);
        let registry = stack.registry.expect("registry should be loaded");
        assert!(registry.filter_is_known("default"));
    }

    #[test]
    fn test_bad_filter_directory_fails_startup() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("default.txt"), "||example.com^$foobar\n").unwrap();

        let err = build_stack(&FilterStackConfig {
            filters_path: Some(dir.path().to_path_buf()),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, RegistryError::UnsupportedRule { .. }));
    }
}
