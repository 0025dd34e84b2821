//! Rule Registry
//!
//! Loads a directory of named filter-list files into compiled, immutable
//! matchers. One file = one filter set; the file stem is the set's name.
//!
//! Loading is fail-fast: an unreadable file or a rule the matcher cannot
//! parse aborts the whole load. A registry silently missing one set would
//! stop blocking everything that set covers, which is worse than refusing
//! to start.

use adblock::lists::{parse_filter, FilterSet, ParseOptions};
use adblock::request::Request;
use adblock::Engine;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Errors that abort registry construction.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read filter list {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported rule in {path} line {line}: {rule}")]
    UnsupportedRule {
        path: PathBuf,
        line: usize,
        rule: String,
    },
}

/// A rule the underlying matcher refused, with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadRule {
    pub line: usize,
    pub rule: String,
}

/// Per-query matching options.
///
/// The supported option set is fixed: `domain`, the host of the top-level
/// page that triggered the request. It decides first- versus third-party
/// matching for rules that care.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchOptions {
    pub domain: Option<String>,
}

impl MatchOptions {
    /// Derive the `domain` option from a page URL, when one parses.
    ///
    /// An absent or unparsable page URL leaves the option unset, which
    /// matching treats as first-party.
    pub fn for_page_url(page_url: Option<&str>) -> Self {
        let domain = page_url
            .and_then(|raw| url::Url::parse(raw).ok())
            .and_then(|u| u.host_str().map(str::to_owned));
        Self { domain }
    }
}

/// One named, immutable compiled filter set.
///
/// Matching is deterministic and side-effect free, safe to call from
/// concurrent page loads.
pub struct CompiledFilterSet {
    name: String,
    engine: Engine,
}

impl std::fmt::Debug for CompiledFilterSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledFilterSet")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl CompiledFilterSet {
    /// Compile raw filter-list text.
    ///
    /// Blank lines and comment lines (`!`, `[`) are ignored. Every other
    /// line must be a rule the engine can parse; the first one it cannot
    /// fails the whole compilation. Skipping bad rules silently would hide
    /// broken lists until something they should block gets through.
    pub fn compile(name: impl Into<String>, text: &str) -> Result<Self, BadRule> {
        let mut rules = Vec::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('!') || line.starts_with('[') {
                continue;
            }
            if parse_filter(line, false, ParseOptions::default()).is_err() {
                return Err(BadRule {
                    line: idx + 1,
                    rule: line.to_string(),
                });
            }
            rules.push(line);
        }

        let mut filter_set = FilterSet::new(false);
        filter_set.add_filters(&rules, ParseOptions::default());
        Ok(Self {
            name: name.into(),
            engine: Engine::from_filter_set(filter_set, true),
        })
    }

    /// Name of the source filter list.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check whether this set blocks `url`.
    pub fn matches(&self, url: &str, options: &MatchOptions) -> bool {
        // The engine wants the requesting page's URL for party checks; no
        // domain option means the request is its own first party.
        let source_url = match &options.domain {
            Some(domain) => format!("https://{domain}/"),
            None => url.to_string(),
        };
        match Request::new(url, &source_url, "other") {
            Ok(request) => self.engine.check_network_request(&request).matched,
            Err(_) => false,
        }
    }
}

/// Named filter sets, loaded once and read-only thereafter.
///
/// Hot reload means loading a fresh registry and swapping the `Arc`, never
/// mutating one in place.
pub struct RuleRegistry {
    filters: HashMap<String, CompiledFilterSet>,
    verbosity: u8,
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("filters", &self.filters)
            .field("verbosity", &self.verbosity)
            .finish()
    }
}

impl RuleRegistry {
    /// Load every regular `*.txt` file directly under `dir` (non-recursive).
    pub fn load(dir: impl AsRef<Path>, verbosity: u8) -> Result<Self, RegistryError> {
        let dir = dir.as_ref();
        let read_err = |source| RegistryError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut filters = HashMap::new();
        for entry in fs::read_dir(dir).map_err(read_err)? {
            let entry = entry.map_err(read_err)?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("txt") {
                continue;
            }
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            if verbosity >= 1 {
                info!(target: "request_middleware", "loading filter list {}", path.display());
            }
            let text = fs::read_to_string(&path).map_err(|source| RegistryError::Io {
                path: path.clone(),
                source,
            })?;
            let set = CompiledFilterSet::compile(name, &text).map_err(|bad| {
                RegistryError::UnsupportedRule {
                    path: path.clone(),
                    line: bad.line,
                    rule: bad.rule,
                }
            })?;
            filters.insert(name.to_string(), set);
        }

        Ok(Self { filters, verbosity })
    }

    /// Whether `name` was loaded from a file present at startup.
    pub fn filter_is_known(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    /// Names known to this registry, in no particular order.
    pub fn filter_names(&self) -> impl Iterator<Item = &str> {
        self.filters.keys().map(String::as_str)
    }

    /// First name in caller order whose compiled set blocks `url`.
    ///
    /// Unknown names point at an upstream validation gap; they are logged
    /// and skipped, never fatal.
    pub fn get_blocking_filter(
        &self,
        names: &[&str],
        url: &str,
        options: &MatchOptions,
    ) -> Option<&str> {
        for name in names {
            let Some(set) = self.filters.get(*name) else {
                if self.verbosity >= 1 {
                    // filter names should have been validated before a
                    // request carries them this far
                    warn!(target: "request_middleware", "unknown filter name: {name}");
                }
                continue;
            };
            if set.matches(url, options) {
                return Some(set.name());
            }
        }
        None
    }
}
