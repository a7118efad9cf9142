//! Concurrent filesystem search engine
pub mod cancel;
pub mod engine;
pub mod filters;
pub mod matcher;

use serde::Serialize;
use std::path::PathBuf;
use std::time::SystemTime;
use walkdir::DirEntry;

pub use cancel::CancelToken;
pub use engine::Searcher;
pub use matcher::{fuzzy_match, NameMatcher};

/// Capacity of the channel between traversal workers and the collector.
pub const RESULTS_BUFFER_SIZE: usize = 100;

pub const DEFAULT_MAX_RESULTS: usize = 1000;

/// Path prefixes that are never searched, whatever the exclude list says.
pub const DEFAULT_SYSTEM_EXCLUDES: &[&str] = &["/proc", "/sys", "/dev", "/tmp"];

/// Search configuration
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub pattern: String,
    /// Fuzzy (subsequence) matching instead of glob matching.
    pub advanced: bool,
    pub extensions: Vec<String>,
    pub inert: InertFilters,
    /// Substring tokens; any path containing one is skipped.
    pub exclude: Vec<String>,
    /// Search roots. Empty means platform defaults.
    pub include: Vec<PathBuf>,
    /// Worker threads, 0 = logical CPU count.
    pub threads: usize,
    /// Maximum depth below a root, 0 = unlimited.
    pub depth: usize,
    pub follow_links: bool,
    pub max_results: usize,
    pub verbose: bool,
    pub system_excludes: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            pattern: String::new(),
            advanced: false,
            extensions: Vec::new(),
            inert: InertFilters::default(),
            exclude: Vec::new(),
            include: Vec::new(),
            threads: 0,
            depth: 0,
            follow_links: false,
            max_results: DEFAULT_MAX_RESULTS,
            verbose: false,
            system_excludes: DEFAULT_SYSTEM_EXCLUDES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl SearchConfig {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            ..Self::default()
        }
    }
}

/// Filters that are accepted on the command line but not applied.
///
/// Size, modification time and content filtering are not implemented; every
/// entry passes them. They are kept as typed options so callers can report
/// that they were ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InertFilters {
    pub size: Option<String>,
    pub mtime: Option<String>,
    pub content: Option<String>,
}

impl InertFilters {
    pub fn passes(&self, _entry: &DirEntry) -> bool {
        true
    }

    /// Names of the options that were set and will be ignored.
    pub fn ignored(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.size.as_deref().is_some_and(|s| !s.is_empty()) {
            names.push("size");
        }
        if self.mtime.as_deref().is_some_and(|s| !s.is_empty()) {
            names.push("mtime");
        }
        if self.content.as_deref().is_some_and(|s| !s.is_empty()) {
            names.push("content");
        }
        names
    }
}

/// One accepted filesystem entry
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub path: PathBuf,
    pub size: u64,
    #[serde(rename = "mod_time", serialize_with = "serialize_mod_time")]
    pub modified: SystemTime,
    pub is_dir: bool,
    pub mode: String,
}

fn serialize_mod_time<S>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let dt: chrono::DateTime<chrono::Local> = (*time).into();
    serializer.serialize_str(&dt.to_rfc3339())
}
