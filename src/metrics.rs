//! Search counters, registered in a prometheus registry
use crate::error::{LocateError, Result};
use prometheus::{Encoder, IntCounter, Opts, Registry, TextEncoder};
use std::fmt;
use std::sync::Arc;

/// Counters shared by the traversal workers and the collector
#[derive(Clone)]
pub struct Metrics {
    pub entries_visited: IntCounter,
    pub entries_excluded: IntCounter,
    pub depth_pruned: IntCounter,
    pub matches_found: IntCounter,
    pub results_dropped: IntCounter,
    pub traversal_errors: IntCounter,
    registry: Arc<Registry>,
}

impl Metrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new_custom(Some("rlocate".to_string()), None)?;

        let counter = |name: &str, help: &str| -> Result<IntCounter> {
            let counter = IntCounter::with_opts(Opts::new(name, help))?;
            registry.register(Box::new(counter.clone()))?;
            Ok(counter)
        };

        Ok(Metrics {
            entries_visited: counter("entries_visited", "Entries yielded by the walker")?,
            entries_excluded: counter("entries_excluded", "Entries skipped by exclusion")?,
            depth_pruned: counter("depth_pruned", "Entries below the depth limit")?,
            matches_found: counter("matches_found", "Entries passing every filter")?,
            results_dropped: counter("results_dropped", "Matches past max_results")?,
            traversal_errors: counter("traversal_errors", "Unreadable paths and roots")?,
            registry: Arc::new(registry),
        })
    }

    pub fn reset(&self) {
        for counter in self.counters() {
            counter.reset();
        }
    }

    pub fn snapshot(&self) -> SearchStats {
        SearchStats {
            entries_visited: self.entries_visited.get(),
            entries_excluded: self.entries_excluded.get(),
            depth_pruned: self.depth_pruned.get(),
            matches_found: self.matches_found.get(),
            results_dropped: self.results_dropped.get(),
            traversal_errors: self.traversal_errors.get(),
        }
    }

    /// Prometheus text exposition of every counter.
    pub fn gather(&self) -> Result<String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| LocateError::Other(e.to_string()))
    }

    fn counters(&self) -> [&IntCounter; 6] {
        [
            &self.entries_visited,
            &self.entries_excluded,
            &self.depth_pruned,
            &self.matches_found,
            &self.results_dropped,
            &self.traversal_errors,
        ]
    }
}

/// Point-in-time copy of [`Metrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub entries_visited: u64,
    pub entries_excluded: u64,
    pub depth_pruned: u64,
    pub matches_found: u64,
    pub results_dropped: u64,
    pub traversal_errors: u64,
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "visited {} entries, excluded {}, depth-pruned {}, matched {} ({} over limit), {} errors",
            self.entries_visited,
            self.entries_excluded,
            self.depth_pruned,
            self.matches_found,
            self.results_dropped,
            self.traversal_errors
        )
    }
}
