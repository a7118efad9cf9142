//! Core search engine implementation
use crate::error::{LocateError, Result};
use crate::metrics::{Metrics, SearchStats};
use crate::search::cancel::CancelToken;
use crate::search::filters::{entry_depth, extension_allowed, should_exclude};
use crate::search::matcher::NameMatcher;
use crate::search::{SearchConfig, SearchResult, RESULTS_BUFFER_SIZE};
use crate::walker::walk_root;
use crossbeam_channel::{bounded, select, unbounded, Receiver, Sender};
use log::{debug, info, log_enabled, warn, Level};
use parking_lot::Mutex;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::SystemTime;
use walkdir::DirEntry;

/// Walks the configured roots in parallel and collects matching entries
pub struct Searcher {
    config: SearchConfig,
    matcher: NameMatcher,
    extensions: Vec<String>,
    cancel: CancelToken,
    metrics: Arc<Metrics>,
}

impl Searcher {
    /// Validates `config` and resolves the thread count.
    pub fn new(mut config: SearchConfig) -> Result<Self> {
        if config.pattern.is_empty() {
            return Err(LocateError::invalid_config("search pattern cannot be empty"));
        }

        if config.threads == 0 {
            config.threads = num_cpus::get().max(1);
        }

        let matcher = NameMatcher::new(&config.pattern, config.advanced);
        if !matcher.is_valid() && config.verbose {
            warn!(
                "Invalid glob pattern '{}'; no entries will match",
                config.pattern
            );
        }

        let extensions = config
            .extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_lowercase())
            .collect();

        Ok(Self {
            config,
            matcher,
            extensions,
            cancel: CancelToken::new(),
            metrics: Arc::new(Metrics::new()?),
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Handle that aborts a running [`Searcher::search`] from another thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Counters from the most recent search.
    pub fn stats(&self) -> SearchStats {
        self.metrics.snapshot()
    }

    /// Returns the directories to search
    pub fn search_roots(&self) -> Vec<PathBuf> {
        if !self.config.include.is_empty() {
            return self.config.include.clone();
        }

        let mut roots = vec![PathBuf::from("/")];

        if cfg!(target_os = "macos") {
            if let Some(home) = dirs::home_dir() {
                roots.push(home);
            }
            roots.push(PathBuf::from("/Applications"));
            roots.push(PathBuf::from("/usr/local"));
        }

        roots
    }

    /// Runs the search and returns at most `max_results` entries.
    ///
    /// Per-path failures never fail the search; they are counted and, in
    /// verbose mode, logged. After cancellation the results collected so far
    /// are returned.
    pub fn search(&self) -> Vec<SearchResult> {
        self.metrics.reset();

        let roots = self.search_roots();
        let worker_count = self.config.threads.min(roots.len()).max(1);
        info!(
            "Searching {} root(s) for '{}' with {} worker(s)",
            roots.len(),
            self.config.pattern,
            worker_count
        );

        let (root_tx, root_rx) = unbounded::<PathBuf>();
        for root in roots {
            // The receiver is alive until the scope below ends.
            let _ = root_tx.send(root);
        }
        drop(root_tx);

        let (result_tx, result_rx) = bounded::<SearchResult>(RESULTS_BUFFER_SIZE);
        let results = Mutex::new(Vec::new());

        thread::scope(|scope| {
            let results = &results;
            scope.spawn(move || self.collect(result_rx, results));

            for worker_id in 0..worker_count {
                let root_rx = root_rx.clone();
                let result_tx = result_tx.clone();
                scope.spawn(move || self.run_worker(worker_id, root_rx, result_tx));
            }

            // Workers own the remaining senders; the collector stops once they exit.
            drop(result_tx);
        });

        let results = results.into_inner();
        info!(
            "Search finished with {} result(s): {}",
            results.len(),
            self.metrics.snapshot()
        );
        if log_enabled!(Level::Debug) {
            match self.metrics.gather() {
                Ok(text) => debug!("Search counters:\n{text}"),
                Err(e) => debug!("Could not encode search counters: {e}"),
            }
        }
        results
    }

    fn collect(&self, rx: Receiver<SearchResult>, results: &Mutex<Vec<SearchResult>>) {
        for result in rx.iter() {
            let mut list = results.lock();
            if list.len() < self.config.max_results {
                list.push(result);
            } else {
                self.metrics.results_dropped.inc();
            }
        }
    }

    fn run_worker(&self, worker_id: usize, roots: Receiver<PathBuf>, tx: Sender<SearchResult>) {
        while let Ok(root) = roots.recv() {
            if self.cancel.is_cancelled() {
                break;
            }
            debug!("Worker {worker_id} walking {}", root.display());
            if !self.walk(&root, &tx) {
                break;
            }
        }
        debug!("Worker {worker_id} finished");
    }

    /// Walks one root. Returns false when the search was cancelled.
    fn walk(&self, root: &Path, tx: &Sender<SearchResult>) -> bool {
        let mut walker = walk_root(root, self.config.follow_links);

        while let Some(entry) = walker.next() {
            if self.cancel.is_cancelled() {
                return false;
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    self.metrics.traversal_errors.inc();
                    if self.config.verbose {
                        let path = e.path().unwrap_or(root);
                        warn!("Cannot access {}: {}", path.display(), e);
                    }
                    continue;
                }
            };
            self.metrics.entries_visited.inc();

            let path = entry.path();
            let is_dir = entry.file_type().is_dir();

            if should_exclude(path, &self.config.exclude, &self.config.system_excludes) {
                self.metrics.entries_excluded.inc();
                if is_dir {
                    walker.skip_current_dir();
                }
                continue;
            }

            if self.config.depth > 0 && entry_depth(path, root) > self.config.depth {
                self.metrics.depth_pruned.inc();
                if is_dir {
                    walker.skip_current_dir();
                }
                continue;
            }

            if !self.matches(&entry) {
                continue;
            }

            let result = match to_result(&entry) {
                Ok(result) => result,
                Err(e) => {
                    self.metrics.traversal_errors.inc();
                    if self.config.verbose {
                        warn!("Cannot read metadata for {}: {}", path.display(), e);
                    }
                    continue;
                }
            };
            self.metrics.matches_found.inc();

            select! {
                send(tx, result) -> sent => {
                    if sent.is_err() {
                        return false;
                    }
                }
                recv(self.cancel.done()) -> _ => {
                    if self.config.verbose {
                        warn!("Search canceled while walking {}", root.display());
                    }
                    return false;
                }
            }
        }

        true
    }

    /// Name, extension and (inert) size/mtime checks for one entry.
    fn matches(&self, entry: &DirEntry) -> bool {
        let filename = entry.file_name().to_string_lossy();

        if !self.matcher.matches(&filename) {
            return false;
        }

        if !extension_allowed(&filename, &self.extensions) {
            return false;
        }

        self.config.inert.passes(entry)
    }
}

impl TryFrom<Option<SearchConfig>> for Searcher {
    type Error = LocateError;

    fn try_from(config: Option<SearchConfig>) -> Result<Self> {
        match config {
            Some(config) => Searcher::new(config),
            None => Err(LocateError::invalid_config("config cannot be nil")),
        }
    }
}

fn to_result(entry: &DirEntry) -> std::result::Result<SearchResult, walkdir::Error> {
    let metadata = entry.metadata()?;
    Ok(SearchResult {
        path: entry.path().to_path_buf(),
        size: metadata.len(),
        modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
        is_dir: metadata.is_dir(),
        mode: mode_string(&metadata),
    })
}

/// `ls`-style mode string such as `drwxr-xr-x`.
#[cfg(unix)]
pub fn mode_string(metadata: &Metadata) -> String {
    use std::os::unix::fs::{FileTypeExt, PermissionsExt};

    let file_type = metadata.file_type();
    let kind = if file_type.is_dir() {
        'd'
    } else if file_type.is_symlink() {
        'l'
    } else if file_type.is_block_device() {
        'b'
    } else if file_type.is_char_device() {
        'c'
    } else if file_type.is_fifo() {
        'p'
    } else if file_type.is_socket() {
        's'
    } else {
        '-'
    };

    let mode = metadata.permissions().mode();
    let mut out = String::with_capacity(10);
    out.push(kind);
    for shift in [6u32, 3, 0] {
        let bits = (mode >> shift) & 0o7;
        out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
        out.push(if bits & 0o1 != 0 { 'x' } else { '-' });
    }
    out
}

#[cfg(not(unix))]
pub fn mode_string(metadata: &Metadata) -> String {
    let kind = if metadata.is_dir() { 'd' } else { '-' };
    let perms = if metadata.permissions().readonly() {
        "r--r--r--"
    } else {
        "rw-rw-rw-"
    };
    format!("{kind}{perms}")
}
