//! Result formatting for the terminal
pub mod formats;

use crate::cli::OutputFormat;
use crate::metrics::SearchStats;
use crate::search::matcher::filename_extension;
use crate::search::SearchResult;
use byte_unit::{Byte, UnitType};
use std::collections::BTreeMap;
use std::io::Write;
use std::time::Duration;

pub use formats::*;

/// Trait for output formatters
pub trait ResultFormatter: Send + Sync {
    fn format(&self, results: &[SearchResult]) -> String;
    fn name(&self) -> &str;
}

/// Picks a formatter and writes results, summaries and statistics
pub struct OutputManager {
    formatter: Box<dyn ResultFormatter>,
    verbose: bool,
}

impl OutputManager {
    pub fn new(format: OutputFormat, use_color: bool, verbose: bool) -> Self {
        let formatter: Box<dyn ResultFormatter> = match format {
            OutputFormat::Path => Box::new(PathFormatter::new(use_color)),
            OutputFormat::Detailed => Box::new(DetailedFormatter::new(use_color)),
            OutputFormat::Json => Box::new(JsonFormatter::new()),
        };
        Self { formatter, verbose }
    }

    pub fn formatter_name(&self) -> &str {
        self.formatter.name()
    }

    /// Writes formatted results. An empty path/detailed listing prints
    /// "No results found" in verbose mode and nothing otherwise.
    pub fn print<W: Write>(&self, out: &mut W, results: &[SearchResult]) -> crate::Result<()> {
        if results.is_empty() && self.formatter.name() != "json" {
            if self.verbose {
                writeln!(out, "No results found")?;
            }
            return Ok(());
        }

        out.write_all(self.formatter.format(results).as_bytes())?;
        out.flush()?;
        Ok(())
    }

    /// Verbose-only timing and count summary, written to `err`.
    pub fn print_summary<W: Write>(
        &self,
        err: &mut W,
        results: &[SearchResult],
        elapsed: Duration,
        stats: &SearchStats,
    ) -> crate::Result<()> {
        if !self.verbose {
            return Ok(());
        }
        let totals = ResultStats::from_results(results);
        writeln!(err)?;
        writeln!(err, "Search completed in {elapsed:.2?}")?;
        writeln!(
            err,
            "Found {} files and {} directories",
            totals.file_count, totals.directory_count
        )?;
        writeln!(err, "Engine: {stats}")?;
        Ok(())
    }
}

/// Aggregate figures over a result list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultStats {
    pub total_results: usize,
    pub file_count: usize,
    pub directory_count: usize,
    pub total_size: u64,
    /// Lower-cased extension with its leading dot, counted over files only.
    pub extensions: BTreeMap<String, usize>,
}

impl ResultStats {
    pub fn from_results(results: &[SearchResult]) -> Self {
        let mut stats = ResultStats {
            total_results: results.len(),
            ..Default::default()
        };

        for result in results {
            if result.is_dir {
                stats.directory_count += 1;
                continue;
            }
            stats.file_count += 1;
            stats.total_size += result.size;

            let name = result
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let ext = filename_extension(&name);
            if !ext.is_empty() {
                *stats
                    .extensions
                    .entry(format!(".{}", ext.to_lowercase()))
                    .or_insert(0) += 1;
            }
        }

        stats
    }

    pub fn render(&self) -> String {
        let mut output = String::new();
        output.push_str("\nSummary:\n");
        output.push_str(&format!("Total results: {}\n", self.total_results));
        output.push_str(&format!("Files: {}\n", self.file_count));
        output.push_str(&format!("Directories: {}\n", self.directory_count));
        output.push_str(&format!("Total size: {}\n", format_size(self.total_size)));

        if !self.extensions.is_empty() {
            let mut counts: Vec<_> = self.extensions.iter().collect();
            counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
            output.push_str("\nExtensions:\n");
            for (ext, count) in counts {
                output.push_str(&format!("  {ext}: {count}\n"));
            }
        }
        output
    }
}

/// Human-readable binary size: `512B`, `1.5KiB`, `3.2GiB`.
pub fn format_size(size: u64) -> String {
    if size < 1024 {
        return format!("{size}B");
    }
    let adjusted = Byte::from_u64(size).get_appropriate_unit(UnitType::Binary);
    format!("{:.1}{}", adjusted.get_value(), adjusted.get_unit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::SystemTime;

    fn result(path: &str, size: u64, is_dir: bool) -> SearchResult {
        SearchResult {
            path: PathBuf::from(path),
            size,
            modified: SystemTime::UNIX_EPOCH,
            is_dir,
            mode: String::new(),
        }
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0B");
        assert_eq!(format_size(1023), "1023B");
        assert_eq!(format_size(1536), "1.5KiB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0MiB");
    }

    #[test]
    fn test_result_stats() {
        let results = vec![
            result("/a/main.go", 100, false),
            result("/a/lib.GO", 50, false),
            result("/a/Makefile", 10, false),
            result("/a/src", 4096, true),
        ];
        let stats = ResultStats::from_results(&results);
        assert_eq!(stats.total_results, 4);
        assert_eq!(stats.file_count, 3);
        assert_eq!(stats.directory_count, 1);
        assert_eq!(stats.total_size, 160);
        assert_eq!(stats.extensions.get(".go"), Some(&2));
        assert_eq!(stats.extensions.len(), 1);
        assert!(stats.render().contains(".go: 2"));
    }

    #[test]
    fn test_print_empty_quiet_and_verbose() {
        let mut out = Vec::new();
        OutputManager::new(OutputFormat::Path, false, false)
            .print(&mut out, &[])
            .unwrap();
        assert!(out.is_empty());

        let mut out = Vec::new();
        OutputManager::new(OutputFormat::Path, false, true)
            .print(&mut out, &[])
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No results found\n");
    }

    #[test]
    fn test_print_json_even_when_empty() {
        let mut out = Vec::new();
        let manager = OutputManager::new(OutputFormat::Json, true, false);
        assert_eq!(manager.formatter_name(), "json");
        manager.print(&mut out, &[]).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("\"count\": 0"));
    }

    #[test]
    fn test_summary_only_when_verbose() {
        let results = vec![result("/a/main.go", 1, false), result("/a/src", 1, true)];
        let stats = SearchStats::default();

        let mut err = Vec::new();
        OutputManager::new(OutputFormat::Path, false, false)
            .print_summary(&mut err, &results, Duration::from_millis(5), &stats)
            .unwrap();
        assert!(err.is_empty());

        let mut err = Vec::new();
        OutputManager::new(OutputFormat::Path, false, true)
            .print_summary(&mut err, &results, Duration::from_millis(5), &stats)
            .unwrap();
        let text = String::from_utf8(err).unwrap();
        assert!(text.contains("Search completed in"));
        assert!(text.contains("Found 1 files and 1 directories"));
    }
}
