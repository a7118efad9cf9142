//! Glue between the command line, the config file and the search engine
use crate::cli::{Cli, Commands, OutputFormat};
use crate::config::FileConfig;
use crate::error::{LocateError, Result};
use crate::output::{OutputManager, ResultStats};
use crate::search::{InertFilters, SearchConfig, Searcher};
use clap::CommandFactory;
use colored::*;
use is_terminal::IsTerminal;
use log::{info, warn};
use std::io::{self, Write};
use std::thread;
use std::time::{Duration, Instant};

/// Output settings resolved from flags and the config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSettings {
    pub format: OutputFormat,
    pub color: bool,
}

/// Runs the parsed command line
pub fn run(cli: Cli) -> Result<()> {
    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(*shell, &mut cmd, "rlocate", &mut io::stdout());
        return Ok(());
    }

    let file_config = load_file_config(&cli)?;

    if cli.init_config {
        let path = cli.config.clone().unwrap_or_else(FileConfig::default_path);
        file_config.save(&path)?;
        println!("{} {}", "Config written to".green(), path.display());
        return Ok(());
    }

    let search_config = build_search_config(&cli, &file_config)?;
    let settings = output_settings(&cli, &file_config);

    for name in search_config.inert.ignored() {
        if cli.verbose {
            warn!("--{name} is accepted but not applied yet; all entries pass it");
        }
    }

    let searcher = Searcher::new(search_config)?;
    install_cancel_handlers(&searcher, cli.timeout)?;

    let start_time = Instant::now();
    let results = searcher.search();
    let elapsed = start_time.elapsed();
    info!("Search returned {} result(s) in {elapsed:.2?}", results.len());

    let use_color = settings.color && io::stdout().is_terminal();
    let output = OutputManager::new(settings.format, use_color, cli.verbose);
    info!("Writing results as {}", output.formatter_name());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    output.print(&mut out, &results)?;
    if cli.stats {
        write!(out, "{}", ResultStats::from_results(&results).render())?;
    }
    output.print_summary(&mut io::stderr(), &results, elapsed, &searcher.stats())?;

    Ok(())
}

fn load_file_config(cli: &Cli) -> Result<FileConfig> {
    match FileConfig::load(cli.config.as_deref()) {
        Ok(config) => Ok(config),
        // An explicit --config must be readable; a discovered one may be skipped.
        Err(e) if cli.config.is_some() && !cli.init_config => Err(e.into()),
        Err(e) => {
            if cli.verbose {
                warn!("Could not load config: {e:#}");
            }
            Ok(FileConfig::default())
        }
    }
}

/// Merges command-line flags over the config file.
///
/// Absolute `exclude_dirs` entries from the file are path prefixes and
/// replace the built-in system prefixes; the remaining entries and every
/// `--exclude` token are substrings. Includes from the command line replace
/// the file's, and scalar flags win when given.
pub fn build_search_config(cli: &Cli, file: &FileConfig) -> Result<SearchConfig> {
    let pattern = cli
        .pattern
        .clone()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| LocateError::Other("search pattern is required".to_string()))?;

    let (system_excludes, mut exclude): (Vec<String>, Vec<String>) = file
        .search
        .exclude_dirs
        .iter()
        .filter(|e| !e.is_empty())
        .cloned()
        .partition(|e| e.starts_with('/'));
    exclude.extend(cli.exclude.iter().filter(|e| !e.is_empty()).cloned());

    let include = if cli.include.is_empty() {
        file.search.include_dirs.clone()
    } else {
        cli.include.clone()
    };

    Ok(SearchConfig {
        pattern,
        advanced: cli.advanced,
        extensions: cli.extensions.clone(),
        inert: InertFilters {
            size: cli.size.clone(),
            mtime: cli.mtime.clone(),
            content: cli.content.clone(),
        },
        exclude,
        include,
        threads: cli.threads.unwrap_or(file.search.default_threads),
        depth: cli.depth.unwrap_or(file.search.max_depth),
        follow_links: cli.follow_symlinks || file.search.follow_symlinks,
        max_results: cli.max_results.unwrap_or(file.output.max_results),
        verbose: cli.verbose,
        system_excludes,
    })
}

pub fn output_settings(cli: &Cli, file: &FileConfig) -> OutputSettings {
    OutputSettings {
        format: cli
            .format
            .unwrap_or_else(|| OutputFormat::from_config(&file.output.format)),
        color: file.output.color && !cli.no_color,
    }
}

/// Ctrl-C and `--timeout` both trip the searcher's cancel token.
fn install_cancel_handlers(searcher: &Searcher, timeout: Option<u64>) -> Result<()> {
    let token = searcher.cancel_token();
    ctrlc::set_handler(move || {
        warn!("Interrupted, stopping search");
        token.cancel();
    })?;

    if let Some(secs) = timeout {
        let token = searcher.cancel_token();
        thread::spawn(move || {
            thread::sleep(Duration::from_secs(secs));
            if !token.is_cancelled() {
                warn!("Search timed out after {secs}s; showing partial results");
                token.cancel();
            }
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::filters::should_exclude;
    use clap::Parser;
    use std::fs;
    use std::path::{Path, PathBuf};

    #[test]
    fn test_pattern_is_required() {
        let cli = Cli::parse_from(["rlocate"]);
        let err = build_search_config(&cli, &FileConfig::default()).unwrap_err();
        assert!(err.to_string().contains("search pattern is required"));
    }

    #[test]
    fn test_file_defaults_apply() {
        let cli = Cli::parse_from(["rlocate", "*.rs"]);
        let config = build_search_config(&cli, &FileConfig::default()).unwrap();
        assert_eq!(config.pattern, "*.rs");
        assert_eq!(config.depth, crate::config::DEFAULT_MAX_DEPTH);
        assert_eq!(config.max_results, crate::config::DEFAULT_MAX_RESULTS);
        assert!(config.exclude.is_empty());
        assert_eq!(config.system_excludes, vec!["/proc", "/sys", "/dev", "/tmp"]);
        assert!(config.include.is_empty());
        assert!(!config.follow_links);
    }

    #[test]
    fn test_flags_override_file() {
        let mut file = FileConfig::default();
        file.search.include_dirs = vec![PathBuf::from("/srv")];
        file.search.exclude_dirs = vec!["target".to_string()];
        file.search.follow_symlinks = true;
        file.output.format = "json".to_string();

        let cli = Cli::parse_from([
            "rlocate",
            "main",
            "--include",
            "/home,/opt",
            "--exclude",
            "node_modules",
            "--depth",
            "0",
            "--threads",
            "2",
            "--max-results",
            "5",
            "--size",
            "+1M",
        ]);
        let config = build_search_config(&cli, &file).unwrap();
        assert_eq!(config.include, vec![PathBuf::from("/home"), PathBuf::from("/opt")]);
        assert_eq!(config.exclude, vec!["target", "node_modules"]);
        assert!(config.system_excludes.is_empty());
        assert_eq!(config.depth, 0);
        assert_eq!(config.threads, 2);
        assert_eq!(config.max_results, 5);
        assert!(config.follow_links);
        assert_eq!(config.inert.ignored(), vec!["size"]);

        let settings = output_settings(&cli, &file);
        assert_eq!(settings.format, OutputFormat::Json);
        assert!(settings.color);
    }

    #[test]
    fn test_default_excludes_are_prefixes_only() {
        let cli = Cli::parse_from(["rlocate", "*.go", "--include", "/home/me"]);
        let config = build_search_config(&cli, &FileConfig::default()).unwrap();

        for kept in [
            "/home/me/devel/main.go",
            "/home/me/dev/tool.go",
            "/usr/lib/systemd/unit.go",
            "/etc/sysctl.d/net.conf",
            "/var/tmp/cache.go",
            "project/tmp/cache.go",
        ] {
            assert!(
                !should_exclude(Path::new(kept), &config.exclude, &config.system_excludes),
                "{kept} should be searched"
            );
        }
        for skipped in ["/proc/1/status", "/sys/kernel", "/dev/null", "/tmp/x.go"] {
            assert!(should_exclude(
                Path::new(skipped),
                &config.exclude,
                &config.system_excludes
            ));
        }
    }

    #[test]
    fn test_file_excludes_split_by_kind() {
        let mut file = FileConfig::default();
        file.search.exclude_dirs = vec![
            "/proc".to_string(),
            "/srv/backups".to_string(),
            ".git".to_string(),
        ];
        let cli = Cli::parse_from(["rlocate", "x", "--exclude", "/cache/"]);
        let config = build_search_config(&cli, &file).unwrap();
        assert_eq!(config.system_excludes, vec!["/proc", "/srv/backups"]);
        assert_eq!(config.exclude, vec![".git", "/cache/"]);
    }

    #[test]
    fn test_default_search_keeps_dev_and_tmp_lookalikes() {
        let dir = tempfile::Builder::new()
            .prefix("rlocate-app")
            .tempdir_in(env!("CARGO_MANIFEST_DIR"))
            .unwrap();
        for rel in [
            "devel/main.go",
            "lib/systemd/unit.go",
            "work/tmp/cache.go",
            "plain/ok.go",
        ] {
            let path = dir.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, "package main").unwrap();
        }

        let root = dir.path().to_string_lossy().into_owned();
        let cli = Cli::parse_from(["rlocate", "*.go", "--include", root.as_str()]);
        let config = build_search_config(&cli, &FileConfig::default()).unwrap();
        if should_exclude(dir.path(), &config.exclude, &config.system_excludes) {
            // Checkout lives under a system prefix; nothing below it is searchable.
            return;
        }

        let results = Searcher::new(config).unwrap().search();
        let mut found: Vec<_> = results
            .iter()
            .map(|r| r.path.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        found.sort();
        assert_eq!(
            found,
            vec![
                PathBuf::from("devel/main.go"),
                PathBuf::from("lib/systemd/unit.go"),
                PathBuf::from("plain/ok.go"),
                PathBuf::from("work/tmp/cache.go"),
            ]
        );
    }

    #[test]
    fn test_no_color_and_format_flag() {
        let cli = Cli::parse_from(["rlocate", "x", "--no-color", "--format", "detailed"]);
        let settings = output_settings(&cli, &FileConfig::default());
        assert_eq!(
            settings,
            OutputSettings {
                format: OutputFormat::Detailed,
                color: false,
            }
        );
    }
}
