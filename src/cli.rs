use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::fmt;
use std::path::PathBuf;

/// Real-time file search. Scans the filesystem on every run instead of
/// reading a prebuilt database.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Filename pattern: glob (`*.go`, `file?.txt`) or, with --advanced, fuzzy
    pub pattern: Option<String>,

    /// Config file (default is $HOME/.rlocate.toml)
    #[clap(long, value_parser)]
    pub config: Option<PathBuf>,

    #[clap(short, long, value_parser, default_value_t = false)]
    pub verbose: bool,

    /// Write log records to this file instead of stderr
    #[clap(long, value_parser)]
    pub log: Option<PathBuf>,

    /// Fuzzy matching: pattern characters must appear in order
    #[clap(long, value_parser, default_value_t = false)]
    pub advanced: bool,

    /// Only report these extensions (comma-separated)
    #[clap(long = "ext", value_parser, value_delimiter = ',')]
    pub extensions: Vec<String>,

    /// Size filter (accepted, not applied)
    #[clap(long, value_parser)]
    pub size: Option<String>,

    /// Modification time filter (accepted, not applied)
    #[clap(long, value_parser)]
    pub mtime: Option<String>,

    /// Content filter (accepted, not applied)
    #[clap(long, value_parser)]
    pub content: Option<String>,

    /// Skip paths containing any of these (comma-separated)
    #[clap(long, value_parser, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Search these directories instead of the defaults (comma-separated)
    #[clap(long, value_parser, value_delimiter = ',')]
    pub include: Vec<PathBuf>,

    /// Worker threads (default: config file, then CPU cores)
    #[clap(long, value_parser)]
    pub threads: Option<usize>,

    /// Maximum search depth, 0 = unlimited (default: config file)
    #[clap(long, value_parser)]
    pub depth: Option<usize>,

    #[clap(long, value_parser, default_value_t = false)]
    pub follow_symlinks: bool,

    #[clap(long, value_enum)]
    pub format: Option<OutputFormat>,

    #[clap(long, value_parser)]
    pub max_results: Option<usize>,

    #[clap(long, value_parser, default_value_t = false)]
    pub no_color: bool,

    /// Print totals, file/directory counts and extensions after the results
    #[clap(long, value_parser, default_value_t = false)]
    pub stats: bool,

    /// Stop searching after this many seconds and print what was found
    #[clap(long, value_parser)]
    pub timeout: Option<u64>,

    /// Write the effective file configuration and exit
    #[clap(long, value_parser, default_value_t = false)]
    pub init_config: bool,

    #[clap(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate shell completions
    Completions {
        #[clap(value_enum)]
        shell: Shell,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One path per line
    #[default]
    Path,
    /// Type, size, modification time and path
    Detailed,
    /// JSON object with results, count and timestamp
    Json,
}

impl OutputFormat {
    /// Lenient parse for config file values; unknown names fall back to `Path`.
    pub fn from_config(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "detailed" | "long" => Self::Detailed,
            "json" => Self::Json,
            _ => Self::Path,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Path => write!(f, "path"),
            OutputFormat::Detailed => write!(f, "detailed"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
