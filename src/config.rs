use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = ".rlocate.toml";
pub const DEFAULT_MAX_DEPTH: usize = 20;
pub const DEFAULT_MAX_RESULTS: usize = crate::search::DEFAULT_MAX_RESULTS;

/// Contents of `~/.rlocate.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub search: SearchSection,
    pub output: OutputSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSection {
    pub exclude_dirs: Vec<String>,
    pub include_dirs: Vec<PathBuf>,
    pub max_depth: usize,
    pub follow_symlinks: bool,
    /// 0 means one thread per logical CPU.
    pub default_threads: usize,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            exclude_dirs: crate::search::DEFAULT_SYSTEM_EXCLUDES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            include_dirs: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            follow_symlinks: false,
            default_threads: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    pub format: String,
    pub color: bool,
    pub max_results: usize,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            format: "path".to_string(),
            color: true,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl FileConfig {
    /// Loads the first config file found, or defaults when there is none.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        match Self::find_config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn find_config_path() -> Option<PathBuf> {
        if let Some(home) = dirs::home_dir() {
            let home_path = home.join(CONFIG_FILE_NAME);
            if home_path.exists() {
                return Some(home_path);
            }
        }

        let current_path = Path::new(CONFIG_FILE_NAME);
        if current_path.exists() {
            return Some(current_path.to_path_buf());
        }

        None
    }

    /// Where `--init-config` writes when no `--config` is given.
    pub fn default_path() -> PathBuf {
        match dirs::home_dir() {
            Some(home) => home.join(CONFIG_FILE_NAME),
            None => PathBuf::from(CONFIG_FILE_NAME),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create config directory: {}", parent.display())
                })?;
            }
        }

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }
}
