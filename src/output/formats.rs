//! Individual output format implementations
use crate::output::{format_size, ResultFormatter};
use crate::search::SearchResult;
use colored::*;
use serde_json::json;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Plain path per line (default)
pub struct PathFormatter {
    use_color: bool,
}

impl PathFormatter {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }
}

impl ResultFormatter for PathFormatter {
    fn format(&self, results: &[SearchResult]) -> String {
        let mut output = String::new();
        for result in results {
            let path = result.path.display().to_string();
            if self.use_color && result.is_dir {
                output.push_str(&path.blue().to_string());
            } else {
                output.push_str(&path);
            }
            output.push('\n');
        }
        output
    }

    fn name(&self) -> &str {
        "path"
    }
}

/// Column-aligned `TYPE SIZE TIMESTAMP PATH` listing
pub struct DetailedFormatter {
    use_color: bool,
}

impl DetailedFormatter {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }
}

impl ResultFormatter for DetailedFormatter {
    fn format(&self, results: &[SearchResult]) -> String {
        let mut output = String::new();
        for result in results {
            let kind = if result.is_dir { "DIR" } else { "FILE" };
            let size = format_size(result.size);
            let modified: chrono::DateTime<chrono::Local> = result.modified.into();
            let timestamp = modified.format(TIMESTAMP_FORMAT);
            let path = result.path.display().to_string();

            if self.use_color && result.is_dir {
                output.push_str(&format!(
                    "{} {size:>9} {timestamp} {}\n",
                    format!("{kind:<4}").blue(),
                    path.blue()
                ));
            } else {
                output.push_str(&format!("{kind:<4} {size:>9} {timestamp} {path}\n"));
            }
        }
        output
    }

    fn name(&self) -> &str {
        "detailed"
    }
}

/// Pretty-printed JSON object holding the results, their count and a
/// generation timestamp
#[derive(Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl ResultFormatter for JsonFormatter {
    fn format(&self, results: &[SearchResult]) -> String {
        let value = json!({
            "results": results,
            "count": results.len(),
            "timestamp": chrono::Local::now().to_rfc3339(),
        });

        let mut output =
            serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string());
        output.push('\n');
        output
    }

    fn name(&self) -> &str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::SystemTime;

    fn sample() -> Vec<SearchResult> {
        vec![
            SearchResult {
                path: PathBuf::from("/src/main.go"),
                size: 2048,
                modified: SystemTime::now(),
                is_dir: false,
                mode: "-rw-r--r--".to_string(),
            },
            SearchResult {
                path: PathBuf::from("/src/pkg"),
                size: 4096,
                modified: SystemTime::now(),
                is_dir: true,
                mode: "drwxr-xr-x".to_string(),
            },
        ]
    }

    #[test]
    fn test_path_formatter_plain() {
        let output = PathFormatter::new(false).format(&sample());
        assert_eq!(output, "/src/main.go\n/src/pkg\n");
    }

    #[test]
    fn test_detailed_formatter_columns() {
        let output = DetailedFormatter::new(false).format(&sample());
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("FILE "));
        assert!(lines[0].contains("2.0KiB"));
        assert!(lines[0].ends_with(" /src/main.go"));
        assert!(lines[1].starts_with("DIR  "));
        assert!(lines[1].ends_with(" /src/pkg"));
    }

    #[test]
    fn test_json_formatter_shape() {
        let output = JsonFormatter::new().format(&sample());
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["count"], 2);
        assert_eq!(value["results"][0]["path"], "/src/main.go");
        assert_eq!(value["results"][1]["is_dir"], true);
        assert_eq!(value["results"][1]["mode"], "drwxr-xr-x");
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn test_json_formatter_empty() {
        let output = JsonFormatter::new().format(&[]);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["count"], 0);
        assert_eq!(value["results"].as_array().unwrap().len(), 0);
    }
}
