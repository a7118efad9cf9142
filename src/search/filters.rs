//! Per-entry path filters applied during traversal
use crate::search::matcher::filename_extension;
use std::path::{Path, MAIN_SEPARATOR};

/// Checks if a path should be excluded
///
/// A path is excluded when it contains any of `exclude` as a substring or
/// starts with one of `system_excludes`. Both are plain string tests, so
/// `/tmp` also covers `/tmpfiles`.
pub fn should_exclude(path: &Path, exclude: &[String], system_excludes: &[String]) -> bool {
    let path_str = path.to_string_lossy();

    if exclude
        .iter()
        .any(|token| path_str.contains(token.as_str()))
    {
        return true;
    }

    system_excludes
        .iter()
        .any(|dir| path_str.starts_with(dir.as_str()))
}

/// Depth of `path` below `root`: separators left after stripping the root prefix.
pub fn entry_depth(path: &Path, root: &Path) -> usize {
    let path_str = path.to_string_lossy();
    let root_str = root.to_string_lossy();
    let remainder = path_str.strip_prefix(&*root_str).unwrap_or(&*path_str);
    remainder.matches(MAIN_SEPARATOR).count()
}

/// Checks the filename's extension against a lower-cased allow-list.
///
/// An empty allow-list accepts everything.
pub fn extension_allowed(filename: &str, allowed_lower: &[String]) -> bool {
    if allowed_lower.is_empty() {
        return true;
    }
    let ext = filename_extension(filename).to_lowercase();
    allowed_lower.iter().any(|allowed| *allowed == ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::DEFAULT_SYSTEM_EXCLUDES;

    fn system() -> Vec<String> {
        DEFAULT_SYSTEM_EXCLUDES.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_should_exclude() {
        let exclude = vec!["node_modules".to_string(), ".git".to_string()];
        let cases = [
            ("/home/user/project/file.go", false),
            ("/proc/cpuinfo", true),
            ("/sys/devices", true),
            ("/dev/null", true),
            ("/tmp/test", true),
            ("/home/user/node_modules/package", true),
            ("/home/user/.git/config", true),
            ("/home/user/.gitignore", true),
            ("/usr/local/bin", false),
        ];
        for (path, expected) in cases {
            assert_eq!(
                should_exclude(Path::new(path), &exclude, &system()),
                expected,
                "should_exclude({path})"
            );
        }
    }

    #[test]
    fn test_system_prefix_is_textual() {
        assert!(should_exclude(Path::new("/tmpfiles/a"), &[], &system()));
        assert!(!should_exclude(Path::new("/home/tmp/a"), &[], &system()));
        assert!(!should_exclude(Path::new("/tmp/a"), &[], &[]));
    }

    #[cfg(unix)]
    #[test]
    fn test_entry_depth() {
        let root = Path::new("/data/root");
        assert_eq!(entry_depth(Path::new("/data/root"), root), 0);
        assert_eq!(entry_depth(Path::new("/data/root/a"), root), 1);
        assert_eq!(entry_depth(Path::new("/data/root/a/b/c.txt"), root), 3);
        assert_eq!(entry_depth(Path::new("./x/y"), Path::new(".")), 2);
    }

    #[test]
    fn test_extension_allowed() {
        let allowed = vec!["go".to_string(), "rs".to_string()];
        assert!(extension_allowed("main.go", &allowed));
        assert!(extension_allowed("LIB.RS", &allowed));
        assert!(!extension_allowed("main.py", &allowed));
        assert!(!extension_allowed("Makefile", &allowed));
        assert!(extension_allowed("anything", &[]));
    }
}
