//! Directory traversal for a single search root
use std::path::Path;
use walkdir::WalkDir;

/// Depth-first walk of one search root.
///
/// With `follow_links` set, symlinked directories are descended into and
/// walkdir reports link loops as errors instead of recursing forever.
pub fn walk_root(root: &Path, follow_links: bool) -> walkdir::IntoIter {
    WalkDir::new(root).follow_links(follow_links).into_iter()
}
