//! Glob expansion over the working tree.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Expand glob patterns against `root` into canonical real paths.
///
/// Patterns are matched against root-relative paths. Matches are
/// canonicalized and de-duplicated; iteration order is sorted, which is what
/// keeps traversal order deterministic across repeated passes over unchanged
/// input. An unreadable or absent root expands to the empty set, never an
/// error.
pub fn expand(root: &Path, patterns: &[String]) -> BTreeSet<PathBuf> {
    let mut matched = BTreeSet::new();
    if patterns.is_empty() {
        return matched;
    }

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let relative = relative.to_string_lossy().replace('\\', "/");
        if patterns
            .iter()
            .any(|pattern| fast_glob::glob_match(pattern.as_bytes(), relative.as_bytes()))
        {
            if let Ok(real) = dunce::canonicalize(entry.path()) {
                matched.insert(real);
            }
        }
    }

    matched
}
