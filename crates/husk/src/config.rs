//! Analysis configuration.
//!
//! [`EntryOptions`] is consumed once per analysis pass and never mutated
//! while a pass runs. The `From` conversions mirror the three accepted
//! configuration shapes: a single glob, a list of globs (both pure
//! `include`), or the fully structured form built with the `EntryOptions`
//! methods.

use std::path::PathBuf;

/// Default include pattern when none is configured.
pub const DEFAULT_INCLUDE: &str = "**/*.html";

/// How the synthesized entry module references each dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportMode {
    /// `export * from "<path>";` - dependencies re-exported from the entry.
    #[default]
    ReExport,
    /// `import "<path>";` - dependencies imported for side effects only.
    SideEffect,
}

/// Configuration for one analysis pass.
///
/// # Example
///
/// ```rust
/// use husk::EntryOptions;
///
/// let options = EntryOptions::new()
///     .include(["pages/*.html"])
///     .exclude(["pages/drafts/*.html"])
///     .external(["vendor/**/*.html"])
///     .exports(false)
///     .output("dist");
/// ```
#[derive(Debug, Clone)]
pub struct EntryOptions {
    /// Glob patterns selecting the documents to traverse from.
    pub include: Vec<String>,
    /// Suppression globs: a matching document can still be visited, but its
    /// local scripts never enter the dependency graph.
    pub exclude: Vec<String>,
    /// Omission globs: a matching document is never entered at all.
    pub external: Vec<String>,
    /// Shape of the synthesized entry module.
    pub export_mode: ExportMode,
    /// Mirror rewritten documents under this directory. Setting it also
    /// enables script tag removal during traversal.
    pub output: Option<PathBuf>,
    /// Analysis root; defaults to the process working directory.
    pub root: Option<PathBuf>,
}

impl Default for EntryOptions {
    fn default() -> Self {
        Self {
            include: vec![DEFAULT_INCLUDE.to_string()],
            exclude: Vec::new(),
            external: Vec::new(),
            export_mode: ExportMode::default(),
            output: None,
            root: None,
        }
    }
}

impl EntryOptions {
    /// Create options with the default `**/*.html` include set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the include patterns.
    pub fn include<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the suppression patterns.
    pub fn exclude<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the omission patterns.
    pub fn external<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.external = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// `exports(false)` switches the entry module to side-effect imports.
    pub fn exports(mut self, exports: bool) -> Self {
        self.export_mode = if exports {
            ExportMode::ReExport
        } else {
            ExportMode::SideEffect
        };
        self
    }

    /// Mirror rewritten documents under `dir` and strip consumed script tags.
    pub fn output(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output = Some(dir.into());
        self
    }

    /// Anchor glob expansion and output mirroring at `dir`.
    pub fn root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.root = Some(dir.into());
        self
    }
}

impl From<&str> for EntryOptions {
    fn from(pattern: &str) -> Self {
        Self {
            include: vec![pattern.to_string()],
            ..Self::default()
        }
    }
}

impl From<String> for EntryOptions {
    fn from(pattern: String) -> Self {
        Self {
            include: vec![pattern],
            ..Self::default()
        }
    }
}

impl From<Vec<String>> for EntryOptions {
    fn from(patterns: Vec<String>) -> Self {
        Self {
            include: patterns,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_include() {
        let options = EntryOptions::new();
        assert_eq!(options.include, vec![DEFAULT_INCLUDE.to_string()]);
        assert!(options.exclude.is_empty());
        assert!(options.external.is_empty());
        assert_eq!(options.export_mode, ExportMode::ReExport);
        assert!(options.output.is_none());
    }

    #[test]
    fn test_single_pattern_shape() {
        let options = EntryOptions::from("pages/*.html");
        assert_eq!(options.include, vec!["pages/*.html".to_string()]);
    }

    #[test]
    fn test_pattern_list_shape() {
        let options = EntryOptions::from(vec!["a/*.html".to_string(), "b/*.html".to_string()]);
        assert_eq!(options.include.len(), 2);
    }

    #[test]
    fn test_exports_false_switches_mode() {
        let options = EntryOptions::new().exports(false);
        assert_eq!(options.export_mode, ExportMode::SideEffect);

        let options = EntryOptions::new().exports(true);
        assert_eq!(options.export_mode, ExportMode::ReExport);
    }

    #[test]
    fn test_output_enables_rewriting() {
        let options = EntryOptions::new().output("dist");
        assert_eq!(options.output, Some(std::path::PathBuf::from("dist")));
    }
}
