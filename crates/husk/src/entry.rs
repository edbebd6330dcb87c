//! Synthesized entry module source.

use crate::config::ExportMode;

/// Render the synthetic entry module for an ordered dependency path list.
///
/// One line per path, JSON-quoted, joined in list order; list order is the
/// module evaluation order contract of the graph. An empty list renders to
/// empty source, a module with no observable effect.
pub fn synthesize(paths: &[String], mode: ExportMode) -> String {
    let lines: Vec<String> = paths
        .iter()
        .map(|path| {
            let quoted = serde_json::to_string(path).expect("unable to JSON-quote path");
            match mode {
                ExportMode::ReExport => format!("export * from {quoted};"),
                ExportMode::SideEffect => format!("import {quoted};"),
            }
        })
        .collect();
    lines.join("\n")
}
