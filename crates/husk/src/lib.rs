//! # husk
//!
//! HTML import graph resolution: discover, within a tree of HTML documents,
//! every script dependency reachable from a configured set of entry globs,
//! and expose that graph to a bundler as ordinary JavaScript module graph
//! nodes.
//!
//! An analysis pass walks each included document, follows local
//! `<link rel="import">` references, and classifies every `<script>` it
//! encounters: local `src` scripts are captured by real path, inline scripts
//! become virtual modules under synthesized identifiers, remote scripts stay
//! plain markup. The result is a single [`GraphState`] value (an ordered
//! dependency path list, a virtual-module table and a table of optionally
//! rewritten documents) from which a one-module entry point is synthesized.
//!
//! ## Quick Start
//!
//! ```no_run
//! use husk::{analyze, EntryOptions, ExportMode};
//!
//! # fn main() -> husk::Result<()> {
//! let options = EntryOptions::new()
//!     .include(["pages/*.html"])
//!     .output("dist");
//!
//! let graph = analyze(&options)?;
//! let entry = graph.entry_source(ExportMode::ReExport);
//! for path in &graph.dependency_paths {
//!     println!("dependency: {path}");
//! }
//! # let _ = entry;
//! # Ok(()) }
//! ```
//!
//! The Rolldown integration lives in the `husk-plugin` crate; this crate is
//! host-agnostic and fully synchronous except for [`writer`], the one
//! genuinely concurrent phase.

pub mod config;
pub mod dom;
pub mod entry;
pub mod graph;
pub mod patterns;
pub mod writer;

pub use config::{EntryOptions, ExportMode, DEFAULT_INCLUDE};
pub use graph::{analyze, classify_script, GraphState, ScriptDisposition};

/// Error types for husk operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File write operation failed.
    #[error("Write failure: {0}")]
    WriteFailure(String),

    /// Invalid output path (e.g., a document outside the analysis root).
    #[error("Invalid output path: {0}")]
    InvalidOutputPath(String),

    /// A synthesized virtual module identifier names an existing real file.
    #[error("Virtual module id collides with an existing file: {0}")]
    VirtualIdCollision(String),
}

/// Result type alias for husk operations.
pub type Result<T> = std::result::Result<T, Error>;
