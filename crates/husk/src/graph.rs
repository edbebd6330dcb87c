//! HTML import graph traversal.
//!
//! One analysis pass expands the configured pattern sets, walks every
//! included document (descending through local `<link rel="import">`
//! references at the point of reference), classifies every script element it
//! meets, and accumulates the result into a single owned [`GraphState`].
//! Classification is a pure decision; tag removals are applied as a discrete
//! step after each document's decision pass, so traversal never mutates the
//! child lists it walked.

use std::path::{Path, PathBuf};

use markup5ever_rcdom::{Handle, RcDom};
use path_clean::PathClean;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::config::{EntryOptions, ExportMode};
use crate::{dom, entry, patterns};
use crate::{Error, Result};

/// Everything one analysis pass produces.
///
/// Rebuilt wholesale at the start of every pass and exposed read-only to the
/// module-resolution protocol; resolution never mutates it. Every entry of
/// [`GraphState::dependency_paths`] is either a real host-resolvable path or
/// a key of [`GraphState::virtual_modules`], never neither.
#[derive(Debug, Default, Clone)]
pub struct GraphState {
    /// Ordered dependency identifiers: document order across all included
    /// documents, script order within a document.
    pub dependency_paths: Vec<String>,
    /// Synthesized identifier -> literal inline script text.
    pub virtual_modules: FxHashMap<String, String>,
    /// Canonical document path -> serialized markup, captured after all
    /// removals were applied.
    pub documents: FxHashMap<PathBuf, String>,
    /// Canonical paths matched by the suppression globs.
    pub excluded: FxHashSet<PathBuf>,
    /// Canonical paths matched by the omission globs.
    pub omitted: FxHashSet<PathBuf>,
    /// The resolved analysis root the pass ran against.
    pub root: PathBuf,
}

impl GraphState {
    /// Source text of the synthesized entry module.
    pub fn entry_source(&self, mode: ExportMode) -> String {
        entry::synthesize(&self.dependency_paths, mode)
    }

    /// Whether `id` names a virtual module of this graph.
    pub fn is_virtual(&self, id: &str) -> bool {
        self.virtual_modules.contains_key(id)
    }
}

/// Pure classification of one script element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptDisposition {
    /// `src` resolves within the tree: capture the path, drop the tag when
    /// output rewriting is enabled.
    LocalSrc(PathBuf),
    /// Scheme-qualified or protocol-relative `src`: stays a plain markup
    /// reference, never captured.
    Remote,
    /// No `src`: becomes a virtual module under a synthesized identifier.
    Inline { id: String, text: String },
    /// Script inside a suppressed document: never captured; local-src tags
    /// are still dropped when output rewriting is enabled.
    Suppressed { remove: bool },
}

/// Decide what a script element contributes to the graph.
///
/// `script_index` is the per-document running index of the element among the
/// document's visited scripts; it is what makes synthesized identifiers
/// unique within one document.
pub fn classify_script(
    element: &Handle,
    document_path: &Path,
    script_index: usize,
    suppressed: bool,
) -> ScriptDisposition {
    match dom::get_node_attr(element, "src") {
        Some(src) => {
            if !is_local_reference(&src) {
                return ScriptDisposition::Remote;
            }
            if suppressed {
                return ScriptDisposition::Suppressed { remove: true };
            }
            ScriptDisposition::LocalSrc(resolve_reference(document_path, &src))
        }
        None => {
            if suppressed {
                return ScriptDisposition::Suppressed { remove: false };
            }
            ScriptDisposition::Inline {
                id: virtual_id(document_path, script_index),
                text: dom::get_text_content(element),
            }
        }
    }
}

/// A `src`/`href` value that stays inside the project tree, as opposed to a
/// scheme-qualified ("https:", "data:") or protocol-relative ("//") URL.
pub fn is_local_reference(reference: &str) -> bool {
    if reference.starts_with("//") {
        return false;
    }
    match (reference.find(':'), reference.find('/')) {
        (Some(colon), Some(slash)) => colon > slash,
        (Some(_), None) => false,
        (None, _) => true,
    }
}

/// Resolve a local reference against its containing document. The target is
/// not required to exist; unresolvable scripts surface in the host loader,
/// not here.
fn resolve_reference(document_path: &Path, reference: &str) -> PathBuf {
    let base = document_path.parent().unwrap_or_else(|| Path::new(""));
    let joined = base.join(reference).clean();
    dunce::canonicalize(&joined).unwrap_or(joined)
}

/// `<document-path>_<index>.js`, unique within a document by construction.
fn virtual_id(document_path: &Path, index: usize) -> String {
    format!("{}_{}.js", document_path.display(), index)
}

/// Run one full analysis pass: reset everything, expand the pattern sets,
/// traverse every included document.
///
/// A pathological configuration degrades to an empty graph rather than
/// failing; the only analysis-time error is a synthesized virtual identifier
/// colliding with an existing real file.
pub fn analyze(options: &EntryOptions) -> Result<GraphState> {
    let root = match &options.root {
        Some(root) => dunce::canonicalize(root).unwrap_or_else(|_| root.clone()),
        None => std::env::current_dir()?,
    };

    let excluded = patterns::expand(&root, &options.exclude);
    let omitted = patterns::expand(&root, &options.external);
    let mut included = patterns::expand(&root, &options.include);
    // Two-step filter: a document matched by `exclude` or `external` is
    // never itself a traversal root.
    included.retain(|path| !excluded.contains(path) && !omitted.contains(path));

    let mut builder = ImportGraphBuilder {
        rewrite: options.output.is_some(),
        seen: FxHashSet::default(),
        doms: Vec::new(),
        state: GraphState {
            excluded: excluded.into_iter().collect(),
            omitted: omitted.into_iter().collect(),
            root,
            ..GraphState::default()
        },
    };

    for document in &included {
        builder.enter_document(document)?;
    }

    builder.finish()
}

/// Nodes a document pass cares about, in document order.
enum DocNode {
    Script {
        node: Handle,
        parent: Handle,
    },
    ImportLink {
        node: Handle,
        parent: Handle,
        href: String,
    },
}

struct ImportGraphBuilder {
    rewrite: bool,
    seen: FxHashSet<PathBuf>,
    doms: Vec<(PathBuf, RcDom)>,
    state: GraphState,
}

impl ImportGraphBuilder {
    /// Enter a document for the first time: parse it, register it, walk its
    /// scripts and import links in document order. Re-entry and omitted
    /// targets are no-ops.
    fn enter_document(&mut self, path: &Path) -> Result<()> {
        if self.state.omitted.contains(path) || !self.seen.insert(path.to_path_buf()) {
            return Ok(());
        }

        let Ok(bytes) = std::fs::read(path) else {
            // An unreadable referenced document is a boundary, not a failure.
            return Ok(());
        };
        let doc = dom::html_to_dom(&bytes);
        let suppressed = self.state.excluded.contains(path);
        debug!(document = %path.display(), suppressed, "entering document");

        let mut nodes = Vec::new();
        collect_nodes(&doc.document, &mut nodes);

        let mut removals: Vec<(Handle, Handle)> = Vec::new();
        let mut script_index = 0usize;

        for doc_node in nodes {
            match doc_node {
                DocNode::ImportLink { node, parent, href } => {
                    if !is_local_reference(&href) {
                        continue;
                    }
                    let target = resolve_reference(path, &href);
                    if self.state.excluded.contains(&target) {
                        // Document-level import suppression: drop the
                        // reference and stay out of the target.
                        removals.push((parent, node));
                    } else if !self.state.omitted.contains(&target) {
                        self.enter_document(&target)?;
                    }
                }
                DocNode::Script { node, parent } => {
                    let disposition = classify_script(&node, path, script_index, suppressed);
                    script_index += 1;
                    match disposition {
                        ScriptDisposition::LocalSrc(resolved) => {
                            self.state
                                .dependency_paths
                                .push(resolved.to_string_lossy().into_owned());
                            if self.rewrite {
                                removals.push((parent, node));
                            }
                        }
                        ScriptDisposition::Remote => {}
                        ScriptDisposition::Inline { id, text } => {
                            if Path::new(&id).exists() {
                                return Err(Error::VirtualIdCollision(id));
                            }
                            self.state.dependency_paths.push(id.clone());
                            self.state.virtual_modules.insert(id, text);
                            if self.rewrite {
                                removals.push((parent, node));
                            }
                        }
                        ScriptDisposition::Suppressed { remove } => {
                            if remove && self.rewrite {
                                removals.push((parent, node));
                            }
                        }
                    }
                }
            }
        }

        for (parent, node) in removals {
            dom::remove_child(&parent, &node);
        }

        self.doms.push((path.to_path_buf(), doc));
        Ok(())
    }

    fn finish(mut self) -> Result<GraphState> {
        for (path, doc) in &self.doms {
            self.state
                .documents
                .insert(path.clone(), dom::serialize_document(doc));
        }
        debug!(
            documents = self.state.documents.len(),
            dependencies = self.state.dependency_paths.len(),
            virtuals = self.state.virtual_modules.len(),
            "analysis pass complete"
        );
        Ok(self.state)
    }
}

/// Depth-first, document-order collection of script elements and
/// `<link rel="import">` references.
fn collect_nodes(node: &Handle, out: &mut Vec<DocNode>) {
    for child in node.children.borrow().iter() {
        match dom::get_node_name(child) {
            Some("script") => out.push(DocNode::Script {
                node: child.clone(),
                parent: node.clone(),
            }),
            Some("link") => {
                let is_import = dom::get_node_attr(child, "rel")
                    .is_some_and(|rel| rel.eq_ignore_ascii_case("import"));
                if is_import {
                    if let Some(href) = dom::get_node_attr(child, "href") {
                        out.push(DocNode::ImportLink {
                            node: child.clone(),
                            parent: node.clone(),
                            href,
                        });
                    }
                }
            }
            _ => {}
        }
        collect_nodes(child, out);
    }
}
