//! Rolldown plugin for HTML entry points
//!
//! This plugin lets Rolldown treat a tree of HTML documents as the entry of
//! an ordinary JavaScript build. It analyzes every document matched by the
//! configured entry globs, lifts each reachable script into the module graph
//! (real files by path, inline scripts as virtual modules), and serves a
//! single synthesized entry module that re-exports (or side-effect-imports)
//! all of them in document order.
//!
//! ## Architecture
//!
//! ```text
//! entry globs → analysis pass (husk) → GraphState
//!                                        ├── resolve_id()/load(): synthetic
//!                                        │   entry + virtual modules
//!                                        └── generate_bundle(): mirror
//!                                            rewritten HTML to the output dir
//! ```
//!
//! ## Why `resolve_id` + `load`?
//!
//! The synthetic entry and the inline-script modules exist nowhere on disk,
//! so both hooks are needed: `resolve_id` claims the ids so Rolldown accepts
//! them as valid modules, and `load` serves their source. Real script files
//! captured in the graph are deliberately *not* loaded here; they are plain
//! host-resolvable paths and flow through Rolldown's normal file loading.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use husk::EntryOptions;
//! use husk_plugin::{HuskEntryPlugin, HTML_ENTRY};
//! use std::sync::Arc;
//!
//! # fn example() {
//! let plugin = Arc::new(HuskEntryPlugin::new(
//!     EntryOptions::new().include(["pages/*.html"]).output("dist"),
//! ));
//! // Add the plugin to your Rolldown bundler configuration and use
//! // HTML_ENTRY as the build input.
//! let input = HTML_ENTRY;
//! # let _ = (plugin, input);
//! # }
//! ```

use std::borrow::Cow;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use husk::{analyze, EntryOptions, GraphState};
use rolldown_common::ModuleType;
use rolldown_plugin::{
    HookGenerateBundleArgs, HookLoadArgs, HookLoadOutput, HookLoadReturn, HookNoopReturn,
    HookResolveIdArgs, HookResolveIdOutput, HookResolveIdReturn, HookUsage, Plugin, PluginContext,
};

/// The synthetic entry id served by this plugin.
///
/// The `\0` prefix keeps it out of every real resolver's namespace, so it can
/// never collide with a file on disk.
pub const HTML_ENTRY: &str = "\0husk:html-entry";

/// Rolldown plugin that resolves HTML import graphs.
///
/// Holds the configuration and the graph of the most recent analysis pass.
/// Resolving the synthetic entry (re-)runs the pass, swapping in a wholly new
/// graph; resolve/load queries are pure lookups against it.
#[derive(Debug)]
pub struct HuskEntryPlugin {
    inner: Arc<Mutex<PluginState>>,
}

#[derive(Debug)]
struct PluginState {
    options: EntryOptions,
    graph: GraphState,
}

impl HuskEntryPlugin {
    /// Create a plugin from any accepted configuration shape: a single glob,
    /// a list of globs, or full [`EntryOptions`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use husk_plugin::HuskEntryPlugin;
    ///
    /// let plugin = HuskEntryPlugin::new("pages/*.html");
    /// ```
    pub fn new(options: impl Into<EntryOptions>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(PluginState {
                options: options.into(),
                graph: GraphState::default(),
            })),
        }
    }

    /// Identify the actual build entry.
    ///
    /// A requested entry that differs from [`HTML_ENTRY`] is absorbed as
    /// configuration (the single-include convenience of the original options
    /// surface); the synthetic marker is always substituted as the entry to
    /// build from, and a full analysis pass is (re-)run.
    pub fn identify_entry(&self, requested: Option<&str>) -> husk::Result<String> {
        let mut state = self.inner.lock().unwrap();
        if let Some(requested) = requested {
            if requested != HTML_ENTRY {
                state.options.include = vec![requested.to_string()];
            }
        }
        state.graph = analyze(&state.options)?;
        Ok(HTML_ENTRY.to_string())
    }

    /// Ordered dependency path list of the current graph.
    pub fn dependency_paths(&self) -> Vec<String> {
        self.inner.lock().unwrap().graph.dependency_paths.clone()
    }
}

impl Plugin for HuskEntryPlugin {
    /// Returns the plugin name for debugging and logging
    fn name(&self) -> Cow<'static, str> {
        "husk-html-entry".into()
    }

    /// Declare which hooks this plugin uses
    ///
    /// This allows Rolldown to optimize by skipping unused hooks.
    fn register_hook_usage(&self) -> HookUsage {
        HookUsage::ResolveId | HookUsage::Load | HookUsage::GenerateBundle
    }

    /// Resolve ID hook - claims the synthetic entry and virtual module ids
    ///
    /// Resolving the synthetic entry as a build input (importer-less) is the
    /// start of a build, so the analysis pass runs right here, before any
    /// module of the graph is loaded. Everything that is neither the marker
    /// nor a virtual id is declined and passes through to other resolvers.
    fn resolve_id(
        &self,
        _ctx: &PluginContext,
        args: &HookResolveIdArgs<'_>,
    ) -> impl std::future::Future<Output = HookResolveIdReturn> + Send {
        let inner = Arc::clone(&self.inner);
        let specifier = args.specifier.to_string();
        let is_entry = args.importer.is_none();

        async move {
            if specifier == HTML_ENTRY {
                if is_entry {
                    let mut state = inner.lock().unwrap();
                    state.graph = analyze(&state.options)
                        .context("failed to analyze HTML entry documents")?;
                }
                return Ok(Some(HookResolveIdOutput {
                    id: specifier.into(),
                    ..Default::default()
                }));
            }

            let state = inner.lock().unwrap();
            if state.graph.is_virtual(&specifier) {
                return Ok(Some(HookResolveIdOutput {
                    id: specifier.into(),
                    ..Default::default()
                }));
            }

            Ok(None)
        }
    }

    /// Load hook - serves the synthesized entry and the virtual modules
    ///
    /// An empty graph loads the entry as empty source, immediately and never
    /// as an error. Real file paths recorded in the graph are declined here;
    /// Rolldown's normal file loading handles them.
    fn load(
        &self,
        _ctx: &PluginContext,
        args: &HookLoadArgs<'_>,
    ) -> impl std::future::Future<Output = HookLoadReturn> + Send {
        let inner = Arc::clone(&self.inner);
        let id = args.id.to_string();

        async move {
            let state = inner.lock().unwrap();

            if id == HTML_ENTRY {
                let code = state.graph.entry_source(state.options.export_mode);
                return Ok(Some(HookLoadOutput {
                    code: code.into(),
                    module_type: Some(ModuleType::Js),
                    ..Default::default()
                }));
            }

            if let Some(text) = state.graph.virtual_modules.get(&id) {
                return Ok(Some(HookLoadOutput {
                    code: text.clone().into(),
                    module_type: Some(ModuleType::Js),
                    ..Default::default()
                }));
            }

            Ok(None)
        }
    }

    /// Generate bundle hook - mirrors rewritten documents at end of run
    ///
    /// Runs only when an output directory is configured; a single failed
    /// directory creation or file write fails the whole operation.
    fn generate_bundle(
        &self,
        _ctx: &PluginContext,
        _args: &mut HookGenerateBundleArgs<'_>,
    ) -> impl std::future::Future<Output = HookNoopReturn> + Send {
        let inner = Arc::clone(&self.inner);

        async move {
            let (documents, output, root) = {
                let state = inner.lock().unwrap();
                let Some(output) = state.options.output.clone() else {
                    return Ok(());
                };
                (state.graph.documents.clone(), output, state.graph.root.clone())
            };

            husk::writer::write_documents(&documents, &output, &root)
                .await
                .with_context(|| {
                    format!("failed to mirror HTML documents under {}", output.display())
                })?;

            Ok(())
        }
    }
}
