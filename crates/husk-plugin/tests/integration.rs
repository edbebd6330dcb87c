//! Integration tests for husk-plugin
//!
//! These tests verify the complete flow from HTML trees on disk through the
//! analysis pass to the rolldown hook surface: entry identification, entry
//! and virtual module loading, and pass-through for everything else.

use std::fs;
use std::path::Path;

use husk::EntryOptions;
use husk_plugin::{HuskEntryPlugin, HTML_ENTRY};
use rolldown_plugin::{HookLoadArgs, Plugin, PluginContext};
use tempfile::TempDir;

fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
}

#[tokio::test]
async fn test_entry_loads_in_document_order() {
    let dir = TempDir::new().unwrap();
    write_file(
        dir.path(),
        "pages/a.html",
        "<html><body><script>console.log(1)</script><script src=\"./b.js\"></script></body></html>",
    );
    write_file(dir.path(), "pages/b.js", "export const b = 1;");

    let plugin = HuskEntryPlugin::new(
        EntryOptions::new()
            .include(["pages/*.html"])
            .root(dir.path()),
    );
    let entry = plugin.identify_entry(None).unwrap();
    assert_eq!(entry, HTML_ENTRY);

    let ctx = PluginContext::new_napi_context();
    let args = HookLoadArgs { id: HTML_ENTRY };
    let output = plugin.load(&ctx, &args).await.unwrap().unwrap();

    let lines: Vec<&str> = output.code.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("export * from"));
    assert!(lines[0].contains("a.html_0.js"));
    assert!(lines[1].contains("b.js"));
    assert!(matches!(
        output.module_type,
        Some(rolldown_common::ModuleType::Js)
    ));
}

#[tokio::test]
async fn test_virtual_module_loads_inline_text() {
    let dir = TempDir::new().unwrap();
    write_file(
        dir.path(),
        "pages/a.html",
        "<html><body><script>console.log(\"inline\")</script></body></html>",
    );

    let plugin = HuskEntryPlugin::new(
        EntryOptions::new()
            .include(["pages/*.html"])
            .root(dir.path()),
    );
    plugin.identify_entry(None).unwrap();

    let paths = plugin.dependency_paths();
    assert_eq!(paths.len(), 1);
    let virtual_id = &paths[0];
    assert!(virtual_id.ends_with("a.html_0.js"));

    let ctx = PluginContext::new_napi_context();
    let args = HookLoadArgs { id: virtual_id };
    let output = plugin.load(&ctx, &args).await.unwrap().unwrap();

    assert_eq!(&*output.code, "console.log(\"inline\")");
    assert!(matches!(
        output.module_type,
        Some(rolldown_common::ModuleType::Js)
    ));
}

#[tokio::test]
async fn test_real_paths_are_declined() {
    let dir = TempDir::new().unwrap();
    write_file(
        dir.path(),
        "pages/a.html",
        "<html><body><script src=\"./b.js\"></script></body></html>",
    );
    write_file(dir.path(), "pages/b.js", "export const b = 1;");

    let plugin = HuskEntryPlugin::new(
        EntryOptions::new()
            .include(["pages/*.html"])
            .root(dir.path()),
    );
    plugin.identify_entry(None).unwrap();

    // The captured local script is a real host-resolvable path; loading it is
    // Rolldown's business, not ours.
    let paths = plugin.dependency_paths();
    let ctx = PluginContext::new_napi_context();
    let args = HookLoadArgs { id: &paths[0] };
    assert!(plugin.load(&ctx, &args).await.unwrap().is_none());
}

#[tokio::test]
async fn test_empty_graph_loads_empty_entry_source() {
    let dir = TempDir::new().unwrap();

    let plugin = HuskEntryPlugin::new(
        EntryOptions::new()
            .include(["pages/*.html"])
            .root(dir.path()),
    );
    plugin.identify_entry(None).unwrap();

    let ctx = PluginContext::new_napi_context();
    let args = HookLoadArgs { id: HTML_ENTRY };
    let output = plugin.load(&ctx, &args).await.unwrap().unwrap();
    assert_eq!(&*output.code, "");
}

#[tokio::test]
async fn test_side_effect_import_mode() {
    let dir = TempDir::new().unwrap();
    write_file(
        dir.path(),
        "pages/a.html",
        "<html><body><script src=\"./b.js\"></script></body></html>",
    );

    let plugin = HuskEntryPlugin::new(
        EntryOptions::new()
            .include(["pages/*.html"])
            .exports(false)
            .root(dir.path()),
    );
    plugin.identify_entry(None).unwrap();

    let ctx = PluginContext::new_napi_context();
    let args = HookLoadArgs { id: HTML_ENTRY };
    let output = plugin.load(&ctx, &args).await.unwrap().unwrap();
    assert!(output.code.starts_with("import \""));
    assert!(output.code.contains("b.js"));
}

#[tokio::test]
async fn test_identify_entry_absorbs_requested_input() {
    let dir = TempDir::new().unwrap();
    write_file(
        dir.path(),
        "pages/a.html",
        "<html><body><script src=\"./a.js\"></script></body></html>",
    );
    write_file(
        dir.path(),
        "pages/other.html",
        "<html><body><script src=\"./other.js\"></script></body></html>",
    );

    let plugin = HuskEntryPlugin::new(EntryOptions::new().root(dir.path()));

    // A requested entry that differs from the marker becomes the include set;
    // the marker is always what the build starts from.
    let entry = plugin.identify_entry(Some("pages/a.html")).unwrap();
    assert_eq!(entry, HTML_ENTRY);

    let paths = plugin.dependency_paths();
    assert_eq!(paths.len(), 1);
    assert!(paths[0].ends_with("a.js"));
}

#[tokio::test]
async fn test_reanalysis_resets_graph_state() {
    let dir = TempDir::new().unwrap();
    write_file(
        dir.path(),
        "pages/a.html",
        "<html><body><script src=\"./a.js\"></script></body></html>",
    );

    let plugin = HuskEntryPlugin::new(
        EntryOptions::new()
            .include(["pages/*.html"])
            .root(dir.path()),
    );
    plugin.identify_entry(None).unwrap();
    assert_eq!(plugin.dependency_paths().len(), 1);

    // A new document appears; the next pass rebuilds the graph wholesale.
    write_file(
        dir.path(),
        "pages/b.html",
        "<html><body><script src=\"./b.js\"></script></body></html>",
    );
    plugin.identify_entry(None).unwrap();
    assert_eq!(plugin.dependency_paths().len(), 2);
}
