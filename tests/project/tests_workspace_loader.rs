//! Loading workspaces from temporary directories.

use std::fs;
use std::path::Path;

use crate::helpers::fixtures::*;
use crate::helpers::hosts::*;
use lunar::base::DocumentUri;
use lunar::ide::AnalysisHost;
use lunar::project::{AnalysisConfig, LoadError, WorkspaceLoader};
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn workspace() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "util.lua", UTIL_MODULE);
    write(dir.path(), "main.lua", "local util = require('util')\nutil.greet('x')\n");
    write(dir.path(), "lib/net/http.lua", "Http = {}\nfunction Http.get(url) end\n");
    write(dir.path(), "broken.lua", "function (");
    write(dir.path(), "node_modules/dep/index.lua", "function vendored() end");
    write(dir.path(), "README.md", "# not lua");
    dir
}

#[test]
fn test_load_directory_report() {
    let dir = workspace();
    let host = bare_host();
    let report = WorkspaceLoader::new().load_directory(dir.path(), &host).unwrap();

    assert_eq!(report.indexed, 3);
    assert_eq!(report.skipped_open, 0);
    assert_eq!(report.parse_failures, vec![dir.path().join("broken.lua")]);
    assert!(report.read_failures.is_empty());
    assert!(!report.is_clean());
    assert_eq!(host.file_count(), 3);
    assert!(host.analysis().workspace_symbols(Some("vendored")).is_empty());
}

#[test]
fn test_loaded_workspace_resolves_across_files() {
    let dir = workspace();
    let host = bare_host();
    WorkspaceLoader::new().load_directory(dir.path(), &host).unwrap();

    let main = DocumentUri::from_path(&dir.path().join("main.lua"));
    let result = host.analysis().goto_definition(&main, 1, 6);
    assert_eq!(result.targets.len(), 1);
    assert_eq!(
        result.targets[0].uri,
        DocumentUri::from_path(&dir.path().join("util.lua"))
    );
    assert_eq!(result.targets[0].range.start.line, 3);

    let symbols = host.analysis().workspace_symbols(Some("get"));
    assert_eq!(symbols.len(), 1);
    assert_eq!(symbols[0].qualified_name, "Http.get");
}

#[test]
fn test_open_documents_are_not_overwritten() {
    let dir = workspace();
    let host = bare_host();
    let main = DocumentUri::from_path(&dir.path().join("main.lua"));
    host.set_file_content(&main, "local edited = true");

    let report = WorkspaceLoader::new().load_directory(dir.path(), &host).unwrap();
    assert_eq!(report.skipped_open, 1);
    assert_eq!(report.indexed, 2);

    let symbols = host.store().get_document_symbols(&main).unwrap();
    assert_eq!(symbols.len(), 1);
    assert_eq!(symbols[0].name, "edited");
}

#[test]
fn test_load_file_keeps_open_document() {
    let dir = workspace();
    let host = bare_host();
    let main = DocumentUri::from_path(&dir.path().join("main.lua"));
    host.set_file_content(&main, "local edited = true");

    assert!(WorkspaceLoader::new().load_file(dir.path().join("main.lua"), &host).unwrap());
    let symbols = host.store().get_document_symbols(&main).unwrap();
    assert_eq!(symbols.len(), 1);
    assert_eq!(symbols[0].name, "edited");
}

#[test]
fn test_custom_extensions_and_exclusions() {
    let dir = workspace();
    write(dir.path(), "scripts/tool.luau", "function tool() end");
    let host = AnalysisHost::new(
        AnalysisConfig::default()
            .with_stdlib(false)
            .with_extensions(["lua", "luau"])
            .with_exclude_dirs(["lib"]),
    );

    let report = WorkspaceLoader::new().load_directory(dir.path(), &host).unwrap();
    // node_modules is no longer excluded, lib is
    assert_eq!(report.indexed, 4);
    assert_eq!(host.analysis().workspace_symbols(Some("tool")).len(), 1);
    assert!(host.analysis().workspace_symbols(Some("Http")).is_empty());
}

#[test]
fn test_load_single_file() {
    let dir = workspace();
    let host = bare_host();
    let loader = WorkspaceLoader::new();

    assert!(loader.load_file(dir.path().join("util.lua"), &host).unwrap());
    assert!(!loader.load_file(dir.path().join("broken.lua"), &host).unwrap());
    let missing = loader.load_file(dir.path().join("missing.lua"), &host);
    assert!(matches!(missing, Err(LoadError::Io { .. })));
    assert_eq!(host.file_count(), 1);
}

#[test]
fn test_missing_root() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("absent");
    let err = WorkspaceLoader::new().load_directory(&root, &bare_host()).unwrap_err();
    assert!(matches!(err, LoadError::DirectoryNotFound(path) if path == root));
}
