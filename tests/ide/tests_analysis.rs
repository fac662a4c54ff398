//! AnalysisHost: overlay, providers and diagnostics.

use std::sync::Arc;

use crate::helpers::hosts::*;
use lunar::base::DocumentUri;
use lunar::ide::{AnalysisHost, SourceProvider};
use lunar::project::AnalysisConfig;
use rustc_hash::FxHashMap;

struct MemoryProvider(FxHashMap<DocumentUri, Arc<str>>);

impl SourceProvider for MemoryProvider {
    fn read(&self, uri: &DocumentUri) -> Option<Arc<str>> {
        self.0.get(uri).cloned()
    }
}

#[test]
fn test_invalid_edit_keeps_previous_symbols_queryable() {
    let (host, collector) = host_with_collector();
    let main = uri("main.lua");
    host.set_file_content(&main, "local total = 1\nprint(total)");

    let records = host.set_file_content(&main, "local total = 1\nprint(total");
    assert!(records.is_empty());
    assert!(collector.has_errors());

    let analysis = host.analysis();
    let result = analysis.goto_definition(&main, 1, 8);
    assert_eq!(result.targets.len(), 1);
    assert_eq!(result.targets[0].range.start.line, 0);
    assert_eq!(analysis.document_symbols(&main).len(), 1);
}

#[test]
fn test_diagnostics_cleared_after_fix() {
    let (host, collector) = host_with_collector();
    let main = uri("main.lua");
    host.set_file_content(&main, "if then");
    let diagnostics = collector.diagnostics_for(&main).unwrap();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].source, "lunar");

    host.set_file_content(&main, "if ok then end");
    assert!(collector.diagnostics_for(&main).unwrap().is_empty());
    assert!(!collector.has_errors());
}

#[test]
fn test_documents_are_indexed_on_demand() {
    let lib = uri("lib.lua");
    let mut files = FxHashMap::default();
    files.insert(lib.clone(), Arc::from("local M = {}\nfunction M.go() end\nM.go()"));
    let host = bare_host().with_source_provider(Arc::new(MemoryProvider(files)));

    assert!(!host.has_file(&lib));
    let result = host.analysis().goto_definition(&lib, 2, 3);
    assert_eq!(result.targets.len(), 1);
    assert!(host.has_file(&lib));
    assert!(!host.is_open(&lib));
}

#[test]
fn test_close_and_remove() {
    let host = bare_host();
    let main = uri("main.lua");
    host.set_file_content(&main, "x = 1");
    assert!(host.is_open(&main));

    host.close_file(&main);
    assert!(!host.is_open(&main));
    assert!(host.has_file(&main));

    assert!(host.remove_file(&main));
    assert!(!host.has_file(&main));
    assert_eq!(host.file_count(), 0);
}

#[test]
fn test_stdlib_toggle() {
    assert_eq!(AnalysisHost::new(AnalysisConfig::default()).file_count(), 1);
    assert_eq!(bare_host().file_count(), 0);
}

#[test]
fn test_host_is_shareable_across_threads() {
    let host = Arc::new(bare_host());
    std::thread::scope(|scope| {
        for i in 0..4 {
            let host = host.clone();
            scope.spawn(move || {
                let file = uri(&format!("f{i}.lua"));
                host.set_file_content(&file, &format!("function fn{i}() end\nfn{i}()"));
                let result = host.analysis().goto_definition(&file, 1, 1);
                assert_eq!(result.targets.len(), 1);
            });
        }
    });
    assert_eq!(host.analysis().workspace_symbols(Some("fn")).len(), 4);
}
