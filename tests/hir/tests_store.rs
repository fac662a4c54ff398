//! SymbolStore: indexing, reindexing, eviction and the global index.

use std::sync::Arc;

use crate::helpers::hosts::*;
use lunar::hir::{DiagnosticCollector, ExtractOptions, SymbolKind, SymbolStore};
use rstest::rstest;

// =============================================================================
// DOCUMENT INDEX
// =============================================================================

#[test]
fn test_top_level_declaration_ranges_are_indexed() {
    let source = "local a = 1\nb = 2\nlocal function c() end\nfunction d() end\n";
    let store = store_from_source("a.lua", source);
    let symbols = store.get_document_symbols(&uri("a.lua")).unwrap();

    for (name, line) in [("a", 0), ("b", 1), ("c", 2), ("d", 3)] {
        let record = symbols
            .iter()
            .find(|s| s.name == name)
            .unwrap_or_else(|| panic!("{name} missing"));
        assert_eq!(record.range.start.line, line, "{name}");
        assert_eq!(record.uri, uri("a.lua"));
    }
}

#[test]
fn test_reindexing_identical_text_is_idempotent() {
    let source = "local M = {}\nfunction M.f(x) end\nlocal t = { a = 1 }\nreturn M";
    let store = SymbolStore::default();
    let first = store.index(&uri("a.lua"), source);
    let second = store.index(&uri("a.lua"), source);

    assert_eq!(first, second);
    assert_eq!(store.len(), 1);
    assert_eq!(store.get_document_symbols(&uri("a.lua")).unwrap(), second);
    assert_eq!(
        store.get_module_symbols(&uri("a.lua"), "M").unwrap().len(),
        1
    );
}

#[test]
fn test_reindex_replaces_previous_records() {
    let store = SymbolStore::default();
    store.index(&uri("a.lua"), "function old() end");
    store.index(&uri("a.lua"), "function new() end");

    let names: Vec<_> = store
        .get_document_symbols(&uri("a.lua"))
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["new"]);
    assert!(store.get_global_symbols(Some("old")).is_empty());
}

#[test]
fn test_invalid_text_keeps_previous_symbols() {
    let collector = Arc::new(DiagnosticCollector::new());
    let store = SymbolStore::new(ExtractOptions::default(), collector.clone());
    store.index(&uri("a.lua"), "function keep() end");
    let generation = store.generation();

    let result = store.index(&uri("a.lua"), "function keep( end end");
    assert!(result.is_empty());
    assert_eq!(store.generation(), generation);
    let symbols = store.get_document_symbols(&uri("a.lua")).unwrap();
    assert_eq!(symbols.len(), 1);
    assert_eq!(symbols[0].name, "keep");

    let diagnostics = collector.diagnostics_for(&uri("a.lua")).unwrap();
    assert_eq!(diagnostics.len(), 1);
    assert!(collector.has_errors());

    store.index(&uri("a.lua"), "function keep() end");
    assert!(collector.diagnostics_for(&uri("a.lua")).unwrap().is_empty());
}

#[rstest]
#[case::parens(format!("x = {}1{}", "(".repeat(5000), ")".repeat(5000)))]
#[case::tables(format!("t = {}{}", "{".repeat(5000), "}".repeat(5000)))]
#[case::blocks(format!("{}{}", "do ".repeat(5000), "end ".repeat(5000)))]
#[case::unary(format!("x = {}1", "not ".repeat(5000)))]
fn test_deeply_nested_text_is_one_diagnostic(#[case] text: String) {
    let (host, collector) = host_with_collector();
    host.set_file_content(&uri("main.lua"), "local keep = 1");

    let result = host.set_file_content(&uri("main.lua"), &text);
    assert!(result.is_empty());
    let diagnostics = collector.diagnostics_for(&uri("main.lua")).unwrap();
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].message.contains("too many syntax levels"));
    let symbols = host.store().get_document_symbols(&uri("main.lua")).unwrap();
    assert_eq!(symbols.len(), 1);
    assert_eq!(symbols[0].name, "keep");
}

#[test]
fn test_invalid_first_version_is_not_indexed() {
    let store = SymbolStore::default();
    assert!(store.index(&uri("a.lua"), "local = ").is_empty());
    assert!(!store.contains(&uri("a.lua")));
    assert!(store.try_index(&uri("a.lua"), "local = ").is_err());
}

#[test]
fn test_evict() {
    let store = SymbolStore::default();
    store.index(&uri("a.lua"), "Shared = {}");
    assert_eq!(store.get_global_symbols(Some("Shared")).len(), 1);

    assert!(store.evict(&uri("a.lua")));
    assert!(!store.evict(&uri("a.lua")));
    assert!(store.get_global_symbols(Some("Shared")).is_empty());
    assert!(store.is_empty());
}

// =============================================================================
// GLOBAL INDEX
// =============================================================================

#[test]
fn test_global_index_is_rebuilt_only_after_changes() {
    let store = SymbolStore::default();
    store.index(&uri("a.lua"), "A = 1");
    let first = store.global_index();
    let again = store.global_index();
    assert!(Arc::ptr_eq(&first, &again));

    store.index(&uri("b.lua"), "B = 2");
    let rebuilt = store.global_index();
    assert!(!Arc::ptr_eq(&first, &rebuilt));
    assert_eq!(rebuilt.generation(), store.generation());
    assert_eq!(rebuilt.symbols().len(), 2);
}

#[test]
fn test_global_modules_exclude_file_local_tables() {
    let store = SymbolStore::default();
    store.index(&uri("a.lua"), "local Hidden = {}\nfunction Hidden.f() end");
    store.index(&uri("b.lua"), "Shared = {}\nfunction Shared.g() end");

    assert!(store.get_global_module("Hidden").is_none());
    let shared = store.get_global_module("Shared").unwrap();
    assert_eq!(shared.len(), 1);
    assert_eq!(shared[0].kind, SymbolKind::Function);
    assert_eq!(shared[0].uri, uri("b.lua"));
}

#[test]
fn test_global_symbols_keep_insertion_order() {
    let store = SymbolStore::default();
    store.index(&uri("z.lua"), "function dup() end");
    store.index(&uri("a.lua"), "function dup() end");

    let found = store.get_global_symbols(Some("dup"));
    let uris: Vec<_> = found.iter().map(|s| s.uri.clone()).collect();
    assert_eq!(uris, vec![uri("z.lua"), uri("a.lua")]);
}

// =============================================================================
// REQUIRE PATHS
// =============================================================================

#[test]
fn test_resolve_require_paths() {
    let store = SymbolStore::default();
    store.index(&uri("net/http.lua"), "return {}");
    store.index(&uri("util/init.lua"), "return {}");
    store.index(&uri("myhttp.lua"), "return {}");

    assert_eq!(store.resolve_require("net.http"), Some(uri("net/http.lua")));
    assert_eq!(store.resolve_require("net/http"), Some(uri("net/http.lua")));
    assert_eq!(store.resolve_require("util"), Some(uri("util/init.lua")));
    assert_eq!(store.resolve_require("myhttp"), Some(uri("myhttp.lua")));
    assert_eq!(store.resolve_require("missing"), None);
}

// =============================================================================
// CONCURRENCY
// =============================================================================

#[test]
fn test_concurrent_writers_and_readers() {
    let store = Arc::new(SymbolStore::default());
    std::thread::scope(|scope| {
        for i in 0..8 {
            let store = store.clone();
            scope.spawn(move || {
                let name = format!("file{i}.lua");
                for round in 0..20 {
                    store.index(&uri(&name), &format!("function f{i}_{round}() end"));
                    let _ = store.get_global_symbols(None);
                }
            });
        }
    });
    assert_eq!(store.len(), 8);
    let global = store.get_global_symbols(None);
    assert_eq!(global.len(), 8);
    assert!(global.iter().all(|s| s.name.ends_with("_19")));
}
