//! Document and workspace symbol tests.

use crate::helpers::fixtures::*;
use crate::helpers::hosts::*;
use lunar::hir::SymbolKind;
use lunar::ide::AnalysisHost;
use lunar::project::AnalysisConfig;

#[test]
fn test_document_symbols_in_source_order() {
    let (host, main) = host_from_source(UTIL_MODULE);
    let symbols = host.analysis().document_symbols(&main);
    let names: Vec<_> = symbols.iter().map(|s| s.qualified_name.as_str()).collect();
    assert_eq!(names, vec!["M", "M.greet", "M.VERSION"]);

    let greet = &symbols[1];
    assert_eq!(greet.kind, SymbolKind::Function);
    assert_eq!(greet.container.as_deref(), Some("M"));
}

#[test]
fn test_document_symbols_of_unknown_document() {
    let host = bare_host();
    assert!(host.analysis().document_symbols(&uri("nope.lua")).is_empty());
}

#[test]
fn test_workspace_symbols_query() {
    let host = host_from_sources(&[
        ("a.lua", "function ParseConfig() end\nlocal parse_local = 1"),
        ("b.lua", "function parse_args() end\nfunction render() end"),
    ]);
    let analysis = host.analysis();

    let names: Vec<_> = analysis
        .workspace_symbols(Some("PARSE"))
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["ParseConfig", "parse_args"]);

    assert_eq!(analysis.workspace_symbols(None).len(), 3);
    assert!(analysis.workspace_symbols(Some("zzz")).is_empty());
}

#[test]
fn test_workspace_symbols_exclude_builtins() {
    let host = AnalysisHost::new(AnalysisConfig::default());
    host.set_file_content(&uri("main.lua"), "function print_all() end");
    let names: Vec<_> = host
        .analysis()
        .workspace_symbols(Some("print"))
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["print_all"]);
}
