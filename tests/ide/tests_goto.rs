//! Go to definition tests for the IDE layer.

use crate::helpers::fixtures::*;
use crate::helpers::hosts::*;
use lunar::Span;
use lunar::ide::AnalysisHost;
use lunar::project::AnalysisConfig;

/// Targets for the `nth` occurrence of `word` in `main.lua`.
fn goto_word(source: &str, word: &str, nth: usize) -> Vec<(String, u32, u32)> {
    let (host, main) = host_from_source(source);
    let (line, column) = position_of(source, word, nth);
    host.analysis()
        .goto_definition(&main, line, column)
        .targets
        .into_iter()
        .map(|t| (t.uri.to_string(), t.range.start.line, t.range.start.column))
        .collect()
}

// =============================================================================
// GOTO DEFINITION - LOCAL
// =============================================================================

#[test]
fn test_goto_on_declaration_returns_exactly_it() {
    let source = "local value = 1\nprint(value)";
    let (host, main) = host_from_source(source);
    let result = host.analysis().goto_definition(&main, 0, 8);

    assert_eq!(result.targets.len(), 1);
    assert_eq!(result.targets[0].range, Span::from_coords(0, 6, 0, 11));
    assert_eq!(result.targets[0].name, "value");
}

#[test]
fn test_goto_on_table_constructor_key_returns_it() {
    let source = "local t = { a = 1, b = 2 }";
    let (host, main) = host_from_source(source);
    let result = host.analysis().goto_definition(&main, 0, 12);
    assert_eq!(result.targets.len(), 1);
    assert_eq!(result.targets[0].range, Span::from_coords(0, 12, 0, 13));

    let main_uri = uri("main.lua").to_string();
    let source = "local function f() end
M = { run = f }";
    assert_eq!(goto_word(source, "run", 0), vec![(main_uri, 1, 6)]);
}

#[test]
fn test_goto_shadowed_local() {
    let source = "local x = 1\nprint(x)\nlocal x = 2\nprint(x)";
    let main = uri("main.lua").to_string();
    assert_eq!(goto_word(source, "x", 1), vec![(main.clone(), 0, 6)]);
    assert_eq!(goto_word(source, "x", 3), vec![(main, 2, 6)]);
}

#[test]
fn test_goto_self_localization_skips_own_declaration() {
    let source = "M = {}\nlocal M = M";
    let targets = goto_word(source, "M", 2);
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].1, 0);

    let alone = "local M = M";
    assert!(goto_word(alone, "M", 1).is_empty());
}

#[test]
fn test_goto_for_loop_variables() {
    let source = "for i = 1, 10 do local y = i end";
    let main = uri("main.lua").to_string();
    assert_eq!(goto_word(source, "i", 1), vec![(main.clone(), 0, 4)]);
    assert_eq!(goto_word(source, "y", 0), vec![(main, 0, 23)]);
}

#[test]
fn test_goto_document_module_member() {
    let source = "local M = {}\nfunction M.f(x) end\nM.f(1)";
    let targets = goto_word(source, "f", 1);
    assert_eq!(targets.len(), 1);
    assert_eq!((targets[0].1, targets[0].2), (1, 11));
}

#[test]
fn test_goto_through_self() {
    let (host, main) = host_from_source(ACCOUNT_CLASS);
    let (line, column) = position_of(ACCOUNT_CLASS, "deposit", 1);
    let result = host.analysis().goto_definition(&main, line, column);
    assert_eq!(result.targets.len(), 1);
    assert_eq!(result.targets[0].range.start.line, 7);
}

#[test]
fn test_goto_unknown_name_is_empty() {
    assert!(goto_word("print(nothing_here)", "nothing_here", 0).is_empty());
}

// =============================================================================
// GOTO DEFINITION - CROSS FILE
// =============================================================================

#[test]
fn test_goto_required_module_member() {
    let main_source = "local util = require('util')\nutil.greet('x')";
    let host = host_from_sources(&[("util.lua", UTIL_MODULE), ("main.lua", main_source)]);
    let (line, column) = position_of(main_source, "greet", 0);

    let result = host.analysis().goto_definition(&uri("main.lua"), line, column);
    assert_eq!(result.targets.len(), 1);
    assert_eq!(result.targets[0].uri, uri("util.lua"));
    assert_eq!(result.targets[0].range, Span::from_coords(3, 11, 3, 16));
}

#[test]
fn test_goto_global_in_other_file() {
    let host = host_from_sources(&[
        ("lib.lua", "function shared_helper() end"),
        ("main.lua", "shared_helper()"),
    ]);
    let result = host.analysis().goto_definition(&uri("main.lua"), 0, 3);
    assert_eq!(result.targets.len(), 1);
    assert_eq!(result.targets[0].uri, uri("lib.lua"));
}

#[test]
fn test_goto_ambiguous_global_returns_all() {
    let host = host_from_sources(&[
        ("a.lua", "function helper() end"),
        ("b.lua", "function helper() end"),
        ("main.lua", "helper()"),
    ]);
    let result = host.analysis().goto_definition(&uri("main.lua"), 0, 2);
    assert_eq!(result.targets.len(), 2);
    let uris: Vec<_> = result.targets.iter().map(|t| t.uri.clone()).collect();
    assert!(uris.contains(&uri("a.lua")));
    assert!(uris.contains(&uri("b.lua")));
}

#[test]
fn test_goto_global_table_member_in_other_file() {
    let host = host_from_sources(&[
        ("lib.lua", "Lib = {}\nfunction Lib.run() end"),
        ("main.lua", "Lib.run()"),
    ]);
    let result = host.analysis().goto_definition(&uri("main.lua"), 0, 5);
    assert_eq!(result.targets.len(), 1);
    assert_eq!(result.targets[0].range.start.line, 1);
}

#[test]
fn test_goto_builtin_is_dropped() {
    let host = AnalysisHost::new(AnalysisConfig::default());
    let main = uri("main.lua");
    host.set_file_content(&main, "print(string.format('%d', 1))");
    let analysis = host.analysis();
    assert!(analysis.goto_definition(&main, 0, 2).is_empty());
    assert!(analysis.goto_definition(&main, 0, 15).is_empty());
    // the router itself still finds the builtin record
    assert!(analysis.hover(&main, 0, 15).is_some());
}
