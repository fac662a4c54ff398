//! Hover tests.

use crate::helpers::fixtures::*;
use crate::helpers::hosts::*;
use lunar::ide::AnalysisHost;
use lunar::project::AnalysisConfig;

fn hover_word(source: &str, word: &str, nth: usize) -> Option<lunar::ide::HoverResult> {
    let (host, main) = host_from_source(source);
    let (line, column) = position_of(source, word, nth);
    host.analysis().hover(&main, line, column)
}

#[test]
fn test_hover_local_value() {
    let hover = hover_word("local limit = 42\nprint(limit)", "limit", 1).unwrap();
    assert_eq!(hover.contents, "```lua\nlocal limit = 42\n```");
    assert_eq!(hover.qualified_name, "limit");
    assert!(!hover.is_definition);
}

#[test]
fn test_hover_on_declaration_is_definition() {
    let hover = hover_word("local limit = 42", "limit", 0).unwrap();
    assert!(hover.is_definition);
}

#[test]
fn test_hover_function_with_comment() {
    let source = "--- Adds two numbers.\nlocal function add(a, b)\n  return a + b\nend\nprint(add(1, 2))";
    let hover = hover_word(source, "add", 1).unwrap();
    assert!(hover.contents.starts_with("```lua\nlocal function add(a, b)\n```"));
    assert!(hover.contents.contains("---"));
    assert!(hover.contents.contains("Adds two numbers."));
}

#[test]
fn test_hover_method_and_table_member() {
    let hover = hover_word(ACCOUNT_CLASS, "deposit", 1).unwrap();
    assert!(hover.contents.contains("function Account:deposit(amount)"));
    assert_eq!(hover.qualified_name, "Account.deposit");

    let source = "local t = { size = 3 }\nprint(t.size)";
    let hover = hover_word(source, "size", 1).unwrap();
    assert!(hover.contents.contains("t.size = 3"));
}

#[test]
fn test_hover_on_table_constructor_key() {
    let hover = hover_word("local t = { a = 1, b = 2 }", "a", 0).unwrap();
    assert!(hover.is_definition);
    assert_eq!(hover.qualified_name, "t.a");
}

#[test]
fn test_hover_shows_alias_origin() {
    let source = "local acc = Account.new(10)\nprint(acc)";
    let hover = hover_word(source, "acc", 1).unwrap();
    assert!(hover.contents.contains("local acc: variable"));
    assert!(hover.contents.contains("Alias of `Account`"));
}

#[test]
fn test_hover_parameter() {
    let source = "function scale(factor)\n  return factor * 2\nend";
    let hover = hover_word(source, "factor", 1).unwrap();
    assert!(hover.contents.contains("(parameter) factor: variable"));
}

#[test]
fn test_hover_required_member() {
    let main_source = "local util = require('util')\nutil.greet('x')";
    let host = host_from_sources(&[("util.lua", UTIL_MODULE), ("main.lua", main_source)]);
    let hover = host.analysis().hover(&uri("main.lua"), 1, 6).unwrap();
    assert!(hover.contents.contains("function M.greet(name)"));
    assert!(hover.contents.contains("Greets someone."));
    assert_eq!(hover.qualified_name, "M.greet");
}

#[test]
fn test_hover_builtin() {
    let host = AnalysisHost::new(AnalysisConfig::default());
    let main = uri("main.lua");
    host.set_file_content(&main, "local n = math.floor(2.5)");
    let hover = host.analysis().hover(&main, 0, 16).unwrap();
    assert!(hover.contents.contains("function math.floor(x)"));
    assert_eq!(hover.qualified_name, "math.floor");
}

#[test]
fn test_hover_nothing() {
    assert!(hover_word("print(unknown_name)", "unknown_name", 0).is_none());
    let (host, main) = host_from_source("local x = 1");
    assert!(host.analysis().hover(&main, 0, 9).is_none());
}
