//! Position-driven scope resolution.

use crate::helpers::fixtures::position_of;
use crate::helpers::hosts::*;
use lunar::hir::{LocalKind, ScopeResolver, SymbolRecord};
use lunar::{Position, Span};
use rstest::rstest;

/// Resolve the `nth` occurrence of `word` in `source`.
fn resolve(source: &str, word: &str, nth: usize) -> Option<SymbolRecord> {
    let store = store_from_source("a.lua", source);
    let document = store.document(&uri("a.lua")).expect("source should parse");
    let (line, column) = position_of(source, word, nth);
    let query = Span::from_coords(line, column, line, column + word.len() as u32);
    ScopeResolver::new(&document).resolve(word, query)
}

/// Line of the binding the `nth` occurrence of `word` resolves to.
fn resolved_line(source: &str, word: &str, nth: usize) -> Option<u32> {
    resolve(source, word, nth).map(|b| b.range.start.line)
}

#[test]
fn test_query_on_declaration_resolves_to_it() {
    let source = "local value = 1\nlocal other = value";
    let found = resolve(source, "value", 0).unwrap();
    assert_eq!(found.range, Span::from_coords(0, 6, 0, 11));
    assert_eq!(found.local, Some(LocalKind::Local));
}

#[test]
fn test_shadowing_resolves_by_position() {
    let source = "local x = 1\nprint(x)\nlocal x = 2\nprint(x)";
    assert_eq!(resolved_line(source, "x", 1), Some(0));
    assert_eq!(resolved_line(source, "x", 3), Some(2));
}

#[test]
fn test_shadowed_local_in_initializer_sees_outer() {
    let source = "local x = 1\nlocal x = x + 1";
    // the right-hand `x` is the first declaration
    assert_eq!(resolved_line(source, "x", 2), Some(0));
}

#[test]
fn test_numeric_for_loop_resolves_to_own_declarations() {
    let source = "for i = 1, 10 do local y = i end";
    let i = resolve(source, "i", 1).unwrap();
    assert_eq!(i.range, Span::from_coords(0, 4, 0, 5));
    assert_eq!(i.local, Some(LocalKind::Loop));

    let y = resolve(source, "y", 0).unwrap();
    assert_eq!(y.range, Span::from_coords(0, 23, 0, 24));
}

#[test]
fn test_loop_variable_shadows_outer_local() {
    let source = "local i = 0\nfor i = 1, 10 do\n  local y = i\nend\nprint(i)";
    assert_eq!(resolved_line(source, "i", 2), Some(1));
    assert_eq!(resolved_line(source, "i", 3), Some(0));
}

#[test]
fn test_loop_header_sees_outer_binding() {
    let generic = "local x = {}\nfor x in pairs(x) do print(x) end";
    assert_eq!(resolved_line(generic, "x", 1), Some(1));
    assert_eq!(resolved_line(generic, "x", 2), Some(0));
    assert_eq!(resolved_line(generic, "x", 3), Some(1));

    let numeric = "local i = 5\nfor i = 1, i do print(i) end";
    assert_eq!(resolved_line(numeric, "i", 2), Some(0));
    assert_eq!(resolved_line(numeric, "i", 3), Some(1));
}

#[test]
fn test_generic_for_variables() {
    let source = "for key, value in pairs(t) do\n  print(key, value)\nend\nprint(key)";
    assert_eq!(resolved_line(source, "key", 1), Some(0));
    assert_eq!(resolved_line(source, "value", 1), Some(0));
    assert_eq!(resolved_line(source, "key", 2), None);
}

#[rstest]
#[case::do_block("do\n  local hidden = 1\nend\nprint(hidden)")]
#[case::while_body("while true do\n  local hidden = 1\nend\nprint(hidden)")]
#[case::if_branch("if c then\n  local hidden = 1\nend\nprint(hidden)")]
#[case::function_body("local function f()\n  local hidden = 1\nend\nprint(hidden)")]
fn test_block_locals_are_not_visible_after_block(#[case] source: &str) {
    assert_eq!(resolved_line(source, "hidden", 1), None);
}

#[test]
fn test_else_branch_does_not_see_then_branch() {
    let source = "if c then\n  local a = 1\nelse\n  print(a)\nend";
    assert_eq!(resolved_line(source, "a", 1), None);
}

#[test]
fn test_parameters_visible_in_body_only() {
    let source = "function area(width, height)\n  return width * height\nend\nprint(width)";
    let width = resolve(source, "width", 1).unwrap();
    assert_eq!(width.local, Some(LocalKind::Parameter));
    assert_eq!(width.range.start, Position::new(0, 14));
    assert_eq!(resolved_line(source, "width", 2), None);
}

#[test]
fn test_function_literal_parameters() {
    let source = "table.sort(list, function(a, b)\n  return a < b\nend)";
    assert_eq!(resolved_line(source, "a", 1), Some(0));
}

#[test]
fn test_recursive_local_function() {
    let source = "local function fact(n)\n  if n <= 1 then return 1 end\n  return n * fact(n - 1)\nend";
    assert_eq!(resolved_line(source, "fact", 1), Some(0));
}

#[test]
fn test_local_preferred_over_earlier_global() {
    let source = "count = 0\nlocal count = 1\nprint(count)";
    let found = resolve(source, "count", 2).unwrap();
    assert_eq!(found.range.start.line, 1);
    assert!(found.is_local());
}

#[test]
fn test_visible_bindings_one_per_name() {
    let source = "local a = 1\nlocal b = 2\nlocal a = 3\nfunction f(c)\n  \nend";
    let store = store_from_source("a.lua", source);
    let document = store.document(&uri("a.lua")).unwrap();
    let visible = ScopeResolver::new(&document).visible_bindings(Position::new(4, 2));

    let names: Vec<_> = visible.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names.iter().filter(|n| **n == "a").count(), 1);
    assert!(names.contains(&"b"));
    assert!(names.contains(&"c"));
    assert!(names.contains(&"f"));
    let a = visible.iter().find(|b| b.name == "a").unwrap();
    assert_eq!(a.range.start.line, 2);
}

#[test]
fn test_enclosing_method_owner() {
    let source = "local Queue = {}\nfunction Queue:push(item)\n  self.items = item\nend\nprint(1)";
    let store = store_from_source("a.lua", source);
    let document = store.document(&uri("a.lua")).unwrap();
    let resolver = ScopeResolver::new(&document);
    assert_eq!(
        resolver.enclosing_method_owner(Position::new(2, 4)).as_deref(),
        Some("Queue")
    );
    assert_eq!(resolver.enclosing_method_owner(Position::new(4, 2)), None);
}
