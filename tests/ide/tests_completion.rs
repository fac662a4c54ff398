//! Code completion tests.

use crate::helpers::fixtures::*;
use crate::helpers::hosts::*;
use lunar::ide::{AnalysisHost, CompletionKind};
use lunar::project::AnalysisConfig;

fn labels(items: &[lunar::ide::CompletionItem]) -> Vec<&str> {
    items.iter().map(|item| item.label.as_ref()).collect()
}

// =============================================================================
// QUALIFIED COMPLETION
// =============================================================================

#[test]
fn test_member_completion_while_typing() {
    let (host, main) = host_from_source("local M = {}\nfunction M.f(x) end\n");
    // `M.` alone does not parse; the previous index answers
    assert!(host.set_file_content(&main, "local M = {}\nfunction M.f(x) end\nM.").is_empty());

    let items = host.analysis().completions(&main, 2, 2);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].label.as_ref(), "f");
    assert_eq!(items[0].kind, CompletionKind::Function);
    assert_eq!(items[0].detail.as_deref(), Some("function M.f(x)"));
}

#[test]
fn test_member_completion_filters_by_prefix() {
    let source = "local M = {}\nfunction M.alpha() end\nfunction M.beta() end\nM.VALUE = 1\nM.al()";
    let (host, main) = host_from_source(source);
    let items = host.analysis().completions(&main, 4, 4);
    assert_eq!(labels(&items), vec!["alpha"]);
}

#[test]
fn test_member_completion_of_required_module() {
    let host = host_from_sources(&[("util.lua", UTIL_MODULE)]);
    let main = uri("main.lua");
    host.set_file_content(&main, "local util = require('util')\n");
    host.set_file_content(&main, "local util = require('util')\nutil.");

    let items = host.analysis().completions(&main, 1, 5);
    let mut names = labels(&items);
    names.sort_unstable();
    assert_eq!(names, vec!["VERSION", "greet"]);
    let greet = items.iter().find(|i| i.label.as_ref() == "greet").unwrap();
    assert!(greet.documentation.as_deref().unwrap().contains("Greets someone."));
}

#[test]
fn test_stdlib_library_completion() {
    let host = AnalysisHost::new(AnalysisConfig::default());
    let main = uri("main.lua");
    host.set_file_content(&main, "local s = string.fo");
    let items = host.analysis().completions(&main, 0, 19);
    assert_eq!(labels(&items), vec!["format"]);
}

// =============================================================================
// UNQUALIFIED COMPLETION
// =============================================================================

#[test]
fn test_scope_completion_by_prefix() {
    let source = "local alpha = 1\nlocal alpine = 2\nlocal beta = 3\nprint(al)";
    let (host, main) = host_from_source(source);
    let items = host.analysis().completions(&main, 3, 8);

    let mut names = labels(&items);
    names.sort_unstable();
    assert_eq!(names, vec!["alpha", "alpine"]);
    assert!(items.iter().all(|i| i.kind == CompletionKind::Variable));
    assert_eq!(items[0].sort_priority, 0);
}

#[test]
fn test_completion_hides_block_locals() {
    let source = "do\n  local inner_value = 1\nend\nlocal outer_value = 2\nprint()";
    let (host, main) = host_from_source(source);
    let items = host.analysis().completions(&main, 4, 6);
    let names = labels(&items);
    assert!(names.contains(&"outer_value"));
    assert!(!names.contains(&"inner_value"));
}

#[test]
fn test_completion_includes_other_files_globals() {
    let host = host_from_sources(&[
        ("lib.lua", "function helper_one() end\nlocal helper_private = 1"),
        ("main.lua", "local x = helper_"),
    ]);
    let items = host.analysis().completions(&uri("main.lua"), 0, 17);
    assert_eq!(labels(&items), vec!["helper_one"]);
}

#[test]
fn test_completion_one_item_per_name() {
    let source = "local count = 1\ncount = 2\nlocal count = 3\nprint(co)";
    let (host, main) = host_from_source(source);
    let items = host.analysis().completions(&main, 3, 8);
    assert_eq!(labels(&items), vec!["count"]);
}
