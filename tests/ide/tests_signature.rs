//! Signature help tests.

use crate::helpers::fixtures::*;
use crate::helpers::hosts::*;
use lunar::ide::{AnalysisHost, SignatureHelp};
use lunar::project::AnalysisConfig;
use rstest::rstest;

fn signature_at(source: &str, line: u32, column: u32) -> Option<SignatureHelp> {
    let (host, main) = host_from_source(source);
    host.analysis().signature_help(&main, line, column)
}

const ADD: &str = "--- Adds.\nlocal function add(a, b)\n  return a + b\nend\nprint(add(1, 2))";

#[rstest]
#[case::first_argument(10, 0)]
#[case::second_argument(14, 1)]
fn test_active_parameter(#[case] column: u32, #[case] active: u32) {
    let help = signature_at(ADD, 4, column).unwrap();
    assert_eq!(help.label, "add(a, b)");
    assert_eq!(help.active_parameter, active);
    assert_eq!(help.documentation.as_deref(), Some("Adds."));
}

#[test]
fn test_parameter_offsets_point_into_label() {
    let help = signature_at(ADD, 4, 10).unwrap();
    let spans: Vec<_> = help
        .parameters
        .iter()
        .map(|p| &help.label[p.offsets.0 as usize..p.offsets.1 as usize])
        .collect();
    assert_eq!(spans, vec!["a", "b"]);
}

#[test]
fn test_outer_call_after_inner_closes() {
    let host = AnalysisHost::new(AnalysisConfig::default());
    let main = uri("main.lua");
    host.set_file_content(&main, ADD);
    // cursor after `add(1, 2)` is back in print's argument list
    let help = host.analysis().signature_help(&main, 4, 15).unwrap();
    assert_eq!(help.label, "print(...)");
    assert_eq!(help.active_parameter, 0);
}

#[test]
fn test_method_called_with_dot_gets_self() {
    let (line, column) = position_of(ACCOUNT_CLASS, "deposit", 1);
    // inside `self.deposit(0)`
    let help = signature_at(ACCOUNT_CLASS, line, column + "deposit(".len() as u32).unwrap();
    assert_eq!(help.label, "deposit(self, amount)");
    assert_eq!(help.parameters.len(), 2);
}

#[test]
fn test_method_called_with_colon() {
    let source = "local Box = {}\nfunction Box:put(item) end\nlocal b = Box\nBox:put(1)";
    let help = signature_at(source, 3, 8).unwrap();
    assert_eq!(help.label, "put(item)");
}

#[test]
fn test_builtin_signature() {
    let host = AnalysisHost::new(AnalysisConfig::default());
    let main = uri("main.lua");
    host.set_file_content(&main, "local s = string.format('%d', 1)");
    let help = host.analysis().signature_help(&main, 0, 30).unwrap();
    assert_eq!(help.label, "format(formatstring, ...)");
    assert_eq!(help.active_parameter, 1);
}

#[test]
fn test_no_signature_outside_call() {
    assert!(signature_at("local x = 1", 0, 5).is_none());
    assert!(signature_at("print(unknown(1))", 0, 14).is_none());
}
