//! Parser-level tests: lossless trees and error positions.

use lunar::parser::{AstNode, SourceFile, Stmt, parse};
use rstest::rstest;

// =============================================================================
// LOSSLESS TREES
// =============================================================================

#[test]
fn test_tree_preserves_source_text() {
    let source = "-- header\nlocal M = {}  -- trailing\n\nfunction M.f(a, ...)\n  return a\nend\n\nreturn M\n";
    let parse = parse(source);
    assert!(parse.ok(), "{:?}", parse.errors);
    assert_eq!(parse.syntax().to_string(), source);
}

#[test]
fn test_failed_parse_still_covers_whole_text() {
    let source = "local x = \nfunction (";
    let parse = parse(source);
    assert!(!parse.ok());
    assert_eq!(parse.syntax().to_string(), source);
}

#[test]
fn test_statement_kinds_in_order() {
    let source = r#"
local a = 1
local function f() end
function g() end
a = 2
print(a)
do end
while false do end
repeat until true
if a then end
for i = 1, 2 do end
for k, v in pairs({}) do end
::top::
goto top
"#;
    let parse = parse(source);
    assert!(parse.ok(), "{:?}", parse.errors);
    let file = SourceFile::cast(parse.syntax()).unwrap();
    let kinds: Vec<&str> = file
        .statements()
        .iter()
        .map(|stmt| match stmt {
            Stmt::Local(_) => "local",
            Stmt::LocalFunction(_) => "local function",
            Stmt::Function(_) => "function",
            Stmt::Assign(_) => "assign",
            Stmt::Call(_) => "call",
            Stmt::Do(_) => "do",
            Stmt::While(_) => "while",
            Stmt::Repeat(_) => "repeat",
            Stmt::If(_) => "if",
            Stmt::NumericFor(_) => "numeric for",
            Stmt::GenericFor(_) => "generic for",
            Stmt::Return(_) => "return",
            Stmt::Break(_) => "break",
            Stmt::Goto(_) => "goto",
            Stmt::Label(_) => "label",
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            "local",
            "local function",
            "function",
            "assign",
            "call",
            "do",
            "while",
            "repeat",
            "if",
            "numeric for",
            "generic for",
            "label",
            "goto",
        ]
    );
}

// =============================================================================
// ERRORS
// =============================================================================

#[rstest]
#[case("local = 1")]
#[case("function f(")]
#[case("if x then")]
#[case("x = = 2")]
#[case("local t = { a = }")]
#[case("return return")]
#[case("f(")]
#[case("x")]
fn test_invalid_source_is_rejected(#[case] source: &str) {
    let parse = parse(source);
    assert!(!parse.ok(), "expected an error for {source:?}");
    assert!(parse.check(source).is_err());
}

#[rstest]
#[case("")]
#[case("return")]
#[case("local a <const> = 5")]
#[case("local s = [==[\nraw ]] text\n]==]")]
#[case("x = a.b[c]:d(e) .. f { 1, 2; n = 3 }")]
#[case("local n = 0x1p4 + 3e-2 // 2 ~ 1")]
#[case("goto continue\n::continue::")]
fn test_valid_source_is_accepted(#[case] source: &str) {
    let parse = parse(source);
    assert!(parse.ok(), "{source:?}: {:?}", parse.errors);
}

#[test]
fn test_first_error_is_located() {
    let source = "local ok = 1\nlocal bad = (\n";
    let error = parse(source).check(source).unwrap_err();
    assert!(error.line >= 1, "error should be on or after line 2: {error}");
}
