//! The builtin library table.

use lunar::base::DocumentUri;
use lunar::hir::{SymbolKind, SymbolStore};
use lunar::project::{STDLIB_URI, load_stdlib, stdlib_symbols};
use rstest::rstest;

#[rstest]
#[case("string", "format")]
#[case("table", "insert")]
#[case("math", "floor")]
#[case("os", "time")]
#[case("io", "open")]
fn test_library_member_present(#[case] library: &str, #[case] member: &str) {
    let store = SymbolStore::default();
    load_stdlib(&store);
    let members = store.get_global_module(library).unwrap();
    let found = members.iter().find(|s| s.name == member).unwrap();
    assert_eq!(found.kind, SymbolKind::Function);
    assert_eq!(found.uri, DocumentUri::from(STDLIB_URI));
    assert!(found.comment.is_some());
}

#[test]
fn test_globals_and_library_tables() {
    let symbols = stdlib_symbols();
    let print = symbols.iter().find(|s| s.name == "print").unwrap();
    assert_eq!(print.base, None);
    assert_eq!(print.parameters, vec!["..."]);

    let math = symbols.iter().find(|s| s.name == "math").unwrap();
    assert_eq!(math.kind, SymbolKind::Module);
    assert!(symbols.iter().all(|s| !s.is_local()));
}
