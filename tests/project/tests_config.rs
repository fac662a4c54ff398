//! AnalysisConfig defaults and builders.

use std::path::Path;

use lunar::project::AnalysisConfig;
use rstest::rstest;

#[test]
fn test_defaults() {
    let config = AnalysisConfig::default();
    assert_eq!(config.index_depth, 0);
    assert!(config.include_stdlib);
    assert_eq!(config.extensions, vec!["lua"]);
    assert_eq!(config.exclude_dirs, vec![".git", "node_modules", ".luarocks"]);
    assert_eq!(config.max_alias_hops, 4);
}

#[test]
fn test_builders() {
    let config = AnalysisConfig::new()
        .with_index_depth(2)
        .with_stdlib(false)
        .with_max_alias_hops(1);
    assert_eq!(config.index_depth, 2);
    assert!(!config.include_stdlib);
    assert_eq!(config.max_alias_hops, 1);
    assert_eq!(config.extract_options().index_depth, 2);
}

#[rstest]
#[case("src/main.lua", true)]
#[case("src/MAIN.LUA", false)]
#[case("src/main.luac", false)]
#[case("Makefile", false)]
fn test_lua_extension(#[case] path: &str, #[case] expected: bool) {
    assert_eq!(AnalysisConfig::default().has_lua_extension(Path::new(path)), expected);
}

#[rstest]
#[case(".git", true)]
#[case("node_modules", true)]
#[case("src", false)]
fn test_excluded_dirs(#[case] name: &str, #[case] expected: bool) {
    assert_eq!(AnalysisConfig::default().is_excluded_dir(name), expected);
}
