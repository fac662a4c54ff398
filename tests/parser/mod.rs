//! Parser tests
//!
//! Tests for:
//! - Lossless syntax trees
//! - Syntax error reporting

pub mod tests_parse;
