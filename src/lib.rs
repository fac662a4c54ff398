//! # lunar-base
//!
//! Core library for Lua parsing, symbol indexing, and scope-aware resolution.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! project   → Configuration, workspace loading, builtin library table
//!   ↓
//! ide       → IDE features (goto-def, completion, hover, signature help)
//!   ↓
//! hir       → Symbol records, SymbolStore, ScopeResolver, alias inference
//!   ↓
//! parser    → Logos lexer, recursive-descent parser, rowan CST, typed AST
//!   ↓
//! base      → Primitives (Position, Span, LineIndex, DocumentUri)
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → hir → ide → project)
// ============================================================================

/// Foundation types: positions, spans, line index, document uris
pub mod base;

/// Parser: Logos lexer, recursive-descent parser, typed AST
pub mod parser;

/// High-level IR: symbol extraction, indices and scope resolution
pub mod hir;

/// IDE features: goto-definition, completion, hover, signature help, symbols
pub mod ide;

/// Project management: configuration, workspace loading, stdlib
pub mod project;

// Re-export foundation types
pub use base::{DocumentUri, LineCol, LineIndex, Position, PositionOrdering, Span, TextRange, TextSize};
