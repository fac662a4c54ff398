//! High-level IR (HIR): symbol records, indices and scope resolution.
//!
//! ## Key Types
//!
//! - [`SymbolRecord`]: A declaration extracted from the syntax tree
//! - [`SymbolStore`]: Per-document and global symbol indices
//! - [`ScopeResolver`]: Position-driven lookup of local bindings
//! - [`LexicalAliasInferencer`]: Token-level fallback for local aliases
//!
//! ## Layers
//!
//! ```text
//! parse(text)                  ← Parse into a lossless tree
//!     │
//!     ▼
//! extract_symbols(uri, parse)  ← Records, node cache, returned module
//!     │
//!     ▼
//! SymbolStore                  ← DocumentIndex per uri, lazy GlobalIndex
//!     │
//!     ▼
//! ScopeResolver / alias        ← Query-time resolution
//! ```

mod alias;
mod diagnostics;
mod scope;
mod store;
mod symbols;

pub use alias::{AliasMatch, AliasTarget, LexicalAliasInferencer, MAX_LINE_CHARS, MAX_SCAN_LINES};
pub use diagnostics::{Diagnostic, DiagnosticCollector, DiagnosticSink, NullSink, Severity};
pub use scope::ScopeResolver;
pub use store::{DocumentIndex, GlobalIndex, SymbolStore};
pub use symbols::{
    ExtractOptions, Extraction, LocalKind, Location, SymbolKind, SymbolRecord, extract_symbols,
};
