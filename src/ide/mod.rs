//! IDE features: High-level APIs for editor handlers.
//!
//! This module provides the interface between the symbol model (HIR)
//! and an editor server. Each function corresponds to an LSP request.
//!
//! ## Design Principles
//!
//! 1. **Pure functions**: Take data in, return data out
//! 2. **No LSP types**: Uses our own types, converted at the LSP boundary
//! 3. **One pipeline**: Every feature goes through [`QueryRouter`]
//!
//! ## Usage
//!
//! The recommended way to use this module is through `AnalysisHost`:
//!
//! ```ignore
//! use lunar::ide::AnalysisHost;
//!
//! let host = AnalysisHost::default();
//! host.set_file_content(&uri, "local M = {}\nfunction M.f() end");
//!
//! let analysis = host.analysis();
//! let items = analysis.completions(&uri, line, col);
//! ```

mod analysis;
mod completion;
mod goto;
mod hover;
mod query;
mod signature;
mod symbols;
pub mod text_utils;

pub use analysis::{Analysis, AnalysisHost, FileSystemProvider, SourceProvider};
pub use completion::{CompletionItem, CompletionKind, completions};
pub use goto::{BUILTIN_SCHEME, GotoResult, GotoTarget, goto_definition};
pub use hover::{HoverResult, hover};
pub use query::{QueryKind, QueryRouter, SymbolQuery};
pub use signature::{ParameterInfo, SignatureHelp, signature_help};
pub use symbols::{SymbolInfo, document_symbols, workspace_symbols};
pub use text_utils::extract_word_at_cursor;
