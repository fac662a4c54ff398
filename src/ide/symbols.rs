//! Symbol listing for workspace and document views.

use smol_str::SmolStr;

use super::goto::BUILTIN_SCHEME;
use crate::base::{DocumentUri, Span};
use crate::hir::{LocalKind, SymbolKind, SymbolRecord, SymbolStore};

/// A symbol for the workspace symbol list or document outline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolInfo {
    pub name: SmolStr,
    /// `base.name` for table members.
    pub qualified_name: String,
    pub kind: SymbolKind,
    pub uri: DocumentUri,
    pub range: Span,
    /// Owning table, if any.
    pub container: Option<SmolStr>,
}

impl SymbolInfo {
    pub fn from_record(symbol: &SymbolRecord) -> Self {
        Self {
            name: symbol.name.clone(),
            qualified_name: symbol.qualified_name(),
            kind: symbol.kind,
            uri: symbol.uri.clone(),
            range: symbol.range,
            container: symbol.base.clone(),
        }
    }
}

/// Outline entries are declarations, not parameters or loop variables.
fn is_outline_entry(symbol: &SymbolRecord) -> bool {
    !matches!(symbol.local, Some(LocalKind::Parameter | LocalKind::Loop))
}

/// Symbols of one document in source order.
pub fn document_symbols(store: &SymbolStore, uri: &DocumentUri) -> Vec<SymbolInfo> {
    store
        .get_document_symbols(uri)
        .unwrap_or_default()
        .iter()
        .filter(|s| is_outline_entry(s))
        .map(SymbolInfo::from_record)
        .collect()
}

/// Get all global symbols in the workspace, optionally filtered by a query.
///
/// # Arguments
/// * `store` - The symbol store to search
/// * `query` - Optional search query (case-insensitive substring match)
///
/// # Returns
/// List of matching symbols, sorted by name.
pub fn workspace_symbols(store: &SymbolStore, query: Option<&str>) -> Vec<SymbolInfo> {
    let query_lower = query.map(str::to_lowercase);

    let mut results: Vec<SymbolInfo> = store
        .get_global_symbols(None)
        .iter()
        .filter(|sym| !sym.is_local() && !sym.uri.as_str().starts_with(BUILTIN_SCHEME))
        .filter(|sym| match &query_lower {
            Some(q) => sym.name.to_lowercase().contains(q.as_str()),
            None => true,
        })
        .map(SymbolInfo::from_record)
        .collect();

    results.sort_by(|a, b| a.name.cmp(&b.name));
    results
}
