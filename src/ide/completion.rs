//! Completion candidates for the word under the cursor.

use std::sync::Arc;

use super::hover::declaration_line;
use super::query::{QueryRouter, SymbolQuery};
use crate::hir::{SymbolKind, SymbolRecord};

/// What a candidate names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompletionKind {
    Function,
    Module,
    Variable,
}

impl CompletionKind {
    /// `CompletionItemKind` number used by LSP clients.
    pub fn to_lsp(&self) -> u32 {
        match self {
            CompletionKind::Function => 3, // Function
            CompletionKind::Module => 9,   // Module
            CompletionKind::Variable => 6, // Variable
        }
    }
}

impl From<SymbolKind> for CompletionKind {
    fn from(kind: SymbolKind) -> Self {
        match kind {
            SymbolKind::Function => CompletionKind::Function,
            SymbolKind::Namespace | SymbolKind::Module => CompletionKind::Module,
            _ => CompletionKind::Variable,
        }
    }
}

/// One candidate, unique by label.
#[derive(Clone, Debug)]
pub struct CompletionItem {
    /// The text to insert.
    pub label: Arc<str>,
    pub kind: CompletionKind,
    /// Short signature or value text.
    pub detail: Option<Arc<str>>,
    /// Doc comment of the declaration.
    pub documentation: Option<Arc<str>>,
    /// Lower sorts first.
    pub sort_priority: u32,
}

impl CompletionItem {
    pub fn new(label: impl Into<Arc<str>>, kind: CompletionKind) -> Self {
        Self {
            label: label.into(),
            kind,
            detail: None,
            documentation: None,
            sort_priority: 100,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<Arc<str>>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_documentation(mut self, doc: impl Into<Arc<str>>) -> Self {
        self.documentation = Some(doc.into());
        self
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.sort_priority = priority;
        self
    }

    /// Create from a SymbolRecord.
    ///
    /// Functions show their signature as detail, everything else its kind.
    pub fn from_symbol(symbol: &SymbolRecord) -> Self {
        let mut item = Self::new(symbol.name.as_str(), symbol.kind.into());
        item = match symbol.kind {
            SymbolKind::Function => item.with_detail(declaration_line(symbol)),
            kind => item.with_detail(kind.display()),
        };
        match &symbol.comment {
            Some(doc) => item.with_documentation(doc.clone()),
            None => item,
        }
    }
}

/// Completion items for the query, ordered innermost scope first.
pub fn completions(router: &QueryRouter<'_>, query: &SymbolQuery) -> Vec<CompletionItem> {
    router
        .resolve_completion_candidates(query)
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(rank, symbol)| CompletionItem::from_symbol(symbol).with_priority(rank as u32))
        .collect()
}
