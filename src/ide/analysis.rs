//! AnalysisHost and Analysis: Unified state management for IDE features.
//!
//! The `AnalysisHost` owns the symbol store, the configuration, the overlay
//! of open documents and a source provider for everything else. `Analysis`
//! is a cheap read view offering every feature by `(uri, line, column)`.
//!
//! ## Usage
//!
//! ```
//! use lunar::base::DocumentUri;
//! use lunar::ide::AnalysisHost;
//! use lunar::project::AnalysisConfig;
//!
//! let host = AnalysisHost::new(AnalysisConfig::default().with_stdlib(false));
//! let uri = DocumentUri::from("file:///main.lua");
//! host.set_file_content(&uri, "local greeting = 'hi'\nprint(greeting)");
//!
//! let analysis = host.analysis();
//! let hover = analysis.hover(&uri, 1, 8).unwrap();
//! assert!(hover.contents.contains("local greeting = 'hi'"));
//! ```

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use super::completion::{CompletionItem, completions};
use super::goto::{GotoResult, goto_definition};
use super::hover::{HoverResult, hover};
use super::query::{QueryKind, QueryRouter, SymbolQuery};
use super::signature::{SignatureHelp, signature_help};
use super::symbols::{SymbolInfo, document_symbols, workspace_symbols};
use crate::base::{DocumentUri, Position};
use crate::hir::{DiagnosticSink, DocumentIndex, NullSink, SymbolRecord, SymbolStore};
use crate::project::{AnalysisConfig, load_stdlib};

// ============================================================================
// SOURCE PROVIDERS
// ============================================================================

/// Supplies the text of documents that are not open in the editor.
pub trait SourceProvider: Send + Sync {
    fn read(&self, uri: &DocumentUri) -> Option<Arc<str>>;
}

/// Reads `file://` documents from disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileSystemProvider;

impl SourceProvider for FileSystemProvider {
    fn read(&self, uri: &DocumentUri) -> Option<Arc<str>> {
        let path = uri.to_path()?;
        match std::fs::read_to_string(&path) {
            Ok(text) => Some(Arc::from(text)),
            Err(error) => {
                warn!(uri = %uri, %error, "failed to read document");
                None
            }
        }
    }
}

// ============================================================================
// ANALYSIS HOST
// ============================================================================

/// Owns all state for the IDE layer.
///
/// Every method takes `&self`; the store synchronises internally, so a host
/// can be shared across threads behind an `Arc`.
pub struct AnalysisHost {
    store: Arc<SymbolStore>,
    config: AnalysisConfig,
    /// Text of documents open in the editor.
    overlay: RwLock<FxHashMap<DocumentUri, Arc<str>>>,
    provider: Arc<dyn SourceProvider>,
}

impl Default for AnalysisHost {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl AnalysisHost {
    /// Host with a no-op diagnostic sink and the file system as provider.
    pub fn new(config: AnalysisConfig) -> Self {
        Self::with_sink(config, Arc::new(NullSink))
    }

    pub fn with_sink(config: AnalysisConfig, sink: Arc<dyn DiagnosticSink>) -> Self {
        let store = Arc::new(SymbolStore::new(config.extract_options(), sink));
        if config.include_stdlib {
            load_stdlib(&store);
        }
        Self {
            store,
            config,
            overlay: RwLock::new(FxHashMap::default()),
            provider: Arc::new(FileSystemProvider),
        }
    }

    /// Replace the provider used for documents not in the overlay.
    pub fn with_source_provider(mut self, provider: Arc<dyn SourceProvider>) -> Self {
        self.provider = provider;
        self
    }

    pub fn store(&self) -> &Arc<SymbolStore> {
        &self.store
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Set the editor text of a document and reindex it.
    ///
    /// Returns the new records, or an empty list when the text does not
    /// parse (the previous index stays queryable).
    pub fn set_file_content(&self, uri: &DocumentUri, text: &str) -> Vec<SymbolRecord> {
        self.overlay.write().insert(uri.clone(), Arc::from(text));
        self.store.index(uri, text)
    }

    /// The editor closed the document; it stays indexed from disk contents.
    pub fn close_file(&self, uri: &DocumentUri) {
        self.overlay.write().remove(uri);
    }

    /// The document was deleted.
    pub fn remove_file(&self, uri: &DocumentUri) -> bool {
        self.overlay.write().remove(uri);
        self.store.evict(uri)
    }

    /// Whether the editor holds the text of `uri`.
    pub fn is_open(&self, uri: &DocumentUri) -> bool {
        self.overlay.read().contains_key(uri)
    }

    pub fn has_file(&self, uri: &DocumentUri) -> bool {
        self.store.contains(uri)
    }

    pub fn file_count(&self) -> usize {
        self.store.len()
    }

    /// Current text of a document: overlay first, then the provider.
    pub fn source(&self, uri: &DocumentUri) -> Option<Arc<str>> {
        if let Some(text) = self.overlay.read().get(uri) {
            return Some(text.clone());
        }
        self.provider.read(uri)
    }

    /// Get a read view for queries.
    pub fn analysis(&self) -> Analysis<'_> {
        Analysis { host: self }
    }
}

// ============================================================================
// ANALYSIS
// ============================================================================

/// Read view over an [`AnalysisHost`].
pub struct Analysis<'a> {
    host: &'a AnalysisHost,
}

impl<'a> Analysis<'a> {
    fn router(&self) -> QueryRouter<'a> {
        QueryRouter::new(&self.host.store, self.host.config.max_alias_hops)
    }

    /// The indexed document, indexing it on demand when it is missing.
    fn document(&self, uri: &DocumentUri) -> Option<Arc<DocumentIndex>> {
        if let Some(document) = self.host.store.document(uri) {
            return Some(document);
        }
        let text = self.host.source(uri)?;
        debug!(uri = %uri, "indexing document on demand");
        self.host.store.index(uri, &text);
        self.host.store.document(uri)
    }

    /// Raw text of `line` as the user sees it.
    fn line_text(&self, uri: &DocumentUri, document: &DocumentIndex, line: u32) -> Option<String> {
        let overlay = self.host.overlay.read();
        let text = match overlay.get(uri) {
            Some(text) => crate::base::line_text(text, line),
            None => document.line(line),
        };
        text.map(str::to_string)
    }

    /// Build the query for the word at a cursor.
    pub fn query(&self, uri: &DocumentUri, line: u32, column: u32, kind: QueryKind) -> Option<SymbolQuery> {
        let document = self.document(uri)?;
        let text = self.line_text(uri, &document, line)?;
        SymbolQuery::from_line(uri.clone(), &text, Position::new(line, column), kind)
    }

    pub fn goto_definition(&self, uri: &DocumentUri, line: u32, column: u32) -> GotoResult {
        match self.query(uri, line, column, QueryKind::Definition) {
            Some(query) => goto_definition(&self.router(), &query),
            None => GotoResult::empty(),
        }
    }

    pub fn completions(&self, uri: &DocumentUri, line: u32, column: u32) -> Vec<CompletionItem> {
        match self.query(uri, line, column, QueryKind::Completion) {
            Some(query) => completions(&self.router(), &query),
            None => Vec::new(),
        }
    }

    pub fn hover(&self, uri: &DocumentUri, line: u32, column: u32) -> Option<HoverResult> {
        let query = self.query(uri, line, column, QueryKind::Hover)?;
        hover(&self.router(), &query)
    }

    pub fn signature_help(&self, uri: &DocumentUri, line: u32, column: u32) -> Option<SignatureHelp> {
        let document = self.document(uri)?;
        let text = self.line_text(uri, &document, line)?;
        signature_help(&self.router(), uri, &text, Position::new(line, column))
    }

    pub fn document_symbols(&self, uri: &DocumentUri) -> Vec<SymbolInfo> {
        if self.document(uri).is_none() {
            return Vec::new();
        }
        document_symbols(&self.host.store, uri)
    }

    pub fn workspace_symbols(&self, query: Option<&str>) -> Vec<SymbolInfo> {
        workspace_symbols(&self.host.store, query)
    }
}
