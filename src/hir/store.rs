//! SymbolStore: per-document indices plus a lazily rebuilt global index.
//!
//! ```text
//! index(uri, text)
//!     │  parse → extract (pure)
//!     ▼
//! DocumentIndex  ── Arc swap under the write lock, generation += 1
//!     │
//!     ▼
//! GlobalIndex    ── rebuilt on the next read when the generation moved
//! ```
//!
//! Documents are never partially mutated: a reparse builds a fresh
//! [`DocumentIndex`] and swaps it in. A failed parse leaves the previous
//! index in place and reports a diagnostic instead.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};
use rowan::GreenNode;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::{debug, warn};

use super::diagnostics::{Diagnostic, DiagnosticSink, NullSink};
use super::symbols::{ExtractOptions, SymbolRecord, extract_symbols};
use crate::base::{DocumentUri, LineIndex, Span, line_text, require_path_suffixes};
use crate::parser::{self, AstNode, ParseError, SourceFile, SyntaxNode};

// ============================================================================
// DOCUMENT INDEX
// ============================================================================

/// Everything known about one successfully parsed document.
#[derive(Debug)]
pub struct DocumentIndex {
    pub uri: DocumentUri,
    /// Records in source order.
    pub symbols: Vec<SymbolRecord>,
    /// Table name → member records.
    pub module_index: FxHashMap<SmolStr, Vec<SymbolRecord>>,
    /// Top-level function key (`f`, `M.f`, `M:f`) → statement ranges.
    pub node_cache: FxHashMap<SmolStr, Vec<Span>>,
    /// `None` for documents ingested as prebuilt records.
    pub tree: Option<GreenNode>,
    pub text: Arc<str>,
    pub line_index: LineIndex,
    pub returned_module: Option<SmolStr>,
    pub generation: u64,
}

fn build_module_index(symbols: &[SymbolRecord]) -> FxHashMap<SmolStr, Vec<SymbolRecord>> {
    let mut modules: FxHashMap<SmolStr, Vec<SymbolRecord>> = FxHashMap::default();
    for symbol in symbols {
        if let Some(base) = &symbol.base {
            modules.entry(base.clone()).or_default().push(symbol.clone());
        }
    }
    modules
}

impl DocumentIndex {
    pub fn syntax(&self) -> Option<SyntaxNode> {
        self.tree.clone().map(SyntaxNode::new_root)
    }

    pub fn source_file(&self) -> Option<SourceFile> {
        self.syntax().and_then(SourceFile::cast)
    }

    /// Raw text of a line without its terminator.
    pub fn line(&self, line: u32) -> Option<&str> {
        line_text(&self.text, line)
    }

    pub fn module(&self, name: &str) -> Option<&[SymbolRecord]> {
        self.module_index.get(name).map(Vec::as_slice)
    }

    /// True when `name` is declared `local` at chunk level (or anywhere that
    /// was indexed) in this document.
    pub fn declares_local(&self, name: &str) -> bool {
        self.symbols
            .iter()
            .any(|s| s.name == name && s.base.is_none() && s.is_local())
    }

    /// Members of the table this document returns, if any.
    pub fn returned_members(&self) -> Option<&[SymbolRecord]> {
        self.module(self.returned_module.as_deref()?)
    }
}

// ============================================================================
// GLOBAL INDEX
// ============================================================================

/// Flattened view over every document, derived state only.
#[derive(Debug, Default)]
pub struct GlobalIndex {
    symbols: Vec<SymbolRecord>,
    by_name: FxHashMap<SmolStr, Vec<usize>>,
    modules: FxHashMap<SmolStr, Vec<usize>>,
    generation: u64,
}

impl GlobalIndex {
    fn build<'a>(documents: impl Iterator<Item = &'a Arc<DocumentIndex>>, generation: u64) -> Self {
        let mut index = GlobalIndex {
            generation,
            ..Default::default()
        };
        for document in documents {
            for symbol in &document.symbols {
                let id = index.symbols.len();
                index.by_name.entry(symbol.name.clone()).or_default().push(id);
                // members of a table that is local to its file are not
                // reachable by name from elsewhere
                if let Some(base) = &symbol.base {
                    if !document.declares_local(base) {
                        index.modules.entry(base.clone()).or_default().push(id);
                    }
                }
                index.symbols.push(symbol.clone());
            }
        }
        index
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn symbols(&self) -> &[SymbolRecord] {
        &self.symbols
    }

    pub fn by_name(&self, name: &str) -> impl Iterator<Item = &SymbolRecord> {
        self.by_name
            .get(name)
            .into_iter()
            .flatten()
            .map(|&id| &self.symbols[id])
    }

    pub fn module(&self, name: &str) -> Option<Vec<SymbolRecord>> {
        let ids = self.modules.get(name)?;
        Some(ids.iter().map(|&id| self.symbols[id].clone()).collect())
    }

    pub fn has_module(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }
}

// ============================================================================
// SYMBOL STORE
// ============================================================================

/// Owner of all document indices. `Send + Sync`; share it behind an `Arc`.
pub struct SymbolStore {
    documents: RwLock<IndexMap<DocumentUri, Arc<DocumentIndex>>>,
    generation: AtomicU64,
    global: Mutex<Option<Arc<GlobalIndex>>>,
    options: ExtractOptions,
    sink: Arc<dyn DiagnosticSink>,
}

impl std::fmt::Debug for SymbolStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolStore")
            .field("documents", &self.documents.read().len())
            .field("generation", &self.generation.load(Ordering::Relaxed))
            .field("options", &self.options)
            .finish()
    }
}

impl Default for SymbolStore {
    fn default() -> Self {
        Self::new(ExtractOptions::default(), Arc::new(NullSink))
    }
}

impl SymbolStore {
    pub fn new(options: ExtractOptions, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            documents: RwLock::new(IndexMap::new()),
            generation: AtomicU64::new(0),
            global: Mutex::new(None),
            options,
            sink,
        }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    // ------------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------------

    /// Parse and index `text`, returning the new records.
    ///
    /// On a parse failure the previous index is kept, a single error
    /// diagnostic is published and the result is empty.
    pub fn index(&self, uri: &DocumentUri, text: &str) -> Vec<SymbolRecord> {
        match self.try_index(uri, text) {
            Ok(document) => document.symbols.clone(),
            Err(_) => Vec::new(),
        }
    }

    /// Like [`index`](Self::index) but surfaces the parse error.
    pub fn try_index(&self, uri: &DocumentUri, text: &str) -> Result<Arc<DocumentIndex>, ParseError> {
        let parse = parser::parse(text);
        let line_index = LineIndex::new(text);
        if let Some(error) = parse.errors.first() {
            let error = ParseError::from_syntax_error(error, &line_index);
            warn!(uri = %uri, %error, "parse failed; keeping previous index");
            self.sink
                .publish(uri, vec![Diagnostic::from_parse_error(&error)]);
            return Err(error);
        }

        let extraction = extract_symbols(uri, &parse, &line_index, &self.options);
        let module_index = build_module_index(&extraction.symbols);
        let document = {
            let mut documents = self.documents.write();
            let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
            let document = Arc::new(DocumentIndex {
                uri: uri.clone(),
                symbols: extraction.symbols,
                module_index,
                node_cache: extraction.node_cache,
                tree: Some(parse.green),
                text: Arc::from(text),
                line_index,
                returned_module: extraction.returned_module,
                generation,
            });
            documents.insert(uri.clone(), document.clone());
            document
        };
        debug!(
            uri = %uri,
            symbols = document.symbols.len(),
            generation = document.generation,
            "indexed document"
        );
        self.sink.publish(uri, Vec::new());
        Ok(document)
    }

    /// Ingest prebuilt records (e.g. the builtin library table).
    pub fn index_records(&self, uri: &DocumentUri, symbols: Vec<SymbolRecord>) {
        let module_index = build_module_index(&symbols);
        let count = symbols.len();
        let mut documents = self.documents.write();
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        documents.insert(
            uri.clone(),
            Arc::new(DocumentIndex {
                uri: uri.clone(),
                symbols,
                module_index,
                node_cache: FxHashMap::default(),
                tree: None,
                text: Arc::from(""),
                line_index: LineIndex::new(""),
                returned_module: None,
                generation,
            }),
        );
        debug!(uri = %uri, symbols = count, "indexed prebuilt records");
    }

    /// Remove a document. Returns false if it was not indexed.
    pub fn evict(&self, uri: &DocumentUri) -> bool {
        let mut documents = self.documents.write();
        let removed = documents.shift_remove(uri).is_some();
        if removed {
            self.generation.fetch_add(1, Ordering::AcqRel);
            debug!(uri = %uri, "evicted document");
        }
        removed
    }

    // ------------------------------------------------------------------------
    // Document reads
    // ------------------------------------------------------------------------

    pub fn document(&self, uri: &DocumentUri) -> Option<Arc<DocumentIndex>> {
        self.documents.read().get(uri).cloned()
    }

    pub fn contains(&self, uri: &DocumentUri) -> bool {
        self.documents.read().contains_key(uri)
    }

    /// Indexed uris in insertion order.
    pub fn uris(&self) -> Vec<DocumentUri> {
        self.documents.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub fn get_document_symbols(&self, uri: &DocumentUri) -> Option<Vec<SymbolRecord>> {
        self.document(uri).map(|d| d.symbols.clone())
    }

    pub fn get_module_symbols(&self, uri: &DocumentUri, module: &str) -> Option<Vec<SymbolRecord>> {
        self.document(uri)?.module(module).map(<[_]>::to_vec)
    }

    /// First indexed uri ending with `suffix` at a path-segment boundary.
    pub fn find_uri_by_suffix(&self, suffix: &str) -> Option<DocumentUri> {
        self.documents
            .read()
            .keys()
            .find(|uri| uri.has_path_suffix(suffix))
            .cloned()
    }

    /// Document a `require` path refers to (`a.b` → `a/b.lua`, `a/b/init.lua`).
    pub fn resolve_require(&self, module_path: &str) -> Option<DocumentUri> {
        require_path_suffixes(module_path)
            .iter()
            .find_map(|suffix| self.find_uri_by_suffix(suffix))
    }

    // ------------------------------------------------------------------------
    // Global reads
    // ------------------------------------------------------------------------

    /// The global index, rebuilt first if any document changed.
    pub fn global_index(&self) -> Arc<GlobalIndex> {
        let mut cached = self.global.lock();
        let documents = self.documents.read();
        // writers bump the generation while holding the write lock
        let generation = self.generation.load(Ordering::Acquire);
        if let Some(index) = cached.as_ref() {
            if index.generation == generation {
                return index.clone();
            }
        }
        let index = Arc::new(GlobalIndex::build(documents.values(), generation));
        debug!(
            generation,
            documents = documents.len(),
            symbols = index.symbols.len(),
            "rebuilt global index"
        );
        *cached = Some(index.clone());
        index
    }

    /// All records, optionally restricted to one name, in document insertion
    /// order then source order.
    pub fn get_global_symbols(&self, filter_name: Option<&str>) -> Vec<SymbolRecord> {
        let global = self.global_index();
        match filter_name {
            Some(name) => global.by_name(name).cloned().collect(),
            None => global.symbols().to_vec(),
        }
    }

    /// Members of a globally visible table across all documents.
    pub fn get_global_module(&self, module: &str) -> Option<Vec<SymbolRecord>> {
        self.global_index().module(module)
    }
}
