//! QueryRouter: one lookup pipeline behind every IDE feature.
//!
//! ```text
//! SymbolQuery
//!     │
//!     ├─ qualified ──► 1. global module   (not for `self`)
//!     │                2. document module (`self` → method owner, aliases)
//!     │
//!     └─ plain ──────► 3. scope walk
//!                      4. document symbols
//!                      5. other documents' globals
//! ```
//!
//! Strategies run in order; the first one with candidates left after
//! filtering wins. Unqualified completion is the exception and merges
//! strategies 3–5.

use std::sync::Arc;

use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use tracing::debug;

use super::text_utils::{find_word_boundaries, qualifier_before};
use crate::base::{DocumentUri, Position, Span};
use crate::hir::{
    AliasMatch, AliasTarget, DocumentIndex, LexicalAliasInferencer, Location, ScopeResolver,
    SymbolRecord, SymbolStore,
};
use crate::parser::{Lexer, SyntaxKind};

/// The feature a query is made for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QueryKind {
    Definition,
    Completion,
    Hover,
    Signature,
}

/// A name at a cursor, with its qualifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolQuery {
    pub uri: DocumentUri,
    /// `M` in `M.f` / `M:f`.
    pub module_name: Option<SmolStr>,
    pub symbol_name: SmolStr,
    pub kind: QueryKind,
    pub position: Position,
    /// Span of the word under the cursor (empty for completion after `.`).
    pub range: Span,
    pub line_text: Arc<str>,
}

impl SymbolQuery {
    /// Build a query from the raw text of the cursor's line.
    ///
    /// Completion accepts an empty word so that `M.|` lists every member;
    /// other kinds need an identifier under the cursor.
    pub fn from_line(
        uri: DocumentUri,
        line_text: &str,
        position: Position,
        kind: QueryKind,
    ) -> Option<Self> {
        let column = position.column as usize;
        let word = match find_word_boundaries(line_text, column) {
            Some(range) => range,
            None if kind == QueryKind::Completion => {
                let column = column.min(line_text.len());
                column..column
            }
            None => return None,
        };
        let module_name = qualifier_before(line_text, word.start).map(|(name, _)| SmolStr::new(name));
        let range = Span::from_coords(
            position.line,
            word.start as u32,
            position.line,
            word.end as u32,
        );
        Some(Self {
            uri,
            module_name,
            symbol_name: SmolStr::new(&line_text[word]),
            kind,
            position,
            range,
            line_text: Arc::from(line_text),
        })
    }

    pub fn is_qualified(&self) -> bool {
        self.module_name.is_some()
    }

    fn matches_name(&self, name: &str) -> bool {
        match self.kind {
            QueryKind::Completion => name.starts_with(self.symbol_name.as_str()),
            _ => name == self.symbol_name,
        }
    }

    /// True when the cursor sits on the right of `X = X` for the queried `X`.
    fn is_self_localization(&self) -> bool {
        let tokens: Vec<_> = Lexer::new(&self.line_text)
            .filter(|t| !t.kind.is_trivia())
            .collect();
        let rest = match tokens.first() {
            Some(t) if t.kind == SyntaxKind::LOCAL_KW => &tokens[1..],
            _ => &tokens[..],
        };
        match rest {
            [lhs, eq, rhs, ..] => {
                lhs.kind == SyntaxKind::IDENT
                    && eq.kind == SyntaxKind::EQ
                    && rhs.kind == SyntaxKind::IDENT
                    && lhs.text == rhs.text
                    && lhs.text == self.symbol_name
                    && u32::from(eq.offset) < self.position.column
            }
            _ => false,
        }
    }
}

/// Routes queries over a store.
pub struct QueryRouter<'a> {
    store: &'a SymbolStore,
    max_alias_hops: usize,
}

impl<'a> QueryRouter<'a> {
    pub fn new(store: &'a SymbolStore, max_alias_hops: usize) -> Self {
        Self {
            store,
            max_alias_hops,
        }
    }

    /// Definition locations, `None` when nothing matched.
    pub fn resolve_definition(&self, query: &SymbolQuery) -> Option<Vec<Location>> {
        let candidates = self.resolve_definition_symbols(query)?;
        Some(candidates.iter().map(SymbolRecord::location).collect())
    }

    /// The records behind [`resolve_definition`](Self::resolve_definition).
    pub fn resolve_definition_symbols(&self, query: &SymbolQuery) -> Option<Vec<SymbolRecord>> {
        self.candidates(query)
    }

    /// Completion candidates, prefix-matched.
    pub fn resolve_completion_candidates(&self, query: &SymbolQuery) -> Option<Vec<SymbolRecord>> {
        if query.is_qualified() {
            return self.candidates(query);
        }
        let document = self.store.document(&query.uri);
        let mut seen = FxHashSet::default();
        let mut merged = Vec::new();

        let mut strategies: Vec<Vec<SymbolRecord>> = Vec::with_capacity(3);
        if let Some(document) = &document {
            strategies.push(ScopeResolver::new(document).visible_bindings(query.position));
            strategies.push(self.document_symbols(document, query));
        }
        strategies.push(self.global_symbols(query));

        for candidates in strategies {
            for candidate in self.filter(query, candidates) {
                if seen.insert(candidate.name.clone()) {
                    merged.push(candidate);
                }
            }
        }
        (!merged.is_empty()).then_some(merged)
    }

    pub fn resolve_for_hover(&self, query: &SymbolQuery) -> Option<Vec<SymbolRecord>> {
        self.candidates(query)
    }

    pub fn resolve_for_signature(&self, query: &SymbolQuery) -> Option<Vec<SymbolRecord>> {
        self.candidates(query)
    }

    // ------------------------------------------------------------------------
    // Strategy pipeline
    // ------------------------------------------------------------------------

    fn candidates(&self, query: &SymbolQuery) -> Option<Vec<SymbolRecord>> {
        let document = self.store.document(&query.uri);
        if let Some(module) = &query.module_name {
            if module != "self" {
                if let Some(members) = self.store.get_global_module(module) {
                    if let Some(found) = self.accept(query, "global module", members) {
                        return Some(found);
                    }
                }
            }
            let document = document?;
            let members = self.document_module(&document, query, module);
            return self.accept(query, "document module", members);
        }

        let document = document?;
        if query.kind != QueryKind::Completion {
            let declared = self.declared_at(&document, query);
            if let Some(found) = self.accept(query, "declaration", declared) {
                return Some(found);
            }
        }
        let scoped = self.scope_candidates(&document, query);
        if let Some(found) = self.accept(query, "scope", scoped) {
            return Some(found);
        }
        let symbols = self.document_symbols(&document, query);
        if let Some(found) = self.accept(query, "document symbols", symbols) {
            return Some(found);
        }
        self.accept(query, "global symbols", self.global_symbols(query))
    }

    fn accept(
        &self,
        query: &SymbolQuery,
        strategy: &'static str,
        candidates: Vec<SymbolRecord>,
    ) -> Option<Vec<SymbolRecord>> {
        let found = self.filter(query, candidates);
        if found.is_empty() {
            return None;
        }
        debug!(
            name = %query.symbol_name,
            strategy,
            count = found.len(),
            "query resolved"
        );
        Some(found)
    }

    /// Name, self-localization and exact-position filters.
    fn filter(&self, query: &SymbolQuery, candidates: Vec<SymbolRecord>) -> Vec<SymbolRecord> {
        let self_localized = query.is_self_localization();
        let mut found: Vec<SymbolRecord> = candidates
            .into_iter()
            .filter(|c| query.matches_name(&c.name))
            .filter(|c| {
                !(self_localized
                    && c.uri == query.uri
                    && c.range.start.line == query.position.line)
            })
            .collect();
        if found
            .iter()
            .any(|c| c.uri == query.uri && c.range == query.range)
        {
            found.retain(|c| c.uri == query.uri && c.range == query.range);
        }
        found
    }

    fn scope_candidates(&self, document: &DocumentIndex, query: &SymbolQuery) -> Vec<SymbolRecord> {
        let resolver = ScopeResolver::new(document);
        if query.kind == QueryKind::Completion {
            return resolver.visible_bindings(query.position);
        }
        resolver
            .resolve(&query.symbol_name, query.range)
            .into_iter()
            .collect()
    }

    /// Records declared exactly at the query, table constructor keys included.
    fn declared_at(&self, document: &DocumentIndex, query: &SymbolQuery) -> Vec<SymbolRecord> {
        document
            .symbols
            .iter()
            .filter(|s| s.range == query.range)
            .cloned()
            .collect()
    }

    /// Document records without a base; locals declared after the query are
    /// hidden.
    fn document_symbols(&self, document: &DocumentIndex, query: &SymbolQuery) -> Vec<SymbolRecord> {
        document
            .symbols
            .iter()
            .filter(|s| s.base.is_none())
            .filter(|s| !(s.is_local() && s.range.start > query.range.end))
            .cloned()
            .collect()
    }

    /// Globals of every other document.
    fn global_symbols(&self, query: &SymbolQuery) -> Vec<SymbolRecord> {
        let filter = (query.kind != QueryKind::Completion).then_some(query.symbol_name.as_str());
        self.store
            .get_global_symbols(filter)
            .into_iter()
            .filter(|s| s.uri != query.uri && s.base.is_none() && !s.is_local())
            .collect()
    }

    // ------------------------------------------------------------------------
    // Qualified lookups
    // ------------------------------------------------------------------------

    fn document_module(
        &self,
        document: &Arc<DocumentIndex>,
        query: &SymbolQuery,
        module: &str,
    ) -> Vec<SymbolRecord> {
        let resolver = ScopeResolver::new(document);
        let module = if module == "self" {
            match resolver.enclosing_method_owner(query.position) {
                Some(owner) => owner,
                None => return Vec::new(),
            }
        } else {
            SmolStr::new(module)
        };

        if let Some(members) = document.module(&module) {
            return members.to_vec();
        }

        // the qualifier may be a local alias of a table or required file
        let qualifier = Span::point(Position::new(
            query.position.line,
            query.range.start.column.saturating_sub(1),
        ));
        let start_line = resolver
            .resolve(&module, qualifier)
            .map_or(query.position.line, |binding| binding.range.start.line);
        self.follow_alias(document, module, start_line)
    }

    /// Members of `module` as seen from `document`.
    fn module_members(&self, document: &DocumentIndex, module: &str) -> Option<Vec<SymbolRecord>> {
        match document.module(module) {
            Some(members) => Some(members.to_vec()),
            None => self.store.get_global_module(module),
        }
    }

    fn follow_alias(
        &self,
        document: &DocumentIndex,
        mut name: SmolStr,
        mut line: u32,
    ) -> Vec<SymbolRecord> {
        let inferencer =
            LexicalAliasInferencer::new(&document.text, |path| self.store.resolve_require(path));
        for _ in 0..self.max_alias_hops {
            let Some(AliasMatch { target, line: found }) = inferencer.infer(&name, line) else {
                break;
            };
            match target {
                AliasTarget::Document(uri) => return self.required_members(&uri),
                AliasTarget::Module(next) => {
                    if let Some(members) = self.module_members(document, &next) {
                        return members;
                    }
                    // `local M = M` must keep looking above its own line
                    line = if next == name {
                        match found.checked_sub(1) {
                            Some(line) => line,
                            None => break,
                        }
                    } else {
                        found
                    };
                    name = next;
                }
            }
        }
        Vec::new()
    }

    /// What `require` of `uri` yields: the returned table's members, or the
    /// file's globals when it returns nothing nameable.
    fn required_members(&self, uri: &DocumentUri) -> Vec<SymbolRecord> {
        let Some(target) = self.store.document(uri) else {
            return Vec::new();
        };
        if let Some(members) = target.returned_members() {
            return members.to_vec();
        }
        target
            .symbols
            .iter()
            .filter(|s| s.base.is_none() && !s.is_local())
            .cloned()
            .collect()
    }
}
