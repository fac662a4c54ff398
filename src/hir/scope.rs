//! ScopeResolver: position-driven walk over a document's syntax tree.
//!
//! Lua has no declarations ahead of use, so visibility is decided purely by
//! position: a binding is in scope when its statement ends before the query
//! and the query sits inside every enclosing block. The walk visits blocks in
//! source order, stops at the first statement past the query, and descends
//! only into the node that contains it.

use rowan::TextRange;
use smol_str::SmolStr;
use tracing::trace;

use super::store::DocumentIndex;
use super::symbols::{LocalKind, RecordFactory, SymbolRecord};
use crate::base::{Position, PositionOrdering, Span};
use crate::parser::{AstNode, Block, FunctionExpr, ParamList, Stmt, SyntaxKind, SyntaxNode, SyntaxToken};

/// Resolves names against the scopes enclosing a query span.
pub struct ScopeResolver<'a> {
    document: &'a DocumentIndex,
}

impl<'a> ScopeResolver<'a> {
    pub fn new(document: &'a DocumentIndex) -> Self {
        Self { document }
    }

    /// Every binding visible at `query`, in declaration order.
    ///
    /// A binding whose name range equals `query` is included even though its
    /// own statement contains the query.
    pub fn bindings(&self, query: Span) -> Vec<SymbolRecord> {
        let Some(file) = self.document.source_file() else {
            return Vec::new();
        };
        let mut walker = Walker {
            factory: RecordFactory::new(&self.document.uri, &self.document.line_index),
            document: self.document,
            query,
            bindings: Vec::new(),
        };
        if let Some(block) = file.block() {
            walker.block(&block);
        }
        walker.bindings
    }

    /// The binding `name` refers to at `query`.
    ///
    /// An exact declaration hit wins; otherwise the latest local, loop or
    /// parameter binding; otherwise the latest global write.
    pub fn resolve(&self, name: &str, query: Span) -> Option<SymbolRecord> {
        let candidates: Vec<SymbolRecord> = self
            .bindings(query)
            .into_iter()
            .filter(|b| b.name == name)
            .collect();
        if let Some(exact) = candidates.iter().find(|b| b.range == query) {
            return Some(exact.clone());
        }
        candidates
            .iter()
            .rev()
            .find(|b| b.is_local())
            .or_else(|| candidates.last())
            .cloned()
    }

    /// Bindings in scope at `position`, one per name, innermost first.
    pub fn visible_bindings(&self, position: Position) -> Vec<SymbolRecord> {
        let mut seen = rustc_hash::FxHashSet::default();
        let mut visible = Vec::new();
        let mut bindings = self.bindings(Span::point(position));
        // locals shadow globals of the same name regardless of order
        bindings.sort_by_key(|b| b.is_local());
        for binding in bindings.into_iter().rev() {
            if seen.insert(binding.name.clone()) {
                visible.push(binding);
            }
        }
        visible
    }

    /// Table owning the `function A:b()` / `function A.b()` around `position`.
    pub fn enclosing_method_owner(&self, position: Position) -> Option<SmolStr> {
        self.document
            .node_cache
            .iter()
            .filter(|(key, _)| key.contains([':', '.']))
            .find(|(_, spans)| spans.iter().any(|span| span.contains(position)))
            .and_then(|(key, _)| {
                let mut segments = key.rsplit([':', '.']);
                segments.next();
                segments.next().map(SmolStr::new)
            })
    }
}

struct Walker<'a> {
    factory: RecordFactory<'a>,
    document: &'a DocumentIndex,
    query: Span,
    bindings: Vec<SymbolRecord>,
}

impl Walker<'_> {
    fn span(&self, range: TextRange) -> Span {
        self.document.line_index.span(range)
    }

    fn ordering(&self, node: &SyntaxNode) -> PositionOrdering {
        self.span(node.text_range()).compare(&self.query)
    }

    fn push(&mut self, record: SymbolRecord) {
        trace!(
            name = %record.name,
            line = record.range.start.line,
            local = ?record.local,
            "scope binding"
        );
        self.bindings.push(record);
    }

    fn block(&mut self, block: &Block) {
        for stmt in block.statements() {
            let ordering = self.ordering(stmt.syntax());
            if ordering == PositionOrdering::Before {
                break;
            }
            self.statement(&stmt, ordering);
        }
    }

    fn nested(&mut self, body: Option<Block>) {
        if let Some(body) = body {
            if self.ordering(body.syntax()).is_inside() {
                self.block(&body);
            }
        }
    }

    /// Loop variables are only visible in the body; a query on a variable
    /// itself still resolves to it.
    fn loop_body(&mut self, vars: Vec<SyntaxToken>, body: Option<Block>) {
        let in_body = body
            .as_ref()
            .is_some_and(|body| self.ordering(body.syntax()).is_inside());
        for var in vars {
            let record = self.factory.binding(&var, LocalKind::Loop);
            if in_body || record.range == self.query {
                self.push(record);
            }
        }
        if let Some(body) = body.filter(|_| in_body) {
            self.block(&body);
        }
    }

    /// Declarations visible after their statement, or hit exactly.
    fn declarations(&mut self, records: Vec<SymbolRecord>, ordering: PositionOrdering) {
        for record in records {
            if record.base.is_some() {
                continue;
            }
            if ordering == PositionOrdering::After || record.range == self.query {
                self.push(record);
            }
        }
    }

    fn function(&mut self, params: Option<ParamList>, body: Option<Block>) {
        for param in params.map(|p| p.params()).unwrap_or_default() {
            if param.kind() == SyntaxKind::IDENT {
                let record = self.factory.binding(&param, LocalKind::Parameter);
                self.push(record);
            }
        }
        if let Some(body) = body {
            self.block(&body);
        }
    }

    /// Walk the outermost function literal under `node` that holds the query.
    fn function_literals(&mut self, node: &SyntaxNode) {
        let literal = node
            .descendants()
            .filter_map(FunctionExpr::cast)
            .find(|func| self.ordering(func.syntax()).is_inside());
        if let Some(func) = literal {
            self.function(func.params(), func.body());
        }
    }

    fn statement(&mut self, stmt: &Stmt, ordering: PositionOrdering) {
        let inside = ordering.is_inside();
        match stmt {
            Stmt::Local(local) => {
                self.declarations(self.factory.local_stmt(local), ordering);
                if inside {
                    self.function_literals(local.syntax());
                }
            }
            Stmt::Assign(assign) => {
                self.declarations(self.factory.assign_stmt(assign), ordering);
                if inside {
                    self.function_literals(assign.syntax());
                }
            }
            Stmt::LocalFunction(func) => {
                if let Some(record) = self.factory.local_function(func) {
                    self.push(record);
                }
                if inside {
                    self.function(func.params(), func.body());
                }
            }
            Stmt::Function(func) => {
                if let Some(record) = self.factory.function_stmt(func) {
                    if record.base.is_none() {
                        self.push(record);
                    }
                }
                if inside {
                    self.function(func.params(), func.body());
                }
            }
            Stmt::Do(s) if inside => self.nested(s.body()),
            Stmt::While(s) if inside => self.nested(s.body()),
            Stmt::Repeat(s) if inside => {
                // the `until` condition sees the body's locals
                if let Some(body) = s.body() {
                    self.block(&body);
                }
            }
            Stmt::If(s) if inside => {
                for block in s.blocks() {
                    if self.ordering(block.syntax()).is_inside() {
                        self.block(&block);
                    }
                }
            }
            Stmt::NumericFor(s) if inside => {
                let var = s.var();
                self.loop_body(var.into_iter().collect(), s.body());
            }
            Stmt::GenericFor(s) if inside => self.loop_body(s.vars(), s.body()),
            Stmt::Return(s) if inside => self.function_literals(s.syntax()),
            Stmt::Call(s) if inside => self.function_literals(s.syntax()),
            _ => {}
        }
    }
}
