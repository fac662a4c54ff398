//! Symbol records and the pure extraction phase.
//!
//! [`extract_symbols`] turns a successful [`Parse`] into [`SymbolRecord`]s
//! without touching any shared state. The same record builders
//! ([`RecordFactory`]) are reused by the scope resolver so that a binding
//! found by a position walk looks exactly like its indexed counterpart.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::base::{DocumentUri, LineIndex, Span};
use crate::parser::{
    AssignStmt, AstNode, Block, Expr, FunctionStmt, LiteralKind, LocalFunctionStmt, LocalStmt,
    Parse, ParamList, SourceFile, Stmt, SyntaxToken, TableExpr, TableField,
};

// ============================================================================
// SYMBOL TYPES
// ============================================================================

/// What kind of value a symbol holds, as far as it can be told syntactically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Function,
    Variable,
    /// A table used as a module (`local M = {}`).
    Namespace,
    /// A library table such as `string` or `math`.
    Module,
    String,
    Number,
    Boolean,
    Nil,
}

impl SymbolKind {
    /// Human-readable name shown in completion details and hovers.
    pub fn display(&self) -> &'static str {
        match self {
            SymbolKind::Function => "function",
            SymbolKind::Variable => "variable",
            SymbolKind::Namespace => "table",
            SymbolKind::Module => "module",
            SymbolKind::String => "string",
            SymbolKind::Number => "number",
            SymbolKind::Boolean => "boolean",
            SymbolKind::Nil => "nil",
        }
    }
}

/// How a non-global binding was introduced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LocalKind {
    /// `local x` / `local function f`
    Local,
    /// A `for` control variable.
    Loop,
    /// A function parameter.
    Parameter,
}

/// A source location: document plus the range of the declared name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Location {
    pub uri: DocumentUri,
    pub range: Span,
}

/// A declared name extracted from a document.
///
/// Immutable once built; `(uri, range)` identifies a record within one
/// generation of the index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolRecord {
    pub name: SmolStr,
    pub kind: SymbolKind,
    pub uri: DocumentUri,
    /// Range of the name token (the tail identifier of `M.f`).
    pub range: Span,
    /// Owning table for members (`M` in `M.f`).
    pub base: Option<SmolStr>,
    /// `None` for globals and table fields.
    pub local: Option<LocalKind>,
    /// Literal source text of the initializer.
    pub value: Option<Arc<str>>,
    pub parameters: Vec<SmolStr>,
    pub comment: Option<Arc<str>>,
    /// The name this value was derived from (`Foo` for `Foo.new()`,
    /// `a.b` for `require("a.b")`).
    pub ref_type: Option<SmolStr>,
    /// Declared with `:`; callers see an implicit `self`.
    pub is_method: bool,
}

impl SymbolRecord {
    pub fn new(
        name: impl Into<SmolStr>,
        kind: SymbolKind,
        uri: DocumentUri,
        range: Span,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            uri,
            range,
            base: None,
            local: None,
            value: None,
            parameters: Vec::new(),
            comment: None,
            ref_type: None,
            is_method: false,
        }
    }

    pub fn with_base(mut self, base: impl Into<SmolStr>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn with_local(mut self, local: LocalKind) -> Self {
        self.local = Some(local);
        self
    }

    pub fn with_value(mut self, value: impl Into<Arc<str>>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_parameters<I, S>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        self.parameters = parameters.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_comment(mut self, comment: impl Into<Arc<str>>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_ref_type(mut self, ref_type: impl Into<SmolStr>) -> Self {
        self.ref_type = Some(ref_type.into());
        self
    }

    pub fn as_method(mut self) -> Self {
        self.is_method = true;
        self
    }

    pub fn location(&self) -> Location {
        Location {
            uri: self.uri.clone(),
            range: self.range,
        }
    }

    pub fn is_local(&self) -> bool {
        self.local.is_some()
    }

    /// `base.name` for members, `name` otherwise.
    pub fn qualified_name(&self) -> String {
        match &self.base {
            Some(base) => format!("{base}.{}", self.name),
            None => self.name.to_string(),
        }
    }
}

// ============================================================================
// RECORD BUILDING
// ============================================================================

/// What an initializer expression tells about the declared name.
#[derive(Default)]
struct Initializer {
    kind: Option<SymbolKind>,
    value: Option<String>,
    ref_type: Option<String>,
    parameters: Vec<String>,
    table: Option<TableExpr>,
}

fn param_names(params: Option<ParamList>) -> Vec<String> {
    params.map(|p| p.names()).unwrap_or_default()
}

/// Derive the record shape from an initializer expression.
fn classify(expr: Option<&Expr>) -> Initializer {
    let Some(expr) = expr else {
        return Initializer::default();
    };
    match expr {
        Expr::Literal(literal) => {
            let kind = match literal.kind() {
                Some(LiteralKind::Nil) => SymbolKind::Nil,
                Some(LiteralKind::Boolean) => SymbolKind::Boolean,
                Some(LiteralKind::Number) => SymbolKind::Number,
                Some(LiteralKind::String) | None => SymbolKind::String,
            };
            Initializer {
                kind: Some(kind),
                value: literal.text(),
                ..Default::default()
            }
        }
        Expr::Table(table) => Initializer {
            kind: Some(SymbolKind::Namespace),
            table: Some(table.clone()),
            ..Default::default()
        },
        Expr::Function(func) => Initializer {
            kind: Some(SymbolKind::Function),
            parameters: param_names(func.params()),
            ..Default::default()
        },
        Expr::Call(call) => {
            let ref_type = call.require_path().or_else(|| {
                let path = call.callee()?.path()?;
                Some(match path.strip_suffix(".new") {
                    Some(owner) => owner.to_string(),
                    None => path,
                })
            });
            Initializer {
                ref_type,
                ..Default::default()
            }
        }
        Expr::MethodCall(call) => {
            let is_constructor = call.name().is_some_and(|n| n.text() == "new");
            Initializer {
                ref_type: call
                    .receiver()
                    .filter(|_| is_constructor)
                    .and_then(|r| r.path()),
                ..Default::default()
            }
        }
        Expr::Name(_) | Expr::Field(_) => Initializer {
            ref_type: expr.path(),
            ..Default::default()
        },
        Expr::Paren(paren) => classify(paren.inner().as_ref()),
        // `M = M or {}`
        Expr::Binary(binary) if binary.op() == Some(crate::parser::SyntaxKind::OR_KW) => {
            match binary.rhs() {
                Some(rhs @ Expr::Table(_)) => classify(Some(&rhs)),
                _ => Initializer::default(),
            }
        }
        _ => Initializer::default(),
    }
}

/// Builds records for declarations of one document.
pub(crate) struct RecordFactory<'a> {
    uri: &'a DocumentUri,
    line_index: &'a LineIndex,
}

impl<'a> RecordFactory<'a> {
    pub(crate) fn new(uri: &'a DocumentUri, line_index: &'a LineIndex) -> Self {
        Self { uri, line_index }
    }

    pub(crate) fn span(&self, token: &SyntaxToken) -> Span {
        self.line_index.span(token.text_range())
    }

    fn record(&self, token: &SyntaxToken, init: &Initializer) -> SymbolRecord {
        let kind = init.kind.unwrap_or(SymbolKind::Variable);
        let mut record = SymbolRecord::new(token.text(), kind, self.uri.clone(), self.span(token))
            .with_parameters(init.parameters.iter().map(String::as_str));
        if let Some(value) = &init.value {
            record = record.with_value(value.as_str());
        }
        if let Some(ref_type) = &init.ref_type {
            record = record.with_ref_type(ref_type.as_str());
        }
        record
    }

    /// A binding introduced without an initializer (loop variable, parameter).
    pub(crate) fn binding(&self, token: &SyntaxToken, local: LocalKind) -> SymbolRecord {
        SymbolRecord::new(token.text(), SymbolKind::Variable, self.uri.clone(), self.span(token))
            .with_local(local)
    }

    /// Keyed fields of a table constructor, recursively, owned by `base`.
    fn table_fields(&self, table: &TableExpr, base: &str, out: &mut Vec<SymbolRecord>) {
        for field in table.fields() {
            let (name, token) = match &field {
                TableField::Named(named) => match named.name() {
                    Some(token) => (token.text().to_string(), token),
                    None => continue,
                },
                TableField::Indexed(indexed) => match indexed.string_key() {
                    Some(key) => key,
                    None => continue,
                },
                TableField::Positional(_) => continue,
            };
            let value = field.value();
            let init = classify(value.as_ref());
            let mut record = self.record(&token, &init).with_base(base);
            record.name = SmolStr::new(&name);
            if let Some(comment) = field.doc_comment() {
                record = record.with_comment(comment);
            }
            out.push(record);
            if let Some(nested) = &init.table {
                self.table_fields(nested, &name, out);
            }
        }
    }

    /// Records for `local a, b = ...`, including fields of table initializers.
    pub(crate) fn local_stmt(&self, stmt: &LocalStmt) -> Vec<SymbolRecord> {
        let comment = stmt.doc_comment();
        let values = stmt.values();
        let mut out = Vec::new();
        for (i, name) in stmt.names().enumerate() {
            let Some(token) = name.ident() else {
                continue;
            };
            let init = classify(values.get(i));
            let mut record = self.record(&token, &init).with_local(LocalKind::Local);
            if let Some(comment) = &comment {
                record = record.with_comment(comment.as_str());
            }
            out.push(record);
            if let Some(table) = &init.table {
                self.table_fields(table, token.text(), &mut out);
            }
        }
        out
    }

    pub(crate) fn local_function(&self, stmt: &LocalFunctionStmt) -> Option<SymbolRecord> {
        let token = stmt.ident()?;
        let mut record =
            SymbolRecord::new(token.text(), SymbolKind::Function, self.uri.clone(), self.span(&token))
                .with_local(LocalKind::Local)
                .with_parameters(param_names(stmt.params()));
        if let Some(comment) = stmt.doc_comment() {
            record = record.with_comment(comment);
        }
        Some(record)
    }

    pub(crate) fn function_stmt(&self, stmt: &FunctionStmt) -> Option<SymbolRecord> {
        let name = stmt.name()?;
        let token = name.tail()?;
        let mut record =
            SymbolRecord::new(token.text(), SymbolKind::Function, self.uri.clone(), self.span(&token))
                .with_parameters(param_names(stmt.params()));
        if let Some(owner) = name.owner() {
            record = record.with_base(owner.text());
        }
        if name.is_method() {
            record = record.as_method();
        }
        if let Some(comment) = stmt.doc_comment() {
            record = record.with_comment(comment);
        }
        Some(record)
    }

    /// Records for `a, M.b = ...`; indexed targets (`t[k]`) declare nothing.
    pub(crate) fn assign_stmt(&self, stmt: &AssignStmt) -> Vec<SymbolRecord> {
        let comment = stmt.doc_comment();
        let values = stmt.values();
        let mut out = Vec::new();
        for (i, target) in stmt.targets().iter().enumerate() {
            let Some(token) = target.declared_name() else {
                continue;
            };
            let base = match target {
                Expr::Field(field) => field
                    .base()
                    .and_then(|b| b.path())
                    .and_then(|p| p.rsplit('.').next().map(str::to_string)),
                _ => None,
            };
            if matches!(target, Expr::Field(_)) && base.is_none() {
                continue;
            }
            let init = classify(values.get(i));
            let mut record = self.record(&token, &init);
            if let Some(base) = &base {
                record = record.with_base(base.as_str());
            }
            if let Some(comment) = &comment {
                record = record.with_comment(comment.as_str());
            }
            out.push(record);
            if let Some(table) = &init.table {
                self.table_fields(table, token.text(), &mut out);
            }
        }
        out
    }
}

/// Dotted key of a top-level function statement (`f`, `M.f`, `M:f`).
pub(crate) fn function_key(stmt: &Stmt) -> Option<SmolStr> {
    match stmt {
        Stmt::LocalFunction(func) => Some(SmolStr::new(func.ident()?.text())),
        Stmt::Function(func) => {
            let name = func.name()?;
            let mut segments: Vec<String> =
                name.segments().iter().map(|t| t.text().to_string()).collect();
            let tail = segments.pop()?;
            let separator = if name.is_method() { ":" } else { "." };
            if segments.is_empty() {
                Some(SmolStr::new(tail))
            } else {
                Some(SmolStr::new(format!("{}{separator}{tail}", segments.join("."))))
            }
        }
        _ => None,
    }
}

// ============================================================================
// EXTRACTION
// ============================================================================

/// Options for [`extract_symbols`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ExtractOptions {
    /// Statements nested at most this deep are indexed (0 = chunk level).
    pub index_depth: usize,
}

/// Result of extracting one document.
#[derive(Clone, Debug, Default)]
pub struct Extraction {
    pub symbols: Vec<SymbolRecord>,
    /// Top-level function key → statement ranges.
    pub node_cache: FxHashMap<SmolStr, Vec<Span>>,
    /// Identifier of a chunk-level `return X`.
    pub returned_module: Option<SmolStr>,
}

/// Extract symbol records from a successful parse.
pub fn extract_symbols(
    uri: &DocumentUri,
    parse: &Parse,
    line_index: &LineIndex,
    options: &ExtractOptions,
) -> Extraction {
    let mut extractor = Extractor {
        factory: RecordFactory::new(uri, line_index),
        line_index,
        options,
        result: Extraction::default(),
    };
    let Some(file) = SourceFile::cast(parse.syntax()) else {
        return extractor.result;
    };
    if let Some(block) = file.block() {
        extractor.block(&block, 0);
    }
    extractor.result.returned_module = file.statements().iter().find_map(|stmt| match stmt {
        Stmt::Return(ret) => match ret.values().as_slice() {
            [Expr::Name(name)] => name.text().map(SmolStr::new),
            _ => None,
        },
        _ => None,
    });
    extractor.result
}

struct Extractor<'a> {
    factory: RecordFactory<'a>,
    line_index: &'a LineIndex,
    options: &'a ExtractOptions,
    result: Extraction,
}

impl Extractor<'_> {
    fn block(&mut self, block: &Block, depth: usize) {
        for stmt in block.statements() {
            self.statement(&stmt, depth);
        }
    }

    fn nested_block(&mut self, block: Option<Block>, depth: usize) {
        if depth <= self.options.index_depth {
            if let Some(block) = block {
                self.block(&block, depth);
            }
        }
    }

    fn function_body(&mut self, params: Option<ParamList>, body: Option<Block>, depth: usize) {
        if depth > self.options.index_depth {
            return;
        }
        for param in params.map(|p| p.params()).unwrap_or_default() {
            if param.kind() == crate::parser::SyntaxKind::IDENT {
                let record = self.factory.binding(&param, LocalKind::Parameter);
                self.result.symbols.push(record);
            }
        }
        self.nested_block(body, depth);
    }

    /// Function literals among initializer values and table constructor
    /// field values.
    fn function_values(&mut self, values: &[Expr], depth: usize) {
        for value in values {
            match value {
                Expr::Function(func) => self.function_body(func.params(), func.body(), depth),
                Expr::Table(table) => {
                    let fields: Vec<Expr> = table.fields().filter_map(|f| f.value()).collect();
                    self.function_values(&fields, depth);
                }
                _ => {}
            }
        }
    }

    fn statement(&mut self, stmt: &Stmt, depth: usize) {
        if depth == 0 {
            if let Some(key) = function_key(stmt) {
                let span = self.line_index.span(stmt.syntax().text_range());
                self.result.node_cache.entry(key).or_default().push(span);
            }
        }
        match stmt {
            Stmt::Local(local) => {
                let records = self.factory.local_stmt(local);
                self.result.symbols.extend(records);
                self.function_values(&local.values(), depth + 1);
            }
            Stmt::LocalFunction(func) => {
                self.result.symbols.extend(self.factory.local_function(func));
                self.function_body(func.params(), func.body(), depth + 1);
            }
            Stmt::Function(func) => {
                self.result.symbols.extend(self.factory.function_stmt(func));
                self.function_body(func.params(), func.body(), depth + 1);
            }
            Stmt::Assign(assign) => {
                let records = self.factory.assign_stmt(assign);
                self.result.symbols.extend(records);
                self.function_values(&assign.values(), depth + 1);
            }
            Stmt::Do(s) => self.nested_block(s.body(), depth + 1),
            Stmt::While(s) => self.nested_block(s.body(), depth + 1),
            Stmt::Repeat(s) => self.nested_block(s.body(), depth + 1),
            Stmt::If(s) => {
                for block in s.blocks() {
                    self.nested_block(Some(block), depth + 1);
                }
            }
            Stmt::NumericFor(s) => {
                if depth < self.options.index_depth {
                    if let Some(var) = s.var() {
                        let record = self.factory.binding(&var, LocalKind::Loop);
                        self.result.symbols.push(record);
                    }
                }
                self.nested_block(s.body(), depth + 1);
            }
            Stmt::GenericFor(s) => {
                if depth < self.options.index_depth {
                    for var in s.vars() {
                        let record = self.factory.binding(&var, LocalKind::Loop);
                        self.result.symbols.push(record);
                    }
                }
                self.nested_block(s.body(), depth + 1);
            }
            Stmt::Call(_) | Stmt::Return(_) | Stmt::Break(_) | Stmt::Goto(_) | Stmt::Label(_) => {}
        }
    }
}
