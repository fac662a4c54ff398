//! Diagnostics: parse-failure reporting.
//!
//! The store publishes one diagnostic list per indexing attempt through an
//! injected [`DiagnosticSink`]: a single error when the file fails to parse,
//! an empty list (clearing earlier errors) when it parses.

use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::base::{DocumentUri, Position, Span};
use crate::parser::ParseError;

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// How serious a diagnostic is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

impl Severity {
    /// `DiagnosticSeverity` number used by LSP clients.
    pub fn to_lsp(&self) -> u32 {
        match self {
            Severity::Error => 1,
            Severity::Warning => 2,
            Severity::Info => 3,
            Severity::Hint => 4,
        }
    }
}

/// One problem in one document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub range: Span,
    pub severity: Severity,
    /// Human-readable text.
    pub message: Arc<str>,
    /// Producer name shown by editors.
    pub source: &'static str,
}

impl Diagnostic {
    /// Create a new error diagnostic at a single position.
    pub fn error(position: Position, message: impl Into<Arc<str>>) -> Self {
        Self {
            range: Span::point(position),
            severity: Severity::Error,
            message: message.into(),
            source: "lunar",
        }
    }

    pub fn from_parse_error(error: &ParseError) -> Self {
        Self::error(Position::new(error.line, error.column), error.message.as_str())
    }
}

// ============================================================================
// SINKS
// ============================================================================

/// Receiver of per-document diagnostics (the editor layer).
///
/// Every call replaces the diagnostics previously published for `uri`.
pub trait DiagnosticSink: Send + Sync {
    fn publish(&self, uri: &DocumentUri, diagnostics: Vec<Diagnostic>);
}

/// Sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn publish(&self, _uri: &DocumentUri, _diagnostics: Vec<Diagnostic>) {}
}

/// Sink that keeps the latest diagnostics per document.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    latest: Mutex<FxHashMap<DocumentUri, Vec<Diagnostic>>>,
    publish_count: Mutex<usize>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest diagnostics published for `uri`, `None` if never published.
    pub fn diagnostics_for(&self, uri: &DocumentUri) -> Option<Vec<Diagnostic>> {
        self.latest.lock().get(uri).cloned()
    }

    /// Number of `publish` calls so far.
    pub fn publish_count(&self) -> usize {
        *self.publish_count.lock()
    }

    pub fn has_errors(&self) -> bool {
        self.latest
            .lock()
            .values()
            .flatten()
            .any(|d| d.severity == Severity::Error)
    }
}

impl DiagnosticSink for DiagnosticCollector {
    fn publish(&self, uri: &DocumentUri, diagnostics: Vec<Diagnostic>) {
        self.latest.lock().insert(uri.clone(), diagnostics);
        *self.publish_count.lock() += 1;
    }
}
