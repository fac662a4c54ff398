//! Hover information implementation.

use std::fmt::Write;

use super::query::{QueryRouter, SymbolQuery};
use crate::base::Span;
use crate::hir::{LocalKind, SymbolKind, SymbolRecord};

/// Result of a hover request.
#[derive(Clone, Debug)]
pub struct HoverResult {
    /// The hover content (markdown).
    pub contents: String,
    /// `base.name` of the hovered symbol.
    pub qualified_name: String,
    /// The hovered word.
    pub range: Span,
    /// Whether the cursor is on the declaration itself.
    pub is_definition: bool,
}

/// One-line Lua rendering of a declaration.
///
/// `function M.f(a, b)`, `function M:go()`, `local x = 1`, `(parameter) n`.
pub(crate) fn declaration_line(symbol: &SymbolRecord) -> String {
    let prefix = match symbol.local {
        Some(LocalKind::Local) => "local ",
        Some(LocalKind::Parameter) => "(parameter) ",
        Some(LocalKind::Loop) => "(loop variable) ",
        None => "",
    };
    if symbol.kind == SymbolKind::Function {
        let name = match &symbol.base {
            Some(base) if symbol.is_method => format!("{base}:{}", symbol.name),
            _ => symbol.qualified_name(),
        };
        return format!("{prefix}function {name}({})", symbol.parameters.join(", "));
    }
    match &symbol.value {
        Some(value) => format!("{prefix}{} = {value}", symbol.qualified_name()),
        None => format!("{prefix}{}: {}", symbol.qualified_name(), symbol.kind.display()),
    }
}

/// Markdown for one symbol.
pub(crate) fn hover_markdown(symbol: &SymbolRecord) -> String {
    let mut contents = format!("```lua\n{}\n```", declaration_line(symbol));
    if let Some(ref_type) = &symbol.ref_type {
        let _ = write!(contents, "\n\nAlias of `{ref_type}`");
    }
    if let Some(comment) = &symbol.comment {
        let _ = write!(contents, "\n\n---\n\n{comment}");
    }
    contents
}

/// Hover for the name under the query; the first candidate is shown.
pub fn hover(router: &QueryRouter<'_>, query: &SymbolQuery) -> Option<HoverResult> {
    let candidates = router.resolve_for_hover(query)?;
    let symbol = candidates.first()?;
    Some(HoverResult {
        contents: hover_markdown(symbol),
        qualified_name: symbol.qualified_name(),
        range: query.range,
        is_definition: symbol.uri == query.uri && symbol.range == query.range,
    })
}
