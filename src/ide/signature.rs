//! Signature help for the call around the cursor.

use std::sync::Arc;

use smol_str::SmolStr;

use super::query::{QueryKind, QueryRouter, SymbolQuery};
use super::text_utils::qualifier_before;
use crate::base::{DocumentUri, Position};
use crate::hir::SymbolKind;

/// Rendered signature of the called function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignatureHelp {
    /// `name(p1, p2)`
    pub label: String,
    pub parameters: Vec<ParameterInfo>,
    /// Index of the argument the cursor is in.
    pub active_parameter: u32,
    pub documentation: Option<Arc<str>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParameterInfo {
    pub label: SmolStr,
    /// Byte offsets of the parameter inside [`SignatureHelp::label`].
    pub offsets: (u32, u32),
}

/// The innermost call left open before the cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct OpenCall {
    /// Byte offset of the `(`.
    pub paren: usize,
    /// Commas seen at the call's own nesting level.
    pub active: u32,
}

/// Scan `line` up to `column` for the innermost unclosed `(`.
///
/// String contents are skipped and a `--` comment ends the scan.
pub(crate) fn open_call(line: &str, column: usize) -> Option<OpenCall> {
    let mut column = column.min(line.len());
    while !line.is_char_boundary(column) {
        column -= 1;
    }
    let mut stack: Vec<OpenCall> = Vec::new();
    let mut quote: Option<char> = None;
    let mut chars = line[..column].char_indices().peekable();
    while let Some((offset, c)) = chars.next() {
        if let Some(q) = quote {
            match c {
                '\\' => {
                    chars.next();
                }
                _ if c == q => quote = None,
                _ => {}
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '-' if chars.peek().is_some_and(|(_, next)| *next == '-') => break,
            '(' => stack.push(OpenCall {
                paren: offset,
                active: 0,
            }),
            ')' => {
                stack.pop();
            }
            ',' => {
                if let Some(call) = stack.last_mut() {
                    call.active += 1;
                }
            }
            _ => {}
        }
    }
    stack.pop()
}

/// Signature of the function whose argument list holds the cursor.
pub fn signature_help(
    router: &QueryRouter<'_>,
    uri: &DocumentUri,
    line_text: &str,
    position: Position,
) -> Option<SignatureHelp> {
    let call = open_call(line_text, position.column as usize)?;
    let callee_end = line_text[..call.paren].trim_end().len();
    let query = SymbolQuery::from_line(
        uri.clone(),
        line_text,
        Position::new(position.line, callee_end as u32),
        QueryKind::Signature,
    )?;
    let called_with_colon = qualifier_before(line_text, query.range.start.column as usize)
        .is_some_and(|(_, separator)| separator == ':');

    let candidates = router.resolve_for_signature(&query)?;
    let symbol = candidates.iter().find(|s| s.kind == SymbolKind::Function)?;

    let mut names = symbol.parameters.clone();
    if symbol.is_method && !called_with_colon {
        names.insert(0, SmolStr::new_static("self"));
    } else if !symbol.is_method && called_with_colon && names.first().is_some_and(|p| p == "self") {
        names.remove(0);
    }

    let mut label = format!("{}(", symbol.name);
    let mut parameters = Vec::with_capacity(names.len());
    for (i, name) in names.into_iter().enumerate() {
        if i > 0 {
            label.push_str(", ");
        }
        let start = label.len() as u32;
        label.push_str(&name);
        parameters.push(ParameterInfo {
            label: name,
            offsets: (start, label.len() as u32),
        });
    }
    label.push(')');

    Some(SignatureHelp {
        label,
        parameters,
        active_parameter: call.active,
        documentation: symbol.comment.clone(),
    })
}
