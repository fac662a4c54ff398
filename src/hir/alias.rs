//! LexicalAliasInferencer: what does a local qualifier stand for?
//!
//! Last resort for `h.get` when `h` is neither a global nor a document
//! module: scan raw lines backwards for `h = <rhs>` and classify the
//! right-hand side from its first few tokens. No tree is needed, so this also
//! works for lines the extractor skipped.

use smol_str::SmolStr;
use tracing::trace;

use crate::base::{DocumentUri, line_text};
use crate::parser::{Lexer, SyntaxKind, Token};

/// Lines inspected per scan, the start line included.
pub const MAX_SCAN_LINES: u32 = 32;
/// Characters kept from each line before lexing.
pub const MAX_LINE_CHARS: usize = 256;

/// What an alias refers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AliasTarget {
    /// A table name (`local h = http`, `local c = Class.new()`).
    Module(SmolStr),
    /// A file loaded with `require`.
    Document(DocumentUri),
}

/// A resolved alias and the line its assignment was found on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasMatch {
    pub target: AliasTarget,
    pub line: u32,
}

fn truncate(line: &str) -> &str {
    match line.char_indices().nth(MAX_LINE_CHARS) {
        Some((offset, _)) => &line[..offset],
        None => line,
    }
}

fn significant_tokens(line: &str) -> Vec<Token<'_>> {
    Lexer::new(truncate(line))
        .filter(|t| !t.kind.is_trivia())
        .collect()
}

/// Contents of a string literal token.
fn unquote(token: &Token<'_>) -> Option<String> {
    let text = token.text;
    match token.kind {
        SyntaxKind::STRING if text.len() >= 2 => Some(text[1..text.len() - 1].to_string()),
        SyntaxKind::LONG_STRING => {
            let open = text.find('[').and_then(|i| text[i + 1..].find('[').map(|j| i + j + 2))?;
            let close = text.rfind(']').and_then(|i| text[..i].rfind(']'))?;
            (open <= close).then(|| text[open..close].to_string())
        }
        _ => None,
    }
}

/// Infers aliases by re-lexing the raw text of one document.
pub struct LexicalAliasInferencer<'a, R> {
    text: &'a str,
    resolve_require: R,
}

impl<'a, R> LexicalAliasInferencer<'a, R>
where
    R: Fn(&str) -> Option<DocumentUri>,
{
    /// `resolve_require` maps a `require` path to an indexed document.
    pub fn new(text: &'a str, resolve_require: R) -> Self {
        Self {
            text,
            resolve_require,
        }
    }

    /// Find what `name` was assigned from, scanning up from `start_line`.
    ///
    /// Returns `None` when no assignment is found within the scan window,
    /// when a function boundary is crossed, or when the right-hand side is
    /// not a recognisable alias.
    pub fn infer(&self, name: &str, start_line: u32) -> Option<AliasMatch> {
        let lowest = start_line.saturating_sub(MAX_SCAN_LINES - 1);
        for line in (lowest..=start_line).rev() {
            let Some(content) = line_text(self.text, line) else {
                continue;
            };
            let tokens = significant_tokens(content);
            if let Some(rhs) = assignment_rhs(&tokens, name) {
                let target = self.classify(rhs);
                trace!(name, line, ?target, "alias assignment");
                return target.map(|target| AliasMatch { target, line });
            }
            if starts_function(&tokens) && !self.continues_expression(line) {
                trace!(name, line, "alias scan hit function boundary");
                return None;
            }
        }
        None
    }

    /// Whether the line above `line` leaves an expression open (`x =`,
    /// `return`), making a `function` on `line` a value rather than a new scope.
    fn continues_expression(&self, line: u32) -> bool {
        let Some(previous) = line.checked_sub(1) else {
            return false;
        };
        let Some(content) = line_text(self.text, previous) else {
            return false;
        };
        if content.trim().is_empty() {
            return false;
        }
        matches!(
            significant_tokens(content).last().map(|t| t.kind),
            Some(SyntaxKind::EQ | SyntaxKind::RETURN_KW)
        )
    }

    fn classify(&self, rhs: &[Token<'_>]) -> Option<AliasTarget> {
        use SyntaxKind::*;
        let kinds: Vec<SyntaxKind> = rhs.iter().map(|t| t.kind).collect();
        match kinds.as_slice() {
            [IDENT, STRING | LONG_STRING, ..] if rhs[0].text == "require" => {
                self.require_target(&rhs[1])
            }
            [IDENT, L_PAREN, STRING | LONG_STRING, ..] if rhs[0].text == "require" => {
                self.require_target(&rhs[2])
            }
            [IDENT, ..] if rhs[0].text == "require" => None,
            [IDENT, DOT, IDENT, L_PAREN, ..] if rhs[2].text == "new" => {
                Some(AliasTarget::Module(SmolStr::new(rhs[0].text)))
            }
            [IDENT, L_PAREN, ..] => Some(AliasTarget::Module(SmolStr::new(rhs[0].text))),
            [IDENT] | [IDENT, SEMICOLON, ..] => Some(AliasTarget::Module(SmolStr::new(rhs[0].text))),
            _ => None,
        }
    }

    fn require_target(&self, path: &Token<'_>) -> Option<AliasTarget> {
        let path = unquote(path)?;
        (self.resolve_require)(&path).map(AliasTarget::Document)
    }
}

/// The value assigned to `name` on one line. Statements are split at `;`
/// and the last assignment to `name` wins.
fn assignment_rhs<'t, 'a>(tokens: &'t [Token<'a>], name: &str) -> Option<&'t [Token<'a>]> {
    tokens
        .split(|t| t.kind == SyntaxKind::SEMICOLON)
        .rev()
        .find_map(|stmt| statement_rhs(stmt, name))
}

/// `[local] a, name = x, rhs`: the value in `name`'s slot.
fn statement_rhs<'t, 'a>(stmt: &'t [Token<'a>], name: &str) -> Option<&'t [Token<'a>]> {
    let stmt = match stmt.first()?.kind {
        SyntaxKind::LOCAL_KW => &stmt[1..],
        _ => stmt,
    };
    let eq = stmt.iter().position(|t| t.kind == SyntaxKind::EQ)?;
    let slot = stmt[..eq]
        .split(|t| t.kind == SyntaxKind::COMMA)
        .position(|target| matches!(target, [t] if t.kind == SyntaxKind::IDENT && t.text == name))?;
    split_values(&stmt[eq + 1..]).into_iter().nth(slot)
}

/// Split an expression list at commas outside brackets.
fn split_values<'t, 'a>(rhs: &'t [Token<'a>]) -> Vec<&'t [Token<'a>]> {
    use SyntaxKind::*;
    let mut values = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, token) in rhs.iter().enumerate() {
        match token.kind {
            L_PAREN | L_BRACKET | L_BRACE => depth += 1,
            R_PAREN | R_BRACKET | R_BRACE => depth = depth.saturating_sub(1),
            COMMA if depth == 0 => {
                values.push(&rhs[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    values.push(&rhs[start..]);
    values
}

fn starts_function(tokens: &[Token<'_>]) -> bool {
    match tokens {
        [first, ..] if first.kind == SyntaxKind::FUNCTION_KW => true,
        [first, second, ..] => {
            first.kind == SyntaxKind::LOCAL_KW && second.kind == SyntaxKind::FUNCTION_KW
        }
        _ => false,
    }
}
