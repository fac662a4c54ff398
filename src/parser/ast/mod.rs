//! Typed views over the lossless Lua tree.
//!
//! Each wrapper holds one `SyntaxNode` and exposes its meaningful children;
//! statements and expressions are closed enums ([`Stmt`], [`Expr`]).

use rowan::NodeOrToken;

use super::syntax_kind::SyntaxKind;
use super::{SyntaxNode, SyntaxToken};

// ----------------------------------------------------------------------------
// Token helpers
// ----------------------------------------------------------------------------

fn child_tokens(node: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> {
    node.children_with_tokens().filter_map(NodeOrToken::into_token)
}

#[inline]
fn find_token(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    child_tokens(node).find(|token| token.kind() == kind)
}

#[inline]
fn has_token(node: &SyntaxNode, kind: SyntaxKind) -> bool {
    child_tokens(node).any(|token| token.kind() == kind)
}

/// Names written directly under `node`, left to right.
#[inline]
fn ident_tokens(node: &SyntaxNode) -> Vec<SyntaxToken> {
    child_tokens(node)
        .filter(|token| token.kind() == SyntaxKind::IDENT)
        .collect()
}

/// `fn $name(&self) -> Option<$ty>`: the first child castable to `$ty`.
macro_rules! first_child_method {
    ($name:ident, $ty:ident) => {
        pub fn $name(&self) -> Option<$ty> {
            self.0.children().find_map(<$ty>::cast)
        }
    };
}

/// `fn $name(&self)`: every child castable to `$ty`, lazily.
macro_rules! children_method {
    ($name:ident, $ty:ident) => {
        pub fn $name(&self) -> impl Iterator<Item = $ty> + '_ {
            self.0.children().filter_map(<$ty>::cast)
        }
    };
}

/// `fn $name(&self) -> Option<Expr>`: the expression child at index `$n`.
macro_rules! nth_expr_method {
    ($name:ident, $n:literal) => {
        pub fn $name(&self) -> Option<Expr> {
            self.0.children().filter_map(Expr::cast).nth($n)
        }
    };
}

// ----------------------------------------------------------------------------
// AstNode
// ----------------------------------------------------------------------------

pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;

    /// Every node below this one that casts to `N`.
    fn descendants<N: AstNode>(&self) -> impl Iterator<Item = N> {
        self.syntax().descendants().filter_map(N::cast)
    }

    fn doc_comment(&self) -> Option<String> {
        extract_doc_comment(self.syntax())
    }
}

/// Comment text written just above a statement.
///
/// Accepts consecutive `--` line comments or a single `--[[ ]]` block that
/// start their own line. A blank line or a trailing comment of the previous
/// statement ends the search.
pub fn extract_doc_comment(node: &SyntaxNode) -> Option<String> {
    let mut lines = Vec::new();
    let mut cursor = node.prev_sibling_or_token();

    while let Some(NodeOrToken::Token(token)) = cursor {
        match token.kind() {
            SyntaxKind::WHITESPACE if token.text().matches('\n').count() > 1 => break,
            SyntaxKind::WHITESPACE => cursor = token.prev_sibling_or_token(),
            SyntaxKind::COMMENT if starts_line(&token) => {
                let text = token.text().trim_start_matches('-').trim();
                if !text.is_empty() {
                    lines.push(text.to_string());
                }
                cursor = token.prev_sibling_or_token();
            }
            SyntaxKind::LONG_COMMENT if starts_line(&token) => {
                let text = clean_long_comment(token.text());
                if !text.is_empty() {
                    lines.push(text);
                }
                break;
            }
            _ => break,
        }
    }

    // walked upwards
    lines.reverse();
    (!lines.is_empty()).then(|| lines.join("\n"))
}

/// True when only whitespace separates `token` from the previous line break.
fn starts_line(token: &SyntaxToken) -> bool {
    match token.prev_sibling_or_token() {
        None => true,
        Some(NodeOrToken::Token(prev)) if prev.kind() == SyntaxKind::WHITESPACE => {
            prev.text().contains('\n') || prev.prev_sibling_or_token().is_none()
        }
        Some(_) => false,
    }
}

/// Strip `--[==[` / `]==]` and blank lines from a long comment.
fn clean_long_comment(text: &str) -> String {
    let body = text.trim_start_matches('-');
    let level = body
        .strip_prefix('[')
        .map(|s| s.bytes().take_while(|&b| b == b'=').count())
        .unwrap_or(0);
    let delimiter = level + 2;
    let inner = body
        .get(delimiter..body.len().saturating_sub(delimiter))
        .unwrap_or_default();
    inner
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

// ----------------------------------------------------------------------------
// Node declarations
// ----------------------------------------------------------------------------

/// Declares a newtype over `SyntaxNode` that casts from exactly one kind.
macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(pub(crate) SyntaxNode);

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                Self::can_cast(node.kind()).then(|| Self(node))
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

// after the macros so they are in scope
mod expressions;
mod statements;

pub use expressions::*;
pub use statements::*;

// ----------------------------------------------------------------------------
// Root
// ----------------------------------------------------------------------------

ast_node!(SourceFile, SOURCE_FILE);

impl SourceFile {
    first_child_method!(block, Block);

    /// Top-level statements in source order.
    pub fn statements(&self) -> Vec<Stmt> {
        self.block()
            .map(|block| block.statements().collect())
            .unwrap_or_default()
    }
}

ast_node!(Block, BLOCK);

impl Block {
    children_method!(statements, Stmt);
}
