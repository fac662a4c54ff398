//! Expression nodes.

use super::*;

// ============================================================================
// Expr
// ============================================================================

/// Any Lua expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Name(NameRef),
    Literal(Literal),
    Vararg(VarargExpr),
    Function(FunctionExpr),
    Table(TableExpr),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Paren(ParenExpr),
    Field(FieldExpr),
    Index(IndexExpr),
    Call(CallExpr),
    MethodCall(MethodCallExpr),
}

impl AstNode for Expr {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::NAME_REF
                | SyntaxKind::LITERAL
                | SyntaxKind::VARARG_EXPR
                | SyntaxKind::FUNCTION_EXPR
                | SyntaxKind::TABLE_EXPR
                | SyntaxKind::BINARY_EXPR
                | SyntaxKind::UNARY_EXPR
                | SyntaxKind::PAREN_EXPR
                | SyntaxKind::FIELD_EXPR
                | SyntaxKind::INDEX_EXPR
                | SyntaxKind::CALL_EXPR
                | SyntaxKind::METHOD_CALL_EXPR
        )
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        let expr = match node.kind() {
            SyntaxKind::NAME_REF => Self::Name(NameRef(node)),
            SyntaxKind::LITERAL => Self::Literal(Literal(node)),
            SyntaxKind::VARARG_EXPR => Self::Vararg(VarargExpr(node)),
            SyntaxKind::FUNCTION_EXPR => Self::Function(FunctionExpr(node)),
            SyntaxKind::TABLE_EXPR => Self::Table(TableExpr(node)),
            SyntaxKind::BINARY_EXPR => Self::Binary(BinaryExpr(node)),
            SyntaxKind::UNARY_EXPR => Self::Unary(UnaryExpr(node)),
            SyntaxKind::PAREN_EXPR => Self::Paren(ParenExpr(node)),
            SyntaxKind::FIELD_EXPR => Self::Field(FieldExpr(node)),
            SyntaxKind::INDEX_EXPR => Self::Index(IndexExpr(node)),
            SyntaxKind::CALL_EXPR => Self::Call(CallExpr(node)),
            SyntaxKind::METHOD_CALL_EXPR => Self::MethodCall(MethodCallExpr(node)),
            _ => return None,
        };
        Some(expr)
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Name(n) => n.syntax(),
            Self::Literal(n) => n.syntax(),
            Self::Vararg(n) => n.syntax(),
            Self::Function(n) => n.syntax(),
            Self::Table(n) => n.syntax(),
            Self::Binary(n) => n.syntax(),
            Self::Unary(n) => n.syntax(),
            Self::Paren(n) => n.syntax(),
            Self::Field(n) => n.syntax(),
            Self::Index(n) => n.syntax(),
            Self::Call(n) => n.syntax(),
            Self::MethodCall(n) => n.syntax(),
        }
    }
}

impl Expr {
    /// Dotted path of a name or field chain (`a`, `a.b.c`).
    ///
    /// `None` for anything else, including indexing with `[]`.
    pub fn path(&self) -> Option<String> {
        match self {
            Self::Name(name) => name.text(),
            Self::Field(field) => {
                let base = field.base()?.path()?;
                let name = field.name()?;
                Some(format!("{base}.{}", name.text()))
            }
            _ => None,
        }
    }

    /// The name token this expression declares when used as an assignment
    /// target: the identifier itself, or the tail of `a.b`.
    pub fn declared_name(&self) -> Option<SyntaxToken> {
        match self {
            Self::Name(name) => name.ident(),
            Self::Field(field) => field.name(),
            _ => None,
        }
    }
}

// ============================================================================
// Leaves
// ============================================================================

ast_node!(NameRef, NAME_REF);

impl NameRef {
    pub fn ident(&self) -> Option<SyntaxToken> {
        find_token(&self.0, SyntaxKind::IDENT)
    }

    pub fn text(&self) -> Option<String> {
        self.ident().map(|t| t.text().to_string())
    }
}

/// Classification of a literal token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Nil,
    Boolean,
    Number,
    String,
}

ast_node!(Literal, LITERAL);

impl Literal {
    pub fn token(&self) -> Option<SyntaxToken> {
        child_tokens(&self.0)
            .find(|t| t.kind().is_literal())
    }

    pub fn kind(&self) -> Option<LiteralKind> {
        let kind = match self.token()?.kind() {
            SyntaxKind::NIL_KW => LiteralKind::Nil,
            SyntaxKind::TRUE_KW | SyntaxKind::FALSE_KW => LiteralKind::Boolean,
            SyntaxKind::NUMBER => LiteralKind::Number,
            _ => LiteralKind::String,
        };
        Some(kind)
    }

    /// Source text of the literal, quotes included.
    pub fn text(&self) -> Option<String> {
        self.token().map(|t| t.text().to_string())
    }

    /// Contents of a string literal without quotes or long brackets.
    ///
    /// Escapes are left as written.
    pub fn string_value(&self) -> Option<String> {
        let token = self.token()?;
        let text = token.text();
        match token.kind() {
            SyntaxKind::STRING => text.get(1..text.len().saturating_sub(1)).map(str::to_string),
            SyntaxKind::LONG_STRING => {
                let level = text[1..].bytes().take_while(|&b| b == b'=').count();
                let inner = text.get(level + 2..text.len().saturating_sub(level + 2))?;
                // a newline right after the opener is not part of the string
                let inner = inner
                    .strip_prefix("\r\n")
                    .or_else(|| inner.strip_prefix('\n'))
                    .unwrap_or(inner);
                Some(inner.to_string())
            }
            _ => None,
        }
    }
}

ast_node!(VarargExpr, VARARG_EXPR);

// ============================================================================
// Constructors
// ============================================================================

ast_node!(FunctionExpr, FUNCTION_EXPR);

impl FunctionExpr {
    first_child_method!(params, ParamList);
    first_child_method!(body, Block);
}

ast_node!(TableExpr, TABLE_EXPR);

impl TableExpr {
    children_method!(fields, TableField);
}

/// One entry of a table constructor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TableField {
    /// `k = v`
    Named(NamedField),
    /// `[k] = v`
    Indexed(IndexedField),
    /// `v`
    Positional(PositionalField),
}

impl AstNode for TableField {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::NAMED_FIELD | SyntaxKind::INDEXED_FIELD | SyntaxKind::POSITIONAL_FIELD
        )
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::NAMED_FIELD => Some(Self::Named(NamedField(node))),
            SyntaxKind::INDEXED_FIELD => Some(Self::Indexed(IndexedField(node))),
            SyntaxKind::POSITIONAL_FIELD => Some(Self::Positional(PositionalField(node))),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Named(n) => n.syntax(),
            Self::Indexed(n) => n.syntax(),
            Self::Positional(n) => n.syntax(),
        }
    }
}

impl TableField {
    pub fn value(&self) -> Option<Expr> {
        match self {
            Self::Named(field) => field.value(),
            Self::Indexed(field) => field.value(),
            Self::Positional(field) => field.value(),
        }
    }
}

ast_node!(NamedField, NAMED_FIELD);

impl NamedField {
    first_child_method!(value, Expr);

    pub fn name(&self) -> Option<SyntaxToken> {
        find_token(&self.0, SyntaxKind::IDENT)
    }
}

ast_node!(IndexedField, INDEXED_FIELD);

impl IndexedField {
    nth_expr_method!(key, 0);
    nth_expr_method!(value, 1);

    /// The key when it is a string literal (`["name"] = v`).
    pub fn string_key(&self) -> Option<(String, SyntaxToken)> {
        let Expr::Literal(literal) = self.key()? else {
            return None;
        };
        if literal.kind()? != LiteralKind::String {
            return None;
        }
        Some((literal.string_value()?, literal.token()?))
    }
}

ast_node!(PositionalField, POSITIONAL_FIELD);

impl PositionalField {
    first_child_method!(value, Expr);
}

// ============================================================================
// Operators
// ============================================================================

ast_node!(BinaryExpr, BINARY_EXPR);

impl BinaryExpr {
    nth_expr_method!(lhs, 0);
    nth_expr_method!(rhs, 1);

    pub fn op(&self) -> Option<SyntaxKind> {
        child_tokens(&self.0)
            .find(|t| !t.kind().is_trivia())
            .map(|t| t.kind())
    }
}

ast_node!(UnaryExpr, UNARY_EXPR);

impl UnaryExpr {
    first_child_method!(operand, Expr);
}

ast_node!(ParenExpr, PAREN_EXPR);

impl ParenExpr {
    first_child_method!(inner, Expr);
}

// ============================================================================
// Suffixed expressions
// ============================================================================

ast_node!(FieldExpr, FIELD_EXPR);

impl FieldExpr {
    first_child_method!(base, Expr);

    /// The identifier after the `.`.
    pub fn name(&self) -> Option<SyntaxToken> {
        find_token(&self.0, SyntaxKind::IDENT)
    }
}

ast_node!(IndexExpr, INDEX_EXPR);

impl IndexExpr {
    nth_expr_method!(base, 0);
    nth_expr_method!(index, 1);
}

ast_node!(CallExpr, CALL_EXPR);

impl CallExpr {
    first_child_method!(callee, Expr);
    first_child_method!(arg_list, ArgList);

    pub fn args(&self) -> Vec<Expr> {
        self.arg_list()
            .map(|list| list.args().collect())
            .unwrap_or_default()
    }

    /// The module path of `require "a.b"` / `require("a.b")`.
    pub fn require_path(&self) -> Option<String> {
        let Expr::Name(callee) = self.callee()? else {
            return None;
        };
        if callee.text()? != "require" {
            return None;
        }
        match self.args().first()? {
            Expr::Literal(literal) => literal.string_value(),
            _ => None,
        }
    }
}

ast_node!(MethodCallExpr, METHOD_CALL_EXPR);

impl MethodCallExpr {
    first_child_method!(receiver, Expr);
    first_child_method!(arg_list, ArgList);

    pub fn name(&self) -> Option<SyntaxToken> {
        find_token(&self.0, SyntaxKind::IDENT)
    }

    pub fn args(&self) -> Vec<Expr> {
        self.arg_list()
            .map(|list| list.args().collect())
            .unwrap_or_default()
    }
}

ast_node!(ArgList, ARG_LIST);

impl ArgList {
    children_method!(args, Expr);
}
