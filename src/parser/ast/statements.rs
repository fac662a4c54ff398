//! Statement nodes.

use super::*;

// ============================================================================
// Stmt
// ============================================================================

/// Any Lua statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Stmt {
    Local(LocalStmt),
    LocalFunction(LocalFunctionStmt),
    Function(FunctionStmt),
    Assign(AssignStmt),
    Call(CallStmt),
    Do(DoStmt),
    While(WhileStmt),
    Repeat(RepeatStmt),
    If(IfStmt),
    NumericFor(NumericForStmt),
    GenericFor(GenericForStmt),
    Return(ReturnStmt),
    Break(BreakStmt),
    Goto(GotoStmt),
    Label(LabelStmt),
}

impl AstNode for Stmt {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind.is_statement()
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        let stmt = match node.kind() {
            SyntaxKind::LOCAL_STMT => Self::Local(LocalStmt(node)),
            SyntaxKind::LOCAL_FUNCTION_STMT => Self::LocalFunction(LocalFunctionStmt(node)),
            SyntaxKind::FUNCTION_STMT => Self::Function(FunctionStmt(node)),
            SyntaxKind::ASSIGN_STMT => Self::Assign(AssignStmt(node)),
            SyntaxKind::CALL_STMT => Self::Call(CallStmt(node)),
            SyntaxKind::DO_STMT => Self::Do(DoStmt(node)),
            SyntaxKind::WHILE_STMT => Self::While(WhileStmt(node)),
            SyntaxKind::REPEAT_STMT => Self::Repeat(RepeatStmt(node)),
            SyntaxKind::IF_STMT => Self::If(IfStmt(node)),
            SyntaxKind::NUMERIC_FOR_STMT => Self::NumericFor(NumericForStmt(node)),
            SyntaxKind::GENERIC_FOR_STMT => Self::GenericFor(GenericForStmt(node)),
            SyntaxKind::RETURN_STMT => Self::Return(ReturnStmt(node)),
            SyntaxKind::BREAK_STMT => Self::Break(BreakStmt(node)),
            SyntaxKind::GOTO_STMT => Self::Goto(GotoStmt(node)),
            SyntaxKind::LABEL_STMT => Self::Label(LabelStmt(node)),
            _ => return None,
        };
        Some(stmt)
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Local(n) => n.syntax(),
            Self::LocalFunction(n) => n.syntax(),
            Self::Function(n) => n.syntax(),
            Self::Assign(n) => n.syntax(),
            Self::Call(n) => n.syntax(),
            Self::Do(n) => n.syntax(),
            Self::While(n) => n.syntax(),
            Self::Repeat(n) => n.syntax(),
            Self::If(n) => n.syntax(),
            Self::NumericFor(n) => n.syntax(),
            Self::GenericFor(n) => n.syntax(),
            Self::Return(n) => n.syntax(),
            Self::Break(n) => n.syntax(),
            Self::Goto(n) => n.syntax(),
            Self::Label(n) => n.syntax(),
        }
    }
}

// ============================================================================
// Declarations
// ============================================================================

ast_node!(LocalStmt, LOCAL_STMT);

impl LocalStmt {
    children_method!(names, LocalName);
    first_child_method!(expr_list, ExprList);

    /// Initializer expressions (empty for `local x`).
    pub fn values(&self) -> Vec<Expr> {
        self.expr_list()
            .map(|list| list.exprs().collect())
            .unwrap_or_default()
    }
}

ast_node!(LocalName, LOCAL_NAME);

impl LocalName {
    pub fn ident(&self) -> Option<SyntaxToken> {
        find_token(&self.0, SyntaxKind::IDENT)
    }

    /// Lua 5.4 attribute (`const` or `close`).
    pub fn attrib(&self) -> Option<String> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::ATTRIB)
            .and_then(|n| find_token(&n, SyntaxKind::IDENT))
            .map(|t| t.text().to_string())
    }
}

ast_node!(LocalFunctionStmt, LOCAL_FUNCTION_STMT);

impl LocalFunctionStmt {
    first_child_method!(params, ParamList);
    first_child_method!(body, Block);

    pub fn ident(&self) -> Option<SyntaxToken> {
        find_token(&self.0, SyntaxKind::IDENT)
    }
}

ast_node!(FunctionStmt, FUNCTION_STMT);

impl FunctionStmt {
    first_child_method!(name, FunctionName);
    first_child_method!(params, ParamList);
    first_child_method!(body, Block);
}

// `a.b.c:d` in `function a.b.c:d() end`
ast_node!(FunctionName, FUNCTION_NAME);

impl FunctionName {
    /// Every identifier of the name, head first.
    pub fn segments(&self) -> Vec<SyntaxToken> {
        ident_tokens(&self.0)
    }

    /// The declared name (last segment).
    pub fn tail(&self) -> Option<SyntaxToken> {
        self.segments().pop()
    }

    /// The table the function is stored in: the segment before the tail.
    pub fn owner(&self) -> Option<SyntaxToken> {
        let mut segments = self.segments();
        segments.pop()?;
        segments.pop()
    }

    /// True for the `:` form.
    pub fn is_method(&self) -> bool {
        has_token(&self.0, SyntaxKind::COLON)
    }
}

ast_node!(ParamList, PARAM_LIST);

impl ParamList {
    /// Parameter tokens (`IDENT` and a trailing `...`).
    pub fn params(&self) -> Vec<SyntaxToken> {
        child_tokens(&self.0)
            .filter(|t| matches!(t.kind(), SyntaxKind::IDENT | SyntaxKind::DOT_DOT_DOT))
            .collect()
    }

    pub fn names(&self) -> Vec<String> {
        self.params().iter().map(|t| t.text().to_string()).collect()
    }
}

// ============================================================================
// Assignment and calls
// ============================================================================

ast_node!(AssignStmt, ASSIGN_STMT);

impl AssignStmt {
    first_child_method!(target_list, TargetList);
    first_child_method!(expr_list, ExprList);

    pub fn targets(&self) -> Vec<Expr> {
        self.target_list()
            .map(|list| list.targets().collect())
            .unwrap_or_default()
    }

    pub fn values(&self) -> Vec<Expr> {
        self.expr_list()
            .map(|list| list.exprs().collect())
            .unwrap_or_default()
    }
}

ast_node!(TargetList, TARGET_LIST);

impl TargetList {
    children_method!(targets, Expr);
}

ast_node!(ExprList, EXPR_LIST);

impl ExprList {
    children_method!(exprs, Expr);
}

ast_node!(CallStmt, CALL_STMT);

impl CallStmt {
    first_child_method!(call, Expr);
}

// ============================================================================
// Blocks and control flow
// ============================================================================

ast_node!(DoStmt, DO_STMT);

impl DoStmt {
    first_child_method!(body, Block);
}

ast_node!(WhileStmt, WHILE_STMT);

impl WhileStmt {
    first_child_method!(condition, Expr);
    first_child_method!(body, Block);
}

ast_node!(RepeatStmt, REPEAT_STMT);

impl RepeatStmt {
    first_child_method!(body, Block);
    first_child_method!(condition, Expr);
}

ast_node!(IfStmt, IF_STMT);

impl IfStmt {
    first_child_method!(condition, Expr);
    first_child_method!(then_block, Block);
    children_method!(elseif_clauses, ElseifClause);
    first_child_method!(else_clause, ElseClause);

    /// Every clause body in source order.
    pub fn blocks(&self) -> Vec<Block> {
        let mut blocks: Vec<Block> = self.then_block().into_iter().collect();
        blocks.extend(self.elseif_clauses().filter_map(|c| c.body()));
        blocks.extend(self.else_clause().and_then(|c| c.body()));
        blocks
    }
}

ast_node!(ElseifClause, ELSEIF_CLAUSE);

impl ElseifClause {
    first_child_method!(condition, Expr);
    first_child_method!(body, Block);
}

ast_node!(ElseClause, ELSE_CLAUSE);

impl ElseClause {
    first_child_method!(body, Block);
}

ast_node!(NumericForStmt, NUMERIC_FOR_STMT);

impl NumericForStmt {
    first_child_method!(body, Block);

    /// The loop control variable.
    pub fn var(&self) -> Option<SyntaxToken> {
        find_token(&self.0, SyntaxKind::IDENT)
    }
}

ast_node!(GenericForStmt, GENERIC_FOR_STMT);

impl GenericForStmt {
    first_child_method!(iterators, ExprList);
    first_child_method!(body, Block);

    /// The iteration variables.
    pub fn vars(&self) -> Vec<SyntaxToken> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::NAME_LIST)
            .map(|n| ident_tokens(&n))
            .unwrap_or_default()
    }
}

ast_node!(ReturnStmt, RETURN_STMT);

impl ReturnStmt {
    first_child_method!(expr_list, ExprList);

    pub fn values(&self) -> Vec<Expr> {
        self.expr_list()
            .map(|list| list.exprs().collect())
            .unwrap_or_default()
    }
}

ast_node!(BreakStmt, BREAK_STMT);

ast_node!(GotoStmt, GOTO_STMT);

impl GotoStmt {
    pub fn label(&self) -> Option<SyntaxToken> {
        find_token(&self.0, SyntaxKind::IDENT)
    }
}

ast_node!(LabelStmt, LABEL_STMT);

impl LabelStmt {
    pub fn label(&self) -> Option<SyntaxToken> {
        find_token(&self.0, SyntaxKind::IDENT)
    }
}
