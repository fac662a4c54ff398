//! Recursive descent parser for Lua
//!
//! Recursive descent over the token stream into a rowan green tree.
//! Produces a lossless CST; any error marks the whole parse as failed for
//! indexing purposes, so recovery only has to guarantee termination.

use super::lexer::{Lexer, Token};
use super::syntax_kind::SyntaxKind;
use rowan::{Checkpoint, GreenNode, GreenNodeBuilder, TextRange, TextSize};

/// Green tree plus every error met while building it.
#[derive(Debug, Clone)]
pub struct Parse {
    pub green: GreenNode,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    /// Red root over the green tree.
    pub fn syntax(&self) -> super::SyntaxNode {
        super::SyntaxNode::new_root(self.green.clone())
    }

    /// No syntax errors were reported.
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A parse error anchored at a byte range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

/// Parse Lua source code into a CST
pub fn parse(input: &str) -> Parse {
    let tokens: Vec<_> = Lexer::new(input).collect();
    let mut parser = Parser::new(&tokens, TextSize::of(input));
    parser.parse_source_file();
    parser.finish()
}

/// Nesting limit for blocks and expressions, matching Lua's C stack limit.
pub const MAX_DEPTH: u32 = 200;

/// Binding power of unary operators.
const UNARY_PRIORITY: u8 = 12;

/// Left and right binding power of a binary operator.
fn binary_priority(kind: SyntaxKind) -> Option<(u8, u8)> {
    let priority = match kind {
        SyntaxKind::OR_KW => (1, 1),
        SyntaxKind::AND_KW => (2, 2),
        SyntaxKind::LT
        | SyntaxKind::GT
        | SyntaxKind::LT_EQ
        | SyntaxKind::GT_EQ
        | SyntaxKind::TILDE_EQ
        | SyntaxKind::EQ_EQ => (3, 3),
        SyntaxKind::PIPE => (4, 4),
        SyntaxKind::TILDE => (5, 5),
        SyntaxKind::AMP => (6, 6),
        SyntaxKind::SHL | SyntaxKind::SHR => (7, 7),
        // right associative
        SyntaxKind::DOT_DOT => (9, 8),
        SyntaxKind::PLUS | SyntaxKind::MINUS => (10, 10),
        SyntaxKind::STAR | SyntaxKind::SLASH | SyntaxKind::SLASH_SLASH | SyntaxKind::PERCENT => {
            (11, 11)
        }
        // right associative, binds tighter than unary on its left
        SyntaxKind::CARET => (14, 13),
        _ => return None,
    };
    Some(priority)
}

fn is_unary_op(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::NOT_KW | SyntaxKind::MINUS | SyntaxKind::HASH | SyntaxKind::TILDE
    )
}

/// The parser state
struct Parser<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
    len: TextSize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
    depth: u32,
    /// Set once `MAX_DEPTH` was hit; the rest of the input is one ERROR node.
    too_deep: bool,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token<'a>], len: TextSize) -> Self {
        Self {
            tokens,
            pos: 0,
            len,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
            depth: 0,
            too_deep: false,
        }
    }

    fn finish(self) -> Parse {
        Parse {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    /// The `n`th non-trivia token from the current position.
    fn nth_token(&self, n: usize) -> Option<&Token<'a>> {
        self.tokens[self.pos..]
            .iter()
            .filter(|t| !t.kind.is_trivia())
            .nth(n)
    }

    fn nth(&self, n: usize) -> SyntaxKind {
        self.nth_token(n).map(|t| t.kind).unwrap_or(SyntaxKind::ERROR)
    }

    fn current_kind(&self) -> SyntaxKind {
        self.nth(0)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        !self.at_eof() && self.current_kind() == kind
    }

    fn at_eof(&self) -> bool {
        self.nth_token(0).is_none()
    }

    fn at_block_end(&self) -> bool {
        self.at_eof() || self.current_kind().is_block_end()
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    /// Attach pending whitespace and comments to the current node.
    fn flush_trivia(&mut self) {
        while let Some(token) = self.tokens.get(self.pos) {
            if !token.kind.is_trivia() {
                break;
            }
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    fn bump(&mut self) {
        self.flush_trivia();
        if let Some(token) = self.tokens.get(self.pos) {
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(format!("{} expected near {}", kind.describe(), self.near()));
            false
        }
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    fn near(&self) -> String {
        match self.nth_token(0) {
            Some(token) => format!("'{}'", token.text),
            None => "<eof>".to_string(),
        }
    }

    fn error(&mut self, message: impl Into<String>) {
        if self.too_deep {
            return;
        }
        let range = self
            .nth_token(0)
            .map(|t| TextRange::at(t.offset, TextSize::of(t.text)))
            .unwrap_or_else(|| TextRange::empty(self.len));
        self.errors.push(SyntaxError::new(message, range));
    }

    /// Wrap the current token in an ERROR node so the loop makes progress.
    fn bump_error(&mut self) {
        self.flush_trivia();
        self.builder.start_node(SyntaxKind::ERROR.into());
        self.bump();
        self.builder.finish_node();
    }

    /// Enter one nesting level. Past `MAX_DEPTH` this reports a single error,
    /// swallows the remaining input and returns false.
    fn enter(&mut self) -> bool {
        if self.too_deep {
            return false;
        }
        if self.depth >= MAX_DEPTH {
            self.error(format!("chunk has too many syntax levels near {}", self.near()));
            self.too_deep = true;
            self.start_node(SyntaxKind::ERROR);
            while self.pos < self.tokens.len() {
                self.bump();
            }
            self.finish_node();
            return false;
        }
        self.depth += 1;
        true
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    // =========================================================================
    // Node building helpers
    // =========================================================================

    /// Start a node at the next significant token.
    fn start_node(&mut self, kind: SyntaxKind) {
        self.flush_trivia();
        self.builder.start_node(kind.into());
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.flush_trivia();
        self.builder.checkpoint()
    }

    fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    // =========================================================================
    // Chunk and blocks
    // =========================================================================

    /// SourceFile = Block EOF
    fn parse_source_file(&mut self) {
        self.builder.start_node(SyntaxKind::SOURCE_FILE.into());
        self.parse_block();
        if !self.at_eof() {
            self.error(format!("<eof> expected near {}", self.near()));
            self.start_node(SyntaxKind::ERROR);
            while !self.at_eof() {
                self.bump();
            }
            self.finish_node();
        }
        self.flush_trivia();
        self.finish_node();
    }

    /// Block = Stmt* ReturnStmt?
    ///
    /// Leading trivia stays inside the block so the first statement's doc
    /// comment is its sibling.
    fn parse_block(&mut self) {
        if !self.enter() {
            return;
        }
        self.builder.start_node(SyntaxKind::BLOCK.into());
        loop {
            self.flush_trivia();
            if self.at_block_end() {
                break;
            }
            if self.at(SyntaxKind::RETURN_KW) {
                self.parse_return();
                break;
            }
            let before = self.pos;
            self.parse_statement();
            if self.pos == before {
                self.error(format!("unexpected symbol near {}", self.near()));
                self.bump_error();
            }
        }
        self.finish_node();
        self.leave();
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_statement(&mut self) {
        match self.current_kind() {
            SyntaxKind::SEMICOLON => self.bump(),
            SyntaxKind::LOCAL_KW => {
                if self.nth(1) == SyntaxKind::FUNCTION_KW {
                    self.parse_local_function();
                } else {
                    self.parse_local();
                }
            }
            SyntaxKind::FUNCTION_KW => self.parse_function_stmt(),
            SyntaxKind::IF_KW => self.parse_if(),
            SyntaxKind::WHILE_KW => self.parse_while(),
            SyntaxKind::DO_KW => self.parse_do(),
            SyntaxKind::FOR_KW => self.parse_for(),
            SyntaxKind::REPEAT_KW => self.parse_repeat(),
            SyntaxKind::BREAK_KW => {
                self.start_node(SyntaxKind::BREAK_STMT);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::GOTO_KW => {
                self.start_node(SyntaxKind::GOTO_STMT);
                self.bump();
                self.expect(SyntaxKind::IDENT);
                self.finish_node();
            }
            SyntaxKind::COLON_COLON => {
                self.start_node(SyntaxKind::LABEL_STMT);
                self.bump();
                self.expect(SyntaxKind::IDENT);
                self.expect(SyntaxKind::COLON_COLON);
                self.finish_node();
            }
            _ => self.parse_expr_stmt(),
        }
    }

    /// LocalStmt = 'local' LocalName (',' LocalName)* ('=' ExprList)?
    fn parse_local(&mut self) {
        self.start_node(SyntaxKind::LOCAL_STMT);
        self.bump();
        loop {
            self.parse_local_name();
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        if self.eat(SyntaxKind::EQ) {
            self.parse_expr_list();
        }
        self.finish_node();
    }

    /// LocalName = IDENT ('<' IDENT '>')?
    fn parse_local_name(&mut self) {
        self.start_node(SyntaxKind::LOCAL_NAME);
        self.expect(SyntaxKind::IDENT);
        if self.at(SyntaxKind::LT) {
            self.start_node(SyntaxKind::ATTRIB);
            self.bump();
            self.expect(SyntaxKind::IDENT);
            self.expect(SyntaxKind::GT);
            self.finish_node();
        }
        self.finish_node();
    }

    /// LocalFunctionStmt = 'local' 'function' IDENT FunctionBody
    fn parse_local_function(&mut self) {
        self.start_node(SyntaxKind::LOCAL_FUNCTION_STMT);
        self.bump();
        self.bump();
        self.expect(SyntaxKind::IDENT);
        self.parse_function_body();
        self.finish_node();
    }

    /// FunctionStmt = 'function' FunctionName FunctionBody
    fn parse_function_stmt(&mut self) {
        self.start_node(SyntaxKind::FUNCTION_STMT);
        self.bump();

        self.start_node(SyntaxKind::FUNCTION_NAME);
        self.expect(SyntaxKind::IDENT);
        while self.at(SyntaxKind::DOT) {
            self.bump();
            self.expect(SyntaxKind::IDENT);
        }
        if self.eat(SyntaxKind::COLON) {
            self.expect(SyntaxKind::IDENT);
        }
        self.finish_node();

        self.parse_function_body();
        self.finish_node();
    }

    /// FunctionBody = ParamList Block 'end'
    fn parse_function_body(&mut self) {
        self.parse_param_list();
        self.parse_block();
        self.expect(SyntaxKind::END_KW);
    }

    /// ParamList = '(' (IDENT (',' IDENT)* (',' '...')? | '...')? ')'
    fn parse_param_list(&mut self) {
        self.start_node(SyntaxKind::PARAM_LIST);
        if self.expect(SyntaxKind::L_PAREN) {
            if !self.at(SyntaxKind::R_PAREN) {
                loop {
                    if self.eat(SyntaxKind::DOT_DOT_DOT) {
                        break;
                    }
                    if !self.expect(SyntaxKind::IDENT) || !self.eat(SyntaxKind::COMMA) {
                        break;
                    }
                }
            }
            self.expect(SyntaxKind::R_PAREN);
        }
        self.finish_node();
    }

    /// IfStmt = 'if' Expr 'then' Block ElseifClause* ElseClause? 'end'
    fn parse_if(&mut self) {
        self.start_node(SyntaxKind::IF_STMT);
        self.bump();
        self.parse_expr();
        self.expect(SyntaxKind::THEN_KW);
        self.parse_block();
        while self.at(SyntaxKind::ELSEIF_KW) {
            self.start_node(SyntaxKind::ELSEIF_CLAUSE);
            self.bump();
            self.parse_expr();
            self.expect(SyntaxKind::THEN_KW);
            self.parse_block();
            self.finish_node();
        }
        if self.at(SyntaxKind::ELSE_KW) {
            self.start_node(SyntaxKind::ELSE_CLAUSE);
            self.bump();
            self.parse_block();
            self.finish_node();
        }
        self.expect(SyntaxKind::END_KW);
        self.finish_node();
    }

    fn parse_while(&mut self) {
        self.start_node(SyntaxKind::WHILE_STMT);
        self.bump();
        self.parse_expr();
        self.expect(SyntaxKind::DO_KW);
        self.parse_block();
        self.expect(SyntaxKind::END_KW);
        self.finish_node();
    }

    fn parse_do(&mut self) {
        self.start_node(SyntaxKind::DO_STMT);
        self.bump();
        self.parse_block();
        self.expect(SyntaxKind::END_KW);
        self.finish_node();
    }

    fn parse_repeat(&mut self) {
        self.start_node(SyntaxKind::REPEAT_STMT);
        self.bump();
        self.parse_block();
        self.expect(SyntaxKind::UNTIL_KW);
        self.parse_expr();
        self.finish_node();
    }

    /// NumericFor = 'for' IDENT '=' Expr ',' Expr (',' Expr)? 'do' Block 'end'
    /// GenericFor = 'for' NameList 'in' ExprList 'do' Block 'end'
    fn parse_for(&mut self) {
        if self.nth(2) == SyntaxKind::EQ {
            self.start_node(SyntaxKind::NUMERIC_FOR_STMT);
            self.bump();
            self.expect(SyntaxKind::IDENT);
            self.expect(SyntaxKind::EQ);
            self.parse_expr();
            self.expect(SyntaxKind::COMMA);
            self.parse_expr();
            if self.eat(SyntaxKind::COMMA) {
                self.parse_expr();
            }
        } else {
            self.start_node(SyntaxKind::GENERIC_FOR_STMT);
            self.bump();
            self.start_node(SyntaxKind::NAME_LIST);
            self.expect(SyntaxKind::IDENT);
            while self.eat(SyntaxKind::COMMA) {
                self.expect(SyntaxKind::IDENT);
            }
            self.finish_node();
            self.expect(SyntaxKind::IN_KW);
            self.parse_expr_list();
        }
        self.expect(SyntaxKind::DO_KW);
        self.parse_block();
        self.expect(SyntaxKind::END_KW);
        self.finish_node();
    }

    /// ReturnStmt = 'return' ExprList? ';'?
    fn parse_return(&mut self) {
        self.start_node(SyntaxKind::RETURN_STMT);
        self.bump();
        if !self.at_block_end() && !self.at(SyntaxKind::SEMICOLON) {
            self.parse_expr_list();
        }
        self.eat(SyntaxKind::SEMICOLON);
        self.finish_node();
    }

    /// AssignStmt = TargetList '=' ExprList
    /// CallStmt = CallExpr | MethodCallExpr
    fn parse_expr_stmt(&mut self) {
        let checkpoint = self.checkpoint();
        let is_call = self.parse_suffixed_expr();
        if self.at(SyntaxKind::EQ) || self.at(SyntaxKind::COMMA) {
            self.start_node_at(checkpoint, SyntaxKind::ASSIGN_STMT);
            self.start_node_at(checkpoint, SyntaxKind::TARGET_LIST);
            while self.eat(SyntaxKind::COMMA) {
                self.parse_suffixed_expr();
            }
            self.finish_node();
            self.expect(SyntaxKind::EQ);
            self.parse_expr_list();
            self.finish_node();
        } else if is_call {
            self.start_node_at(checkpoint, SyntaxKind::CALL_STMT);
            self.finish_node();
        } else {
            self.error(format!("syntax error near {}", self.near()));
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn parse_expr_list(&mut self) {
        self.start_node(SyntaxKind::EXPR_LIST);
        self.parse_expr();
        while self.eat(SyntaxKind::COMMA) {
            self.parse_expr();
        }
        self.finish_node();
    }

    fn parse_expr(&mut self) {
        self.parse_sub_expr(0);
    }

    /// Precedence climbing over binary operators stronger than `limit`.
    fn parse_sub_expr(&mut self, limit: u8) {
        if !self.enter() {
            return;
        }
        let checkpoint = self.checkpoint();
        if is_unary_op(self.current_kind()) && !self.at_eof() {
            self.start_node(SyntaxKind::UNARY_EXPR);
            self.bump();
            self.parse_sub_expr(UNARY_PRIORITY);
            self.finish_node();
        } else {
            self.parse_simple_expr();
        }

        while let Some((left, right)) = binary_priority(self.current_kind()) {
            if left <= limit || self.at_eof() {
                break;
            }
            self.start_node_at(checkpoint, SyntaxKind::BINARY_EXPR);
            self.bump();
            self.parse_sub_expr(right);
            self.finish_node();
        }
        self.leave();
    }

    fn parse_simple_expr(&mut self) {
        if self.at_eof() {
            self.error("unexpected symbol near <eof>");
            return;
        }
        match self.current_kind() {
            kind if kind.is_literal() => {
                self.start_node(SyntaxKind::LITERAL);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::DOT_DOT_DOT => {
                self.start_node(SyntaxKind::VARARG_EXPR);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::L_BRACE => self.parse_table(),
            SyntaxKind::FUNCTION_KW => {
                self.start_node(SyntaxKind::FUNCTION_EXPR);
                self.bump();
                self.parse_function_body();
                self.finish_node();
            }
            _ => {
                self.parse_suffixed_expr();
            }
        }
    }

    /// PrimaryExpr followed by field, index, and call suffixes.
    ///
    /// Returns true when the last suffix was a call.
    fn parse_suffixed_expr(&mut self) -> bool {
        let checkpoint = self.checkpoint();
        match self.current_kind() {
            SyntaxKind::IDENT if !self.at_eof() => {
                self.start_node(SyntaxKind::NAME_REF);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::L_PAREN if !self.at_eof() => {
                self.start_node(SyntaxKind::PAREN_EXPR);
                self.bump();
                self.parse_expr();
                self.expect(SyntaxKind::R_PAREN);
                self.finish_node();
            }
            _ => {
                self.error(format!("unexpected symbol near {}", self.near()));
                return false;
            }
        }

        let mut is_call = false;
        while !self.at_eof() {
            match self.current_kind() {
                SyntaxKind::DOT => {
                    self.start_node_at(checkpoint, SyntaxKind::FIELD_EXPR);
                    self.bump();
                    self.expect(SyntaxKind::IDENT);
                    self.finish_node();
                    is_call = false;
                }
                SyntaxKind::L_BRACKET => {
                    self.start_node_at(checkpoint, SyntaxKind::INDEX_EXPR);
                    self.bump();
                    self.parse_expr();
                    self.expect(SyntaxKind::R_BRACKET);
                    self.finish_node();
                    is_call = false;
                }
                SyntaxKind::COLON => {
                    self.start_node_at(checkpoint, SyntaxKind::METHOD_CALL_EXPR);
                    self.bump();
                    self.expect(SyntaxKind::IDENT);
                    self.parse_call_args();
                    self.finish_node();
                    is_call = true;
                }
                SyntaxKind::L_PAREN
                | SyntaxKind::STRING
                | SyntaxKind::LONG_STRING
                | SyntaxKind::L_BRACE => {
                    self.start_node_at(checkpoint, SyntaxKind::CALL_EXPR);
                    self.parse_call_args();
                    self.finish_node();
                    is_call = true;
                }
                _ => break,
            }
        }
        is_call
    }

    /// ArgList = '(' ExprList? ')' | TableExpr | STRING
    fn parse_call_args(&mut self) {
        self.start_node(SyntaxKind::ARG_LIST);
        match self.current_kind() {
            _ if self.at_eof() => {
                self.error("function arguments expected near <eof>");
            }
            SyntaxKind::L_PAREN => {
                self.bump();
                if !self.at(SyntaxKind::R_PAREN) {
                    self.parse_expr();
                    while self.eat(SyntaxKind::COMMA) {
                        self.parse_expr();
                    }
                }
                self.expect(SyntaxKind::R_PAREN);
            }
            SyntaxKind::L_BRACE => self.parse_table(),
            SyntaxKind::STRING | SyntaxKind::LONG_STRING => {
                self.start_node(SyntaxKind::LITERAL);
                self.bump();
                self.finish_node();
            }
            _ => {
                self.error(format!("function arguments expected near {}", self.near()));
            }
        }
        self.finish_node();
    }

    /// TableExpr = '{' (Field ((',' | ';') Field)* (',' | ';')?)? '}'
    fn parse_table(&mut self) {
        self.start_node(SyntaxKind::TABLE_EXPR);
        self.bump();
        while !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
            self.parse_field();
            if !self.eat(SyntaxKind::COMMA) && !self.eat(SyntaxKind::SEMICOLON) {
                break;
            }
        }
        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    fn parse_field(&mut self) {
        match self.current_kind() {
            SyntaxKind::L_BRACKET => {
                self.start_node(SyntaxKind::INDEXED_FIELD);
                self.bump();
                self.parse_expr();
                self.expect(SyntaxKind::R_BRACKET);
                self.expect(SyntaxKind::EQ);
                self.parse_expr();
                self.finish_node();
            }
            SyntaxKind::IDENT if self.nth(1) == SyntaxKind::EQ => {
                self.start_node(SyntaxKind::NAMED_FIELD);
                self.bump();
                self.bump();
                self.parse_expr();
                self.finish_node();
            }
            _ => {
                self.start_node(SyntaxKind::POSITIONAL_FIELD);
                self.parse_expr();
                self.finish_node();
            }
        }
    }
}
