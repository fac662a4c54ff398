//! Every token and node kind of the Lua CST.

/// Kind tag carried by each rowan element.
///
/// Token kinds come first, then composite node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    WHITESPACE = 0,
    COMMENT,      // -- to end of line, or a #! first line
    LONG_COMMENT, // --[[ ... ]] / --[==[ ... ]==]

    // =========================================================================
    // LITERALS
    // =========================================================================
    IDENT,
    NUMBER,
    STRING,      // "x" or 'x'
    LONG_STRING, // [[x]] / [==[x]==]

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    PLUS,        // +
    MINUS,       // -
    STAR,        // *
    SLASH,       // /
    SLASH_SLASH, // //
    PERCENT,     // %
    CARET,       // ^
    HASH,        // #
    AMP,         // &
    TILDE,       // ~
    PIPE,        // |
    SHL,         // <<
    SHR,         // >>
    EQ_EQ,       // ==
    TILDE_EQ,    // ~=
    LT_EQ,       // <=
    GT_EQ,       // >=
    LT,          // <
    GT,          // >
    EQ,          // =
    L_PAREN,     // (
    R_PAREN,     // )
    L_BRACE,     // {
    R_BRACE,     // }
    L_BRACKET,   // [
    R_BRACKET,   // ]
    COLON_COLON, // ::
    SEMICOLON,   // ;
    COLON,       // :
    COMMA,       // ,
    DOT,         // .
    DOT_DOT,     // ..
    DOT_DOT_DOT, // ...

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    AND_KW,
    BREAK_KW,
    DO_KW,
    ELSE_KW,
    ELSEIF_KW,
    END_KW,
    FALSE_KW,
    FOR_KW,
    FUNCTION_KW,
    GOTO_KW,
    IF_KW,
    IN_KW,
    LOCAL_KW,
    NIL_KW,
    NOT_KW,
    OR_KW,
    REPEAT_KW,
    RETURN_KW,
    THEN_KW,
    TRUE_KW,
    UNTIL_KW,
    WHILE_KW,

    // =========================================================================
    // NODES
    // =========================================================================
    SOURCE_FILE,
    BLOCK,

    // Statements
    LOCAL_STMT,
    LOCAL_FUNCTION_STMT,
    FUNCTION_STMT,
    ASSIGN_STMT,
    CALL_STMT,
    DO_STMT,
    WHILE_STMT,
    REPEAT_STMT,
    IF_STMT,
    NUMERIC_FOR_STMT,
    GENERIC_FOR_STMT,
    RETURN_STMT,
    BREAK_STMT,
    GOTO_STMT,
    LABEL_STMT,

    // Statement parts
    LOCAL_NAME,
    ATTRIB,
    TARGET_LIST,
    EXPR_LIST,
    NAME_LIST,
    ELSEIF_CLAUSE,
    ELSE_CLAUSE,
    FUNCTION_NAME,
    PARAM_LIST,

    // Expressions
    NAME_REF,
    LITERAL,
    VARARG_EXPR,
    FUNCTION_EXPR,
    TABLE_EXPR,
    NAMED_FIELD,
    INDEXED_FIELD,
    POSITIONAL_FIELD,
    BINARY_EXPR,
    UNARY_EXPR,
    PAREN_EXPR,
    FIELD_EXPR,
    INDEX_EXPR,
    CALL_EXPR,
    METHOD_CALL_EXPR,
    ARG_LIST,

    // Special
    ERROR,

    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Whitespace and comments.
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::COMMENT | Self::LONG_COMMENT)
    }

    /// Reserved words.
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::AND_KW as u16) && (self as u16) <= (Self::WHILE_KW as u16)
    }

    /// Operators and delimiters.
    pub fn is_punct(self) -> bool {
        (self as u16) >= (Self::PLUS as u16) && (self as u16) <= (Self::DOT_DOT_DOT as u16)
    }

    /// Number, string and `nil`/`true`/`false` tokens.
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            Self::NUMBER
                | Self::STRING
                | Self::LONG_STRING
                | Self::NIL_KW
                | Self::TRUE_KW
                | Self::FALSE_KW
        )
    }

    /// Check if this is a statement node
    pub fn is_statement(self) -> bool {
        (self as u16) >= (Self::LOCAL_STMT as u16) && (self as u16) <= (Self::LABEL_STMT as u16)
    }

    /// Check if this kind closes a block (`end`, `else`, `elseif`, `until`)
    pub fn is_block_end(self) -> bool {
        matches!(
            self,
            Self::END_KW | Self::ELSE_KW | Self::ELSEIF_KW | Self::UNTIL_KW
        )
    }

    /// Human-readable token description for error messages.
    pub fn describe(self) -> &'static str {
        match self {
            Self::IDENT => "identifier",
            Self::NUMBER => "number",
            Self::STRING | Self::LONG_STRING => "string",
            Self::PLUS => "'+'",
            Self::MINUS => "'-'",
            Self::STAR => "'*'",
            Self::SLASH => "'/'",
            Self::SLASH_SLASH => "'//'",
            Self::PERCENT => "'%'",
            Self::CARET => "'^'",
            Self::HASH => "'#'",
            Self::AMP => "'&'",
            Self::TILDE => "'~'",
            Self::PIPE => "'|'",
            Self::SHL => "'<<'",
            Self::SHR => "'>>'",
            Self::EQ_EQ => "'=='",
            Self::TILDE_EQ => "'~='",
            Self::LT_EQ => "'<='",
            Self::GT_EQ => "'>='",
            Self::LT => "'<'",
            Self::GT => "'>'",
            Self::EQ => "'='",
            Self::L_PAREN => "'('",
            Self::R_PAREN => "')'",
            Self::L_BRACE => "'{'",
            Self::R_BRACE => "'}'",
            Self::L_BRACKET => "'['",
            Self::R_BRACKET => "']'",
            Self::COLON_COLON => "'::'",
            Self::SEMICOLON => "';'",
            Self::COLON => "':'",
            Self::COMMA => "','",
            Self::DOT => "'.'",
            Self::DOT_DOT => "'..'",
            Self::DOT_DOT_DOT => "'...'",
            Self::AND_KW => "'and'",
            Self::BREAK_KW => "'break'",
            Self::DO_KW => "'do'",
            Self::ELSE_KW => "'else'",
            Self::ELSEIF_KW => "'elseif'",
            Self::END_KW => "'end'",
            Self::FALSE_KW => "'false'",
            Self::FOR_KW => "'for'",
            Self::FUNCTION_KW => "'function'",
            Self::GOTO_KW => "'goto'",
            Self::IF_KW => "'if'",
            Self::IN_KW => "'in'",
            Self::LOCAL_KW => "'local'",
            Self::NIL_KW => "'nil'",
            Self::NOT_KW => "'not'",
            Self::OR_KW => "'or'",
            Self::REPEAT_KW => "'repeat'",
            Self::RETURN_KW => "'return'",
            Self::THEN_KW => "'then'",
            Self::TRUE_KW => "'true'",
            Self::UNTIL_KW => "'until'",
            Self::WHILE_KW => "'while'",
            Self::ERROR => "unrecognized token",
            _ => "syntax",
        }
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // SAFETY: `SyntaxKind` is `repr(u16)` and `raw.0` was bounds-checked
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Marker type binding `SyntaxKind` to rowan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LuaLanguage {}

impl rowan::Language for LuaLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Rowan tree types specialised to Lua.
pub type SyntaxNode = rowan::SyntaxNode<LuaLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<LuaLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<LuaLanguage>;
