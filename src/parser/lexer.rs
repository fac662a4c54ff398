//! Logos-based lexer for Lua
//!
//! Fast tokenization using the logos crate. Long brackets (`[[ ]]`,
//! `--[==[ ]==]`) need to match their opening level and are finished in
//! callbacks.

use super::syntax_kind::SyntaxKind;
use logos::Logos;
use rowan::TextSize;

/// One lexeme: kind, source slice and start offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
}

/// Streams [`Token`]s, including trivia, over a source string.
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    /// A leading `#!` line, emitted as a comment before anything else.
    shebang: Option<&'a str>,
    offset: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        let shebang = input
            .starts_with("#!")
            .then(|| &input[..input.find('\n').unwrap_or(input.len())]);
        let rest = &input[shebang.map_or(0, str::len)..];
        Self {
            inner: LogosToken::lexer(rest),
            shebang,
            offset: 0,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(text) = self.shebang.take() {
            self.offset += text.len() as u32;
            return Some(Token {
                kind: SyntaxKind::COMMENT,
                text,
                offset: TextSize::new(0),
            });
        }

        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::new(self.offset);
        self.offset += text.len() as u32;

        let kind = match logos_token {
            Ok(t) => t.into(),
            Err(()) => SyntaxKind::ERROR,
        };

        Some(Token { kind, text, offset })
    }
}

/// Lex all of `input` eagerly.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Line (`-- x`) or long (`--[[ x ]]`) comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    Line,
    Long,
}

/// Level of a long-bracket opener (`[[` is 0, `[==[` is 2) at the start of `s`.
fn long_bracket_level(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    if bytes.first() != Some(&b'[') {
        return None;
    }
    let level = bytes[1..].iter().take_while(|&&b| b == b'=').count();
    (bytes.get(level + 1) == Some(&b'[')).then_some(level)
}

/// Byte length up to and including the long-bracket closer of `level`.
fn long_bracket_close(s: &str, level: usize) -> Option<usize> {
    let close = format!("]{}]", "=".repeat(level));
    s.find(&close).map(|at| at + close.len())
}

fn lex_comment(lex: &mut logos::Lexer<LogosToken>) -> Option<CommentStyle> {
    let rest = lex.remainder();
    if let Some(level) = long_bracket_level(rest) {
        let open = level + 2;
        let close = long_bracket_close(&rest[open..], level)?;
        lex.bump(open + close);
        return Some(CommentStyle::Long);
    }
    lex.bump(rest.find('\n').unwrap_or(rest.len()));
    Some(CommentStyle::Line)
}

fn lex_long_string(lex: &mut logos::Lexer<LogosToken>) -> bool {
    let level = lex.slice().len() - 2;
    match long_bracket_close(lex.remainder(), level) {
        Some(close) => {
            lex.bump(close);
            true
        }
        None => false,
    }
}

/// Raw logos tokens; converted to [`SyntaxKind`] right after lexing.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[token("--", lex_comment)]
    Comment(CommentStyle),

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[regex(r"[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"0[xX][0-9a-fA-F]*(\.[0-9a-fA-F]*)?([pP][+-]?[0-9]+)?")]
    Number,

    #[regex(r#""([^"\\\n]|\\[^\n]|\\\n)*""#)]
    #[regex(r#"'([^'\\\n]|\\[^\n]|\\\n)*'"#)]
    String,

    #[regex(r"\[=*\[", lex_long_string)]
    LongString,

    // =========================================================================
    // MULTI-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("...")]
    DotDotDot,
    #[token("..")]
    DotDot,
    #[token("::")]
    ColonColon,
    #[token("//")]
    SlashSlash,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("==")]
    EqEq,
    #[token("~=")]
    TildeEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,

    // =========================================================================
    // SINGLE-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("^")]
    Caret,
    #[token("#")]
    Hash,
    #[token("&")]
    Amp,
    #[token("~")]
    Tilde,
    #[token("|")]
    Pipe,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("=")]
    Eq,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    #[token("and")]
    AndKw,
    #[token("break")]
    BreakKw,
    #[token("do")]
    DoKw,
    #[token("else")]
    ElseKw,
    #[token("elseif")]
    ElseifKw,
    #[token("end")]
    EndKw,
    #[token("false")]
    FalseKw,
    #[token("for")]
    ForKw,
    #[token("function")]
    FunctionKw,
    #[token("goto")]
    GotoKw,
    #[token("if")]
    IfKw,
    #[token("in")]
    InKw,
    #[token("local")]
    LocalKw,
    #[token("nil")]
    NilKw,
    #[token("not")]
    NotKw,
    #[token("or")]
    OrKw,
    #[token("repeat")]
    RepeatKw,
    #[token("return")]
    ReturnKw,
    #[token("then")]
    ThenKw,
    #[token("true")]
    TrueKw,
    #[token("until")]
    UntilKw,
    #[token("while")]
    WhileKw,
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        match token {
            LogosToken::Whitespace => SyntaxKind::WHITESPACE,
            LogosToken::Comment(CommentStyle::Line) => SyntaxKind::COMMENT,
            LogosToken::Comment(CommentStyle::Long) => SyntaxKind::LONG_COMMENT,

            LogosToken::Ident => SyntaxKind::IDENT,
            LogosToken::Number => SyntaxKind::NUMBER,
            LogosToken::String => SyntaxKind::STRING,
            LogosToken::LongString => SyntaxKind::LONG_STRING,

            LogosToken::DotDotDot => SyntaxKind::DOT_DOT_DOT,
            LogosToken::DotDot => SyntaxKind::DOT_DOT,
            LogosToken::ColonColon => SyntaxKind::COLON_COLON,
            LogosToken::SlashSlash => SyntaxKind::SLASH_SLASH,
            LogosToken::Shl => SyntaxKind::SHL,
            LogosToken::Shr => SyntaxKind::SHR,
            LogosToken::EqEq => SyntaxKind::EQ_EQ,
            LogosToken::TildeEq => SyntaxKind::TILDE_EQ,
            LogosToken::LtEq => SyntaxKind::LT_EQ,
            LogosToken::GtEq => SyntaxKind::GT_EQ,

            LogosToken::Plus => SyntaxKind::PLUS,
            LogosToken::Minus => SyntaxKind::MINUS,
            LogosToken::Star => SyntaxKind::STAR,
            LogosToken::Slash => SyntaxKind::SLASH,
            LogosToken::Percent => SyntaxKind::PERCENT,
            LogosToken::Caret => SyntaxKind::CARET,
            LogosToken::Hash => SyntaxKind::HASH,
            LogosToken::Amp => SyntaxKind::AMP,
            LogosToken::Tilde => SyntaxKind::TILDE,
            LogosToken::Pipe => SyntaxKind::PIPE,
            LogosToken::Lt => SyntaxKind::LT,
            LogosToken::Gt => SyntaxKind::GT,
            LogosToken::Eq => SyntaxKind::EQ,
            LogosToken::LParen => SyntaxKind::L_PAREN,
            LogosToken::RParen => SyntaxKind::R_PAREN,
            LogosToken::LBrace => SyntaxKind::L_BRACE,
            LogosToken::RBrace => SyntaxKind::R_BRACE,
            LogosToken::LBracket => SyntaxKind::L_BRACKET,
            LogosToken::RBracket => SyntaxKind::R_BRACKET,
            LogosToken::Semicolon => SyntaxKind::SEMICOLON,
            LogosToken::Colon => SyntaxKind::COLON,
            LogosToken::Comma => SyntaxKind::COMMA,
            LogosToken::Dot => SyntaxKind::DOT,

            LogosToken::AndKw => SyntaxKind::AND_KW,
            LogosToken::BreakKw => SyntaxKind::BREAK_KW,
            LogosToken::DoKw => SyntaxKind::DO_KW,
            LogosToken::ElseKw => SyntaxKind::ELSE_KW,
            LogosToken::ElseifKw => SyntaxKind::ELSEIF_KW,
            LogosToken::EndKw => SyntaxKind::END_KW,
            LogosToken::FalseKw => SyntaxKind::FALSE_KW,
            LogosToken::ForKw => SyntaxKind::FOR_KW,
            LogosToken::FunctionKw => SyntaxKind::FUNCTION_KW,
            LogosToken::GotoKw => SyntaxKind::GOTO_KW,
            LogosToken::IfKw => SyntaxKind::IF_KW,
            LogosToken::InKw => SyntaxKind::IN_KW,
            LogosToken::LocalKw => SyntaxKind::LOCAL_KW,
            LogosToken::NilKw => SyntaxKind::NIL_KW,
            LogosToken::NotKw => SyntaxKind::NOT_KW,
            LogosToken::OrKw => SyntaxKind::OR_KW,
            LogosToken::RepeatKw => SyntaxKind::REPEAT_KW,
            LogosToken::ReturnKw => SyntaxKind::RETURN_KW,
            LogosToken::ThenKw => SyntaxKind::THEN_KW,
            LogosToken::TrueKw => SyntaxKind::TRUE_KW,
            LogosToken::UntilKw => SyntaxKind::UNTIL_KW,
            LogosToken::WhileKw => SyntaxKind::WHILE_KW,
        }
    }
}
