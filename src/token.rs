//! Token kinds and the metadata table the lexer matches against.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use smartstring::{LazyCompact, SmartString};

/// The backing storage for a token's lexeme. Most lexemes (identifiers,
/// numbers, operators) are short, so an inline-capable string avoids a heap
/// allocation per token.
pub type Lexeme = SmartString<LazyCompact>;

/// The closed set of lexical token kinds this language's lexer recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Keywords
    Fn,
    If,
    Else,
    While,
    For,
    Return,
    Break,
    Continue,
    Const,
    True,
    False,
    // Primitive type names
    I32,
    I64,
    F32,
    F64,
    Bool,
    // Identifiers and number literals
    Ident,
    IntLiteral,
    FloatLiteral,
    // Punctuation
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Semicolon,
    Colon,
    Arrow,
    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    Bang,
    EqEq,
    BangEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    AndAnd,
    OrOr,
    Assign,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    PlusPlus,
    MinusMinus,
    // Structural
    Comment,
    Eof,
    Unknown,
}

impl TokenKind {
    /// `true` for `i32`/`i64`/`f32`/`f64`/`bool`.
    pub fn is_primitive_type(self) -> bool {
        matches!(
            self,
            TokenKind::I32 | TokenKind::I64 | TokenKind::F32 | TokenKind::F64 | TokenKind::Bool
        )
    }

    /// `true` for the six assignment operator spellings (`=`, `+=`, `-=`,
    /// `*=`, `/=`, `%=`). Notably this does **not** include `==`: an
    /// earlier iteration of this lexer conflated the two, which silently
    /// turned every `==` comparison into an assignment. Keep this list
    /// exactly as written.
    pub fn is_assignment_op(self) -> bool {
        matches!(
            self,
            TokenKind::Assign
                | TokenKind::PlusEq
                | TokenKind::MinusEq
                | TokenKind::StarEq
                | TokenKind::SlashEq
                | TokenKind::PercentEq
        )
    }

    fn printable(self) -> &'static str {
        use TokenKind::*;
        match self {
            Fn => "FN",
            If => "IF",
            Else => "ELSE",
            While => "WHILE",
            For => "FOR",
            Return => "RETURN",
            Break => "BREAK",
            Continue => "CONTINUE",
            Const => "CONST",
            True => "TRUE",
            False => "FALSE",
            I32 => "I32",
            I64 => "I64",
            F32 => "F32",
            F64 => "F64",
            Bool => "BOOL",
            Ident => "IDENT",
            IntLiteral => "INT",
            FloatLiteral => "FLOAT",
            LParen => "LPAREN",
            RParen => "RPAREN",
            LBracket => "LBRACKET",
            RBracket => "RBRACKET",
            LBrace => "LBRACE",
            RBrace => "RBRACE",
            Comma => "COMMA",
            Semicolon => "SEMICOLON",
            Colon => "COLON",
            Arrow => "ARROW",
            Plus => "PLUS",
            Minus => "MINUS",
            Star => "STAR",
            Slash => "SLASH",
            Percent => "PERCENT",
            Amp => "AMP",
            Bang => "BANG",
            EqEq => "EQ_EQ",
            BangEq => "BANG_EQ",
            Lt => "LT",
            Gt => "GT",
            LtEq => "LT_EQ",
            GtEq => "GT_EQ",
            AndAnd => "AND_AND",
            OrOr => "OR_OR",
            Assign => "ASSIGN",
            PlusEq => "PLUS_EQ",
            MinusEq => "MINUS_EQ",
            StarEq => "STAR_EQ",
            SlashEq => "SLASH_EQ",
            PercentEq => "PERCENT_EQ",
            PlusPlus => "PLUS_PLUS",
            MinusMinus => "MINUS_MINUS",
            Comment => "COMMENT",
            Eof => "EOF",
            Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.printable())
    }
}

/// A lexical atom: its kind, the exact source text it spans, and its
/// 1-based line/column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: Lexeme,
    pub line: u32,
    pub column: u32,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<Lexeme>, line: u32, column: u32) -> Self {
        debug_assert!(line >= 1 && column >= 1);
        Token {
            kind,
            lexeme: lexeme.into(),
            line,
            column,
        }
    }

    pub fn eof(line: u32, column: u32) -> Self {
        Token::new(TokenKind::Eof, "", line, column)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.lexeme.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{} \"{}\"", self.kind, self.lexeme)
        }
    }
}

/// Fixed-spelling token kinds, longest-spelling-first is not required here:
/// the lexer itself picks the longest match among all entries that apply at
/// the cursor.
pub static LITERAL_TOKENS: &[(TokenKind, &str)] = &[
    // Keywords (identifier-shaped; subject to the identifier-boundary check).
    (TokenKind::Fn, "fn"),
    (TokenKind::If, "if"),
    (TokenKind::Else, "else"),
    (TokenKind::While, "while"),
    (TokenKind::For, "for"),
    (TokenKind::Return, "return"),
    (TokenKind::Break, "break"),
    (TokenKind::Continue, "continue"),
    (TokenKind::Const, "const"),
    (TokenKind::True, "true"),
    (TokenKind::False, "false"),
    (TokenKind::I32, "i32"),
    (TokenKind::I64, "i64"),
    (TokenKind::F32, "f32"),
    (TokenKind::F64, "f64"),
    (TokenKind::Bool, "bool"),
    // Punctuation
    (TokenKind::LParen, "("),
    (TokenKind::RParen, ")"),
    (TokenKind::LBracket, "["),
    (TokenKind::RBracket, "]"),
    (TokenKind::LBrace, "{"),
    (TokenKind::RBrace, "}"),
    (TokenKind::Comma, ","),
    (TokenKind::Semicolon, ";"),
    (TokenKind::Colon, ":"),
    (TokenKind::Arrow, "->"),
    // Operators, longest spellings first is purely cosmetic; matching picks
    // the longest regardless of table order.
    (TokenKind::PlusPlus, "++"),
    (TokenKind::MinusMinus, "--"),
    (TokenKind::PlusEq, "+="),
    (TokenKind::MinusEq, "-="),
    (TokenKind::StarEq, "*="),
    (TokenKind::SlashEq, "/="),
    (TokenKind::PercentEq, "%="),
    (TokenKind::EqEq, "=="),
    (TokenKind::BangEq, "!="),
    (TokenKind::LtEq, "<="),
    (TokenKind::GtEq, ">="),
    (TokenKind::AndAnd, "&&"),
    (TokenKind::OrOr, "||"),
    (TokenKind::Plus, "+"),
    (TokenKind::Minus, "-"),
    (TokenKind::Star, "*"),
    (TokenKind::Slash, "/"),
    (TokenKind::Percent, "%"),
    (TokenKind::Amp, "&"),
    (TokenKind::Bang, "!"),
    (TokenKind::Lt, "<"),
    (TokenKind::Gt, ">"),
    (TokenKind::Assign, "="),
];

/// Regex-backed token kinds, tried in this declaration order. Float must
/// precede Int so `3.14` lexes as one float token rather than an int
/// followed by a stray `.`.
pub static REGEX_TOKENS: Lazy<Vec<(TokenKind, Regex)>> = Lazy::new(|| {
    vec![
        (
            TokenKind::Ident,
            Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*").unwrap(),
        ),
        (
            TokenKind::FloatLiteral,
            Regex::new(r"^[0-9]+\.[0-9]+").unwrap(),
        ),
        (TokenKind::IntLiteral, Regex::new(r"^[0-9]+").unwrap()),
    ]
});

pub fn is_ident_start(byte: u8) -> bool {
    byte == b'_' || byte.is_ascii_alphabetic()
}

pub fn is_ident_continue(byte: u8) -> bool {
    byte == b'_' || byte.is_ascii_alphanumeric()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_ops_exclude_eq_eq() {
        assert!(!TokenKind::EqEq.is_assignment_op());
        assert!(TokenKind::Assign.is_assignment_op());
        assert!(TokenKind::PlusEq.is_assignment_op());
    }

    #[test]
    fn regex_tokens_try_float_before_int() {
        let (kind, re) = &REGEX_TOKENS[1];
        assert_eq!(*kind, TokenKind::FloatLiteral);
        assert!(re.find("3.14").is_some());
    }
}
