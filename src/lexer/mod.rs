//! Tokenization over immutable cursors
//!
//! The lexer never owns a mutable read position. A [`Cursor`] is a value
//! describing where in the source we are, and [`tokenize_next`] maps one cursor
//! to the next token plus a fresh cursor positioned after it.

mod cursor;
mod tokenizer;

use std::fmt;

pub use cursor::Cursor;
pub use tokenizer::{peek_char, tokenize, tokenize_next};

/// A location in the source text.
///
/// `offset` counts characters, not bytes. `line` and `column` are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn start() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Half-open range of source positions covered by a token or node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn merge(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenKind {
    Integer,
    Ident,
    Let,
    Return,
    Fn,
    If,
    Else,
    True,
    False,
    Assign,
    Eq,
    NotEq,
    Bang,
    Plus,
    Minus,
    Star,
    Slash,
    Lt,
    Gt,
    Comma,
    Semicolon,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Whitespace,
    Comment,
    Eof,
}

impl TokenKind {
    /// Whitespace and comments. Never seen by the parser.
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Comment)
    }

    /// Returns a human-readable description of the token kind
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Integer => "integer",
            TokenKind::Ident => "identifier",
            TokenKind::Let => "'let'",
            TokenKind::Return => "'return'",
            TokenKind::Fn => "'fn'",
            TokenKind::If => "'if'",
            TokenKind::Else => "'else'",
            TokenKind::True => "'true'",
            TokenKind::False => "'false'",
            TokenKind::Assign => "'='",
            TokenKind::Eq => "'=='",
            TokenKind::NotEq => "'!='",
            TokenKind::Bang => "'!'",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Lt => "'<'",
            TokenKind::Gt => "'>'",
            TokenKind::Comma => "','",
            TokenKind::Semicolon => "';'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Comment => "comment",
            TokenKind::Eof => "end of input",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn pos(&self) -> Position {
        self.span.start
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Integer | TokenKind::Ident => {
                write!(f, "{} '{}'", self.kind.describe(), self.lexeme)
            }
            kind => f.write_str(kind.describe()),
        }
    }
}
