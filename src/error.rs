//! Failure values for lexing and parsing
//!
//! Failures are plain data. They are returned through `Result`, threaded
//! upward by every combinator, and carry enough context to be reported without
//! looking at any lexer or parser state again.

use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

use crate::lexer::{Position, Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexFailureKind {
    UnexpectedCharacter,
    UnterminatedComment,
}

impl fmt::Display for LexFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexFailureKind::UnexpectedCharacter => f.write_str("unexpected character"),
            LexFailureKind::UnterminatedComment => f.write_str("unterminated block comment"),
        }
    }
}

/// No token pattern accepts the input at `position`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("lex error at {position}: {}", lex_message(.kind, .found))]
pub struct LexFailure {
    pub position: Position,
    pub found: char,
    pub kind: LexFailureKind,
}

impl LexFailure {
    pub fn new(position: Position, found: char, kind: LexFailureKind) -> Self {
        Self {
            position,
            found,
            kind,
        }
    }
}

fn lex_message(kind: &LexFailureKind, found: &char) -> String {
    match kind {
        LexFailureKind::UnexpectedCharacter => format!("{kind} {found:?}"),
        LexFailureKind::UnterminatedComment => kind.to_string(),
    }
}

/// Something a parser wanted to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Expected {
    Token(TokenKind),
    Label(&'static str),
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Token(kind) => write!(f, "{kind}"),
            Expected::Label(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseFailureKind {
    /// The current token is not one of `expected`.
    UnexpectedToken,
    /// A literal token whose text cannot be converted to a value.
    InvalidLiteral,
    /// Nesting went deeper than `max_depth`.
    MaxDepthExceeded,
    /// A rule looked further ahead than `lookahead_depth` allows.
    LookaheadExceeded,
    /// `advance` at end of input under `AdvancePolicy::Fail`.
    AdvancePastEnd,
}

/// The token stream does not match the grammar.
///
/// `index` is the token index the failure refers to; comparing it is how the
/// deepest of several failures is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse error at {position}: {}", describe(.kind, .expected, .found))]
pub struct ParseFailure {
    pub position: Position,
    pub index: usize,
    pub expected: BTreeSet<Expected>,
    pub found: TokenKind,
    pub kind: ParseFailureKind,
}

fn describe(kind: &ParseFailureKind, expected: &BTreeSet<Expected>, found: &TokenKind) -> String {
    match kind {
        ParseFailureKind::UnexpectedToken if expected.is_empty() => {
            format!("unexpected {found}")
        }
        ParseFailureKind::UnexpectedToken => {
            let expected = expected
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" or ");
            format!("expected {expected}, found {found}")
        }
        ParseFailureKind::InvalidLiteral => format!("invalid {found} literal"),
        ParseFailureKind::MaxDepthExceeded => "maximum nesting depth exceeded".to_string(),
        ParseFailureKind::LookaheadExceeded => "lookahead depth exceeded".to_string(),
        ParseFailureKind::AdvancePastEnd => "advanced past end of input".to_string(),
    }
}

impl ParseFailure {
    pub fn new(kind: ParseFailureKind, token: &Token, index: usize) -> Self {
        Self {
            position: token.pos(),
            index,
            expected: BTreeSet::new(),
            found: token.kind,
            kind,
        }
    }

    pub fn unexpected(token: &Token, index: usize, expected: Expected) -> Self {
        Self::new(ParseFailureKind::UnexpectedToken, token, index).expecting(expected)
    }

    pub fn expecting(mut self, expected: Expected) -> Self {
        self.expected.insert(expected);
        self
    }

    /// Combine two failures, keeping the one that got further.
    ///
    /// At equal depth the expected sets are united. `self` keeps its kind
    /// unless it is the generic `UnexpectedToken`.
    pub fn merge(mut self, other: ParseFailure) -> ParseFailure {
        if other.index > self.index {
            return other;
        }
        if other.index == self.index {
            if self.kind == ParseFailureKind::UnexpectedToken {
                self.kind = other.kind;
            }
            self.expected.extend(other.expected);
        }
        self
    }

    pub fn merge_with(self, other: Option<&ParseFailure>) -> ParseFailure {
        match other {
            Some(other) => self.merge(other.clone()),
            None => self,
        }
    }

    pub fn expects(&self, kind: TokenKind) -> bool {
        self.expected.contains(&Expected::Token(kind))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Lex,
    Parse,
}

/// What was actually in the input where a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Found {
    Token(TokenKind),
    Character(char),
}

/// Any failure the front end can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Failure {
    #[error(transparent)]
    Lex(#[from] LexFailure),
    #[error(transparent)]
    Parse(#[from] ParseFailure),
}

impl Failure {
    pub fn kind(&self) -> FailureKind {
        match self {
            Failure::Lex(_) => FailureKind::Lex,
            Failure::Parse(_) => FailureKind::Parse,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Failure::Lex(err) => err.position,
            Failure::Parse(err) => err.position,
        }
    }

    /// Empty for lex failures.
    pub fn expected(&self) -> BTreeSet<Expected> {
        match self {
            Failure::Lex(_) => BTreeSet::new(),
            Failure::Parse(err) => err.expected.clone(),
        }
    }

    pub fn found(&self) -> Found {
        match self {
            Failure::Lex(err) => Found::Character(err.found),
            Failure::Parse(err) => Found::Token(err.found),
        }
    }
}
