use std::rc::Rc;

use crate::config::{AdvancePolicy, FailureSelection, ParseConfig};
use crate::error::{Expected, LexFailure, ParseFailure, ParseFailureKind};
use crate::lexer::{Position, Span, Token, TokenKind, tokenize};

/// Immutable read position over a tokenized input.
///
/// Cloning is cheap: the token sequence, the trivia and the configuration are
/// shared, and only the read position, nesting depth and diagnostic record
/// are per value. Nothing ever mutates a stream; [`TokenStream::advance`] and
/// friends return new ones.
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Rc<[Token]>,
    trivia: Rc<[Token]>,
    config: Rc<ParseConfig>,
    position: usize,
    depth: usize,
    furthest: Option<Rc<ParseFailure>>,
}

impl TokenStream {
    /// Build a stream from tokenizer output.
    ///
    /// Trivia is moved aside into [`TokenStream::trivia`]. A missing `Eof`
    /// sentinel is appended, so the sequence always ends with exactly one.
    pub fn new(tokens: Vec<Token>, config: ParseConfig) -> Self {
        let (trivia, mut significant): (Vec<Token>, Vec<Token>) =
            tokens.into_iter().partition(|t| t.kind.is_trivia());

        let eof = significant
            .iter()
            .find(|t| t.is(TokenKind::Eof))
            .cloned()
            .unwrap_or_else(|| {
                let end = significant
                    .last()
                    .into_iter()
                    .chain(trivia.last())
                    .map(|t| t.span.end)
                    .max()
                    .unwrap_or_default();
                Token::new(TokenKind::Eof, "", Span::new(end, end))
            });
        significant.retain(|t| !t.is(TokenKind::Eof));
        significant.push(eof);

        Self {
            tokens: significant.into(),
            trivia: trivia.into(),
            config: Rc::new(config),
            position: 0,
            depth: 0,
            furthest: None,
        }
    }

    /// Tokenize `source` and wrap the result.
    pub fn from_source(source: &str, config: ParseConfig) -> Result<Self, LexFailure> {
        let tokens = tokenize(source, &config)?;
        Ok(Self::new(tokens, config))
    }

    fn eof_index(&self) -> usize {
        self.tokens.len() - 1
    }

    /// The token `k` places ahead, or the `Eof` sentinel past the end.
    pub fn peek(&self, k: usize) -> &Token {
        let index = self.position.saturating_add(k).min(self.eof_index());
        &self.tokens[index]
    }

    /// Like [`TokenStream::peek`], but refuses to look beyond the configured
    /// lookahead depth.
    pub fn lookahead(&self, k: usize) -> Result<&Token, ParseFailure> {
        if k >= self.config.lookahead_depth {
            return Err(self.fail(ParseFailureKind::LookaheadExceeded));
        }
        Ok(self.peek(k))
    }

    /// Whether the lookahead token `k` places ahead has the given kind.
    pub fn peek_is(&self, k: usize, kind: TokenKind) -> Result<bool, ParseFailure> {
        Ok(self.lookahead(k)?.is(kind))
    }

    pub fn current(&self) -> &Token {
        self.peek(0)
    }

    /// The stream one token further on.
    pub fn advance(&self) -> Result<TokenStream, ParseFailure> {
        if self.at_end() {
            return match self.config.advance_past_end {
                AdvancePolicy::Saturate => Ok(self.clone()),
                AdvancePolicy::Fail => Err(self.fail(ParseFailureKind::AdvancePastEnd)),
            };
        }
        Ok(Self {
            position: self.position + 1,
            ..self.clone()
        })
    }

    pub fn at_end(&self) -> bool {
        self.position >= self.eof_index()
    }

    /// Index of the current token.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Source position of the current token.
    pub fn current_position(&self) -> Position {
        self.current().pos()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn config(&self) -> &ParseConfig {
        &self.config
    }

    /// All significant tokens, ending with `Eof`.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Tokens not yet consumed, ending with `Eof`.
    pub fn remaining(&self) -> &[Token] {
        &self.tokens[self.position.min(self.eof_index())..]
    }

    /// Whitespace and comment tokens, when tokenized with `emit_trivia`.
    pub fn trivia(&self) -> &[Token] {
        &self.trivia
    }

    /// The deepest failure recorded by an abandoned attempt.
    ///
    /// Diagnostic state only. It feeds the content of later failures and
    /// never decides which branch succeeds, what a rule returns, or where
    /// parsing resumes. Position, tokens and depth are the stream's identity;
    /// this record is not part of it.
    pub fn furthest(&self) -> Option<&ParseFailure> {
        self.furthest.as_deref()
    }

    /// The stream one nesting level deeper, or a failure past `max_depth`.
    pub fn descend(&self) -> Result<TokenStream, ParseFailure> {
        let depth = self.depth + 1;
        if self.config.max_depth.is_some_and(|max| depth > max) {
            return Err(self.fail(ParseFailureKind::MaxDepthExceeded));
        }
        Ok(Self {
            depth,
            ..self.clone()
        })
    }

    pub fn with_depth(&self, depth: usize) -> TokenStream {
        Self {
            depth,
            ..self.clone()
        }
    }

    /// Record a failure from a speculative attempt that was given up.
    ///
    /// Only failures at least as deep as the current record are kept. With
    /// `FailureSelection::First` nothing is recorded.
    pub fn with_abandoned(&self, failure: ParseFailure) -> TokenStream {
        if self.config.failure_selection == FailureSelection::First {
            return self.clone();
        }
        let merged = match self.furthest() {
            Some(current) if current.index > failure.index => return self.clone(),
            Some(current) => failure.merge(current.clone()),
            None => failure,
        };
        Self {
            furthest: Some(Rc::new(merged)),
            ..self.clone()
        }
    }

    fn merge_recorded(&self, failure: ParseFailure) -> ParseFailure {
        match self.config.failure_selection {
            FailureSelection::Furthest => failure.merge_with(self.furthest()),
            FailureSelection::First => failure,
        }
    }

    /// A failure of the given kind at the current token.
    pub fn fail(&self, kind: ParseFailureKind) -> ParseFailure {
        self.merge_recorded(ParseFailure::new(kind, self.current(), self.position))
    }

    /// An "expected X, found Y" failure at the current token.
    pub fn expected(&self, expected: Expected) -> ParseFailure {
        self.merge_recorded(ParseFailure::unexpected(
            self.current(),
            self.position,
            expected,
        ))
    }
}
