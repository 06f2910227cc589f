use std::collections::BTreeSet;
use std::ops::{Add, BitOr, Mul, Shr, Sub};
use std::rc::Rc;

use tracing::trace;

use crate::config::{FailureSelection, ParseConfig, TieBreak};
use crate::error::{Expected, ParseFailure, ParseFailureKind};
use crate::lexer::{Token, TokenKind};

use super::state::{ParseResult, Parser};
use super::stream::TokenStream;

type ParserFn<T> = Rc<dyn Fn(&TokenStream) -> ParseResult<T>>;

// === Boxed Parser for type erasure ===

pub struct BoxedParser<T> {
    parser: ParserFn<T>,
}

impl<T> Clone for BoxedParser<T> {
    fn clone(&self) -> Self {
        BoxedParser {
            parser: Rc::clone(&self.parser),
        }
    }
}

impl<T: 'static> BoxedParser<T> {
    pub fn new<P: Parser<T> + 'static>(parser: P) -> Self {
        BoxedParser {
            parser: Rc::new(move |input: &TokenStream| parser.parse(input)),
        }
    }
}

impl<T> Parser<T> for BoxedParser<T> {
    fn parse(&self, input: &TokenStream) -> ParseResult<T> {
        (self.parser)(input)
    }
}

// === Combinators as methods ===

impl<T: 'static> BoxedParser<T> {
    /// Sequence: parse self then other, return (T, U)
    pub fn seq<U: 'static>(self, other: BoxedParser<U>) -> BoxedParser<(T, U)> {
        BoxedParser::new(move |input: &TokenStream| {
            let (a, rest) = self.parse(input)?;
            let (b, rest) = other.parse(&rest)?;
            Ok(((a, b), rest))
        })
    }

    /// Keep left: parse self then other, discard other's result
    pub fn skip<U: 'static>(self, other: BoxedParser<U>) -> BoxedParser<T> {
        BoxedParser::new(move |input: &TokenStream| {
            let (a, rest) = self.parse(input)?;
            let (_, rest) = other.parse(&rest)?;
            Ok((a, rest))
        })
    }

    /// Keep right: parse self then other, discard self's result
    pub fn skip_left<U: 'static>(self, other: BoxedParser<U>) -> BoxedParser<U> {
        BoxedParser::new(move |input: &TokenStream| {
            let (_, rest) = self.parse(input)?;
            other.parse(&rest)
        })
    }

    /// Map: transform result
    pub fn map<U: 'static, F: Fn(T) -> U + 'static>(self, f: F) -> BoxedParser<U> {
        BoxedParser::new(move |input: &TokenStream| {
            let (a, rest) = self.parse(input)?;
            Ok((f(a), rest))
        })
    }

    /// Map with a fallible build step. A build error is reported at the
    /// position where this parser started.
    pub fn try_map<U: 'static, F: Fn(T) -> Result<U, ParseFailureKind> + 'static>(
        self,
        f: F,
    ) -> BoxedParser<U> {
        BoxedParser::new(move |input: &TokenStream| {
            let (a, rest) = self.parse(input)?;
            match f(a) {
                Ok(value) => Ok((value, rest)),
                Err(kind) => Err(input.fail(kind)),
            }
        })
    }

    /// Choice: try self, if fails try other
    pub fn or(self, other: BoxedParser<T>) -> BoxedParser<T> {
        alternative(vec![self, other])
    }

    /// Report failures that happen before anything was consumed as
    /// "expected `name`".
    pub fn label(self, name: &'static str) -> BoxedParser<T> {
        BoxedParser::new(move |input: &TokenStream| {
            self.parse(input).map_err(|mut err| {
                if err.index == input.position() {
                    err.expected = BTreeSet::from([Expected::Label(name)]);
                }
                err
            })
        })
    }
}

// === Operator Overloading ===

/// `+` for sequence: A + B -> (A, B)
impl<T: 'static, U: 'static> Add<BoxedParser<U>> for BoxedParser<T> {
    type Output = BoxedParser<(T, U)>;

    fn add(self, rhs: BoxedParser<U>) -> Self::Output {
        self.seq(rhs)
    }
}

/// `-` for keep left: A - B -> A (parse B, discard result)
impl<T: 'static, U: 'static> Sub<BoxedParser<U>> for BoxedParser<T> {
    type Output = BoxedParser<T>;

    fn sub(self, rhs: BoxedParser<U>) -> Self::Output {
        self.skip(rhs)
    }
}

/// `*` for keep right: A * B -> B (parse A, discard result)
impl<T: 'static, U: 'static> Mul<BoxedParser<U>> for BoxedParser<T> {
    type Output = BoxedParser<U>;

    fn mul(self, rhs: BoxedParser<U>) -> Self::Output {
        self.skip_left(rhs)
    }
}

/// `|` for choice: A | B -> A or B
impl<T: 'static> BitOr<BoxedParser<T>> for BoxedParser<T> {
    type Output = BoxedParser<T>;

    fn bitor(self, rhs: BoxedParser<T>) -> Self::Output {
        self.or(rhs)
    }
}

/// `>>` for map: A >> fn -> B
impl<T: 'static, U: 'static, F: Fn(T) -> U + 'static> Shr<F> for BoxedParser<T> {
    type Output = BoxedParser<U>;

    fn shr(self, f: F) -> Self::Output {
        self.map(f)
    }
}

// === Ordered choice ===

fn select_failure(
    current: Option<ParseFailure>,
    next: ParseFailure,
    config: &ParseConfig,
) -> ParseFailure {
    match (current, config.failure_selection) {
        (None, _) => next,
        (Some(first), FailureSelection::First) => first,
        (Some(current), FailureSelection::Furthest) => current.merge(next),
    }
}

fn abandon(rest: TokenStream, failure: Option<ParseFailure>) -> TokenStream {
    match failure {
        Some(failure) => rest.with_abandoned(failure),
        None => rest,
    }
}

/// Try every parser on the same input.
///
/// Under `TieBreak::FirstMatch` the first success wins. Under
/// `TieBreak::LongestParse` every branch runs and the success that consumed
/// the most tokens wins, the earliest one on ties. Failed branches leave no
/// trace on the result except as diagnostics.
pub fn alternative<T: 'static>(parsers: Vec<BoxedParser<T>>) -> BoxedParser<T> {
    BoxedParser::new(move |input: &TokenStream| {
        let config = input.config();
        let mut failure: Option<ParseFailure> = None;
        let mut best: Option<(T, TokenStream)> = None;

        for (branch, parser) in parsers.iter().enumerate() {
            match parser.parse(input) {
                Ok((value, rest)) => {
                    if config.tie_break == TieBreak::FirstMatch {
                        return Ok((value, abandon(rest, failure)));
                    }
                    let longer = match &best {
                        Some((_, longest)) => rest.position() > longest.position(),
                        None => true,
                    };
                    if longer {
                        best = Some((value, rest));
                    }
                }
                Err(err) => {
                    trace!(branch, at = input.position(), "alternative backtracked");
                    failure = Some(select_failure(failure, err, config));
                }
            }
        }

        match best {
            Some((value, rest)) => Ok((value, abandon(rest, failure))),
            None => Err(failure.unwrap_or_else(|| input.fail(ParseFailureKind::UnexpectedToken))),
        }
    })
}

// === Repetition ===

/// Apply `parser` as long as it succeeds, requiring at least `min` matches.
///
/// The failed attempt that ends the loop is discarded, and the result is
/// positioned after the last success. A success that consumes nothing also
/// ends the loop and satisfies `min`, since applying the same rule to the same
/// stream would match again identically.
pub fn repeat<T: 'static>(parser: BoxedParser<T>, min: usize) -> BoxedParser<Vec<T>> {
    BoxedParser::new(move |input: &TokenStream| {
        let mut items = Vec::new();
        let mut rest = input.clone();

        loop {
            match parser.parse(&rest) {
                Ok((item, next)) => {
                    let progressed = next.position() > rest.position();
                    items.push(item);
                    rest = next;
                    if !progressed {
                        return Ok((items, rest));
                    }
                }
                Err(err) if items.len() < min => return Err(err),
                Err(err) => return Ok((items, rest.with_abandoned(err))),
            }
        }
    })
}

/// Parse zero or more occurrences
pub fn many<T: 'static>(parser: BoxedParser<T>) -> BoxedParser<Vec<T>> {
    repeat(parser, 0)
}

/// Parse one or more occurrences
pub fn many1<T: 'static>(parser: BoxedParser<T>) -> BoxedParser<Vec<T>> {
    repeat(parser, 1)
}

/// Optional: parse zero or one
pub fn optional<T: 'static>(parser: BoxedParser<T>) -> BoxedParser<Option<T>> {
    alternative(vec![parser.map(Some), nothing()])
}

fn nothing<T: 'static>() -> BoxedParser<Option<T>> {
    BoxedParser::new(|input: &TokenStream| Ok((None, input.clone())))
}

/// Zero or more `item`s separated by `separator`, without a trailing one.
pub fn separated<T: 'static, S: 'static>(
    item: BoxedParser<T>,
    separator: BoxedParser<S>,
) -> BoxedParser<Vec<T>> {
    let tail = many(separator * item.clone());
    optional(item + tail).map(|parsed| match parsed {
        Some((head, tail)) => std::iter::once(head).chain(tail).collect(),
        None => Vec::new(),
    })
}

/// Run `parser` one nesting level deeper, failing past `max_depth`.
pub fn nested<T: 'static>(parser: BoxedParser<T>) -> BoxedParser<T> {
    BoxedParser::new(move |input: &TokenStream| {
        let inner = input.descend()?;
        let (value, rest) = parser.parse(&inner)?;
        Ok((value, rest.with_depth(input.depth())))
    })
}

// === Primitive Parsers ===

/// Consume one token of the given kind.
pub fn token(kind: TokenKind) -> BoxedParser<Token> {
    BoxedParser::new(move |input: &TokenStream| {
        let current = input.current();
        if !current.is(kind) {
            return Err(input.expected(Expected::Token(kind)));
        }
        let rest = input.advance()?;
        Ok((current.clone(), rest))
    })
}

/// Succeeds, consuming nothing, only at end of input.
pub fn end_of_input() -> BoxedParser<()> {
    BoxedParser::new(|input: &TokenStream| {
        if input.at_end() {
            Ok(((), input.clone()))
        } else {
            Err(input.expected(Expected::Token(TokenKind::Eof)))
        }
    })
}

pub fn expect_assign() -> BoxedParser<Token> {
    token(TokenKind::Assign)
}

pub fn expect_comma() -> BoxedParser<Token> {
    token(TokenKind::Comma)
}

pub fn expect_semicolon() -> BoxedParser<Token> {
    token(TokenKind::Semicolon)
}

pub fn expect_lparen() -> BoxedParser<Token> {
    token(TokenKind::LParen)
}

pub fn expect_rparen() -> BoxedParser<Token> {
    token(TokenKind::RParen)
}

pub fn expect_lbrace() -> BoxedParser<Token> {
    token(TokenKind::LBrace)
}

pub fn expect_rbrace() -> BoxedParser<Token> {
    token(TokenKind::RBrace)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(source: &str) -> TokenStream {
        TokenStream::from_source(source, ParseConfig::default()).unwrap()
    }

    fn ident() -> BoxedParser<String> {
        token(TokenKind::Ident) >> |t: Token| t.lexeme
    }

    #[test]
    fn seq_threads_the_stream() {
        let (pair, rest) = (ident() + ident()).parse(&stream("a b c")).unwrap();
        assert_eq!(pair, ("a".to_string(), "b".to_string()));
        assert_eq!(rest.position(), 2);
    }

    #[test]
    fn seq_failure_leaves_input_untouched() {
        let input = stream("a 1");
        let err = (ident() + ident()).parse(&input).unwrap_err();
        assert_eq!(err.index, 1);
        assert!(err.expects(TokenKind::Ident));
        assert_eq!(input.position(), 0);
    }

    #[test]
    fn skip_variants_keep_one_side() {
        let input = stream("( a )");
        let (inner, rest) = (expect_lparen() * ident() - expect_rparen())
            .parse(&input)
            .unwrap();
        assert_eq!(inner, "a");
        assert!(rest.at_end());
    }

    #[test]
    fn or_retries_from_the_original_stream() {
        let pair = (ident() + token(TokenKind::Integer)).map(|(a, _)| a);
        let single = ident();
        let (value, rest) = pair.or(single).parse(&stream("x y")).unwrap();
        assert_eq!(value, "x");
        assert_eq!(rest.position(), 1);
    }

    #[test]
    fn longest_parse_prefers_the_branch_that_consumed_more() {
        let config = ParseConfig::default().with_tie_break(TieBreak::LongestParse);
        let input = TokenStream::from_source("a b", config).unwrap();

        let short = ident().map(|a| vec![a]);
        let long = many1(ident());
        let (value, rest) = alternative(vec![short, long]).parse(&input).unwrap();

        assert_eq!(value, vec!["a".to_string(), "b".to_string()]);
        assert!(rest.at_end());
    }

    #[test]
    fn first_match_stops_at_the_first_success() {
        let short = ident().map(|a| vec![a]);
        let long = many1(ident());
        let (value, rest) = alternative(vec![short, long])
            .parse(&stream("a b"))
            .unwrap();

        assert_eq!(value, vec!["a".to_string()]);
        assert_eq!(rest.position(), 1);
    }

    #[test]
    fn alternative_reports_the_furthest_failure() {
        let deep = ident() + ident() + token(TokenKind::Semicolon);
        let shallow = (token(TokenKind::Integer) >> |t: Token| t.lexeme) + ident();
        let both = alternative(vec![deep.map(|((a, _), _)| a), shallow.map(|(a, _)| a)]);

        let err = both.parse(&stream("a b c")).unwrap_err();
        assert_eq!(err.index, 2);
        assert!(err.expects(TokenKind::Semicolon));
        assert!(!err.expects(TokenKind::Integer));
    }

    #[test]
    fn first_failure_selection_reports_the_first_branch() {
        let config = ParseConfig::default().with_failure_selection(FailureSelection::First);
        let input = TokenStream::from_source("a b c", config).unwrap();

        let first = token(TokenKind::Integer) >> |t: Token| t.lexeme;
        let second = (ident() + ident() + token(TokenKind::Semicolon)).map(|((a, _), _)| a);
        let err = alternative(vec![first, second]).parse(&input).unwrap_err();

        assert_eq!(err.index, 0);
        assert!(err.expects(TokenKind::Integer));
    }

    #[test]
    fn repeat_stops_at_first_failure() {
        let (items, rest) = many(ident()).parse(&stream("a b 1")).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(rest.position(), 2);
    }

    #[test]
    fn repeat_with_minimum_fails_on_empty_input() {
        let err = many1(ident()).parse(&stream("")).unwrap_err();
        assert_eq!(err.position.offset, 0);
        assert_eq!(err.found, TokenKind::Eof);
    }

    #[test]
    fn repeat_stops_on_zero_width_success() {
        let (items, rest) = many(optional(ident())).parse(&stream("a 1")).unwrap();
        assert_eq!(items, vec![Some("a".to_string()), None]);
        assert_eq!(rest.position(), 1);
    }

    #[test]
    fn zero_width_success_meets_the_minimum() {
        let (items, rest) = repeat(optional(ident()), 2).parse(&stream("1")).unwrap();
        assert_eq!(items, vec![None]);
        assert_eq!(rest.position(), 0);

        let (items, rest) = repeat(optional(ident()), 3).parse(&stream("a 1")).unwrap();
        assert_eq!(items, vec![Some("a".to_string()), None]);
        assert_eq!(rest.position(), 1);
    }

    #[test]
    fn optional_yields_none_without_consuming() {
        let input = stream("1");
        let (value, rest) = optional(ident()).parse(&input).unwrap();
        assert_eq!(value, None);
        assert_eq!(rest.position(), 0);
    }

    #[test]
    fn separated_leaves_trailing_separator() {
        let (items, rest) = separated(ident(), expect_comma())
            .parse(&stream("a, b, )"))
            .unwrap();
        assert_eq!(items, vec!["a".to_string(), "b".to_string()]);
        assert!(rest.current().is(TokenKind::Comma));
    }

    #[test]
    fn label_renames_failures_at_the_start() {
        let err = ident().label("name").parse(&stream("1")).unwrap_err();
        assert_eq!(err.expected, BTreeSet::from([Expected::Label("name")]));
    }

    #[test]
    fn try_map_reports_at_the_parser_start() {
        let parser = ident().try_map(|_| Err::<String, _>(ParseFailureKind::InvalidLiteral));
        let err = parser.parse(&stream("x")).unwrap_err();
        assert_eq!(err.kind, ParseFailureKind::InvalidLiteral);
        assert_eq!(err.index, 0);
    }

    #[test]
    fn nested_restores_depth() {
        let config = ParseConfig::default().with_max_depth(2);
        let input = TokenStream::from_source("a", config).unwrap();
        let (_, rest) = nested(nested(ident())).parse(&input).unwrap();
        assert_eq!(rest.depth(), 0);

        let err = nested(nested(nested(ident()))).parse(&input).unwrap_err();
        assert_eq!(err.kind, ParseFailureKind::MaxDepthExceeded);
    }

    #[test]
    fn end_of_input_does_not_consume() {
        let input = stream("");
        let ((), rest) = end_of_input().parse(&input).unwrap();
        assert_eq!(rest.position(), input.position());
        assert!(end_of_input().parse(&stream("a")).is_err());
    }
}
