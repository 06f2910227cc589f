use tracing::{debug, trace};

use crate::config::ParseConfig;
use crate::error::{LexFailure, LexFailureKind};

use super::{Cursor, Token, TokenKind};

/// How a pattern recognizes its lexeme at the start of the remaining input.
///
/// Scanners return the matched length in bytes, `Ok(None)` for no match, or a
/// failure kind when the input can only be a broken instance of the pattern.
enum Matcher {
    Literal(&'static str),
    Scan(fn(&str) -> Result<Option<usize>, LexFailureKind>),
}

impl Matcher {
    fn apply(&self, input: &str) -> Result<Option<usize>, LexFailureKind> {
        match self {
            Matcher::Literal(text) => Ok(input.starts_with(text).then_some(text.len())),
            Matcher::Scan(scan) => scan(input),
        }
    }
}

struct Pattern {
    kind: TokenKind,
    matcher: Matcher,
}

const fn literal(kind: TokenKind, text: &'static str) -> Pattern {
    Pattern {
        kind,
        matcher: Matcher::Literal(text),
    }
}

const fn scan(
    kind: TokenKind,
    scanner: fn(&str) -> Result<Option<usize>, LexFailureKind>,
) -> Pattern {
    Pattern {
        kind,
        matcher: Matcher::Scan(scanner),
    }
}

/// Every token pattern, in tie-break priority order.
///
/// The longest lexeme wins; among equally long lexemes the earlier entry wins.
/// That is why keywords precede `Ident`.
const PATTERNS: &[Pattern] = &[
    scan(TokenKind::Whitespace, whitespace),
    scan(TokenKind::Comment, line_comment),
    scan(TokenKind::Comment, block_comment),
    literal(TokenKind::Let, "let"),
    literal(TokenKind::Return, "return"),
    literal(TokenKind::Fn, "fn"),
    literal(TokenKind::If, "if"),
    literal(TokenKind::Else, "else"),
    literal(TokenKind::True, "true"),
    literal(TokenKind::False, "false"),
    scan(TokenKind::Ident, identifier),
    scan(TokenKind::Integer, integer),
    literal(TokenKind::Eq, "=="),
    literal(TokenKind::NotEq, "!="),
    literal(TokenKind::Assign, "="),
    literal(TokenKind::Bang, "!"),
    literal(TokenKind::Plus, "+"),
    literal(TokenKind::Minus, "-"),
    literal(TokenKind::Star, "*"),
    literal(TokenKind::Slash, "/"),
    literal(TokenKind::Lt, "<"),
    literal(TokenKind::Gt, ">"),
    literal(TokenKind::Comma, ","),
    literal(TokenKind::Semicolon, ";"),
    literal(TokenKind::LParen, "("),
    literal(TokenKind::RParen, ")"),
    literal(TokenKind::LBrace, "{"),
    literal(TokenKind::RBrace, "}"),
];

/// Byte length of the longest prefix whose characters all satisfy `accept`.
fn take_while(input: &str, accept: impl Fn(char) -> bool) -> usize {
    input
        .char_indices()
        .find(|(_, ch)| !accept(*ch))
        .map(|(idx, _)| idx)
        .unwrap_or(input.len())
}

fn non_empty(len: usize) -> Option<usize> {
    (len > 0).then_some(len)
}

fn whitespace(input: &str) -> Result<Option<usize>, LexFailureKind> {
    Ok(non_empty(take_while(input, char::is_whitespace)))
}

/// `// ...` up to, not including, the line break.
fn line_comment(input: &str) -> Result<Option<usize>, LexFailureKind> {
    let Some(body) = input.strip_prefix("//") else {
        return Ok(None);
    };
    Ok(Some(2 + take_while(body, |ch| ch != '\n')))
}

fn block_comment(input: &str) -> Result<Option<usize>, LexFailureKind> {
    let Some(body) = input.strip_prefix("/*") else {
        return Ok(None);
    };
    match body.find("*/") {
        Some(end) => Ok(Some(2 + end + 2)),
        None => Err(LexFailureKind::UnterminatedComment),
    }
}

fn identifier(input: &str) -> Result<Option<usize>, LexFailureKind> {
    match input.chars().next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => Ok(Some(take_while(
            input,
            |ch| ch.is_ascii_alphanumeric() || ch == '_',
        ))),
        _ => Ok(None),
    }
}

fn integer(input: &str) -> Result<Option<usize>, LexFailureKind> {
    Ok(non_empty(take_while(input, |ch| ch.is_ascii_digit())))
}

/// Pick the pattern with the longest match at `cursor`.
fn longest_match(cursor: &Cursor<'_>) -> Result<(TokenKind, usize), LexFailure> {
    let rest = cursor.remaining();
    let mut best: Option<(TokenKind, usize)> = None;

    for pattern in PATTERNS {
        let len = match pattern.matcher.apply(rest) {
            Ok(Some(len)) if len > 0 => len,
            Ok(_) => continue,
            Err(kind) => {
                return Err(LexFailure::new(
                    cursor.position(),
                    cursor.peek(0).unwrap_or('\0'),
                    kind,
                ));
            }
        };

        match best {
            Some((_, longest)) if longest >= len => {}
            _ => best = Some((pattern.kind, len)),
        }
    }

    best.ok_or_else(|| {
        LexFailure::new(
            cursor.position(),
            cursor.peek(0).unwrap_or('\0'),
            LexFailureKind::UnexpectedCharacter,
        )
    })
}

/// Character `k` places after `cursor`, or `None` past the end of input.
///
/// Pure inspection: no cursor is produced and nothing is consumed.
pub fn peek_char(cursor: &Cursor<'_>, k: usize) -> Option<char> {
    cursor.peek(k)
}

/// Produce the next token starting at `cursor`, and the cursor right after it.
///
/// Trivia is skipped unless `config.emit_trivia` is set, in which case each
/// whitespace run or comment is returned as a token of its own. At the end of
/// input the zero-width `Eof` sentinel is returned together with an unchanged
/// cursor.
pub fn tokenize_next<'src>(
    cursor: &Cursor<'src>,
    config: &ParseConfig,
) -> Result<(Token, Cursor<'src>), LexFailure> {
    let mut start = *cursor;

    loop {
        if start.is_at_end() {
            let token = Token::new(TokenKind::Eof, "", start.span_to(&start));
            return Ok((token, start));
        }

        let (kind, len) = longest_match(&start)?;
        let end = start.advance_bytes(len);

        if kind.is_trivia() && !config.emit_trivia {
            start = end;
            continue;
        }

        let token = Token::new(kind, start.slice_to(&end), start.span_to(&end));
        trace!(kind = ?token.kind, lexeme = %token.lexeme, at = %token.pos(), "token");
        return Ok((token, end));
    }
}

/// Tokenize all of `source`, ending with the `Eof` sentinel.
pub fn tokenize(source: &str, config: &ParseConfig) -> Result<Vec<Token>, LexFailure> {
    let mut tokens = Vec::new();
    let mut cursor = Cursor::new(source);

    loop {
        let (token, next) = tokenize_next(&cursor, config)?;
        let done = token.is(TokenKind::Eof);
        tokens.push(token);
        if done {
            break;
        }
        cursor = next;
    }

    debug!(count = tokens.len(), "tokenized input");
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source, &ParseConfig::default())
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn empty_input_yields_only_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
        assert_eq!(kinds("  \n\t "), vec![TokenKind::Eof]);
    }

    #[test]
    fn keywords_win_ties_over_identifiers() {
        assert_eq!(kinds("let"), vec![TokenKind::Let, TokenKind::Eof]);
        assert_eq!(kinds("letter"), vec![TokenKind::Ident, TokenKind::Eof]);
        assert_eq!(kinds("iffy"), vec![TokenKind::Ident, TokenKind::Eof]);
    }

    #[test]
    fn longest_operator_wins() {
        assert_eq!(
            kinds("== = != !"),
            vec![
                TokenKind::Eq,
                TokenKind::Assign,
                TokenKind::NotEq,
                TokenKind::Bang,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn line_comment_beats_slash() {
        assert_eq!(
            kinds("1 // two\n/ 3"),
            vec![
                TokenKind::Integer,
                TokenKind::Slash,
                TokenKind::Integer,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn eof_returns_unchanged_cursor() {
        let cursor = Cursor::new("  ").advance_chars(2);
        let (token, next) = tokenize_next(&cursor, &ParseConfig::default()).unwrap();
        assert!(token.is(TokenKind::Eof));
        assert_eq!(next, cursor);
        assert!(token.span.is_empty());
    }

    #[test]
    fn tokenize_next_is_deterministic() {
        let cursor = Cursor::new("foo(1)");
        let config = ParseConfig::default();
        let first = tokenize_next(&cursor, &config).unwrap();
        let second = tokenize_next(&cursor, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unexpected_character_is_reported_with_position() {
        let err = tokenize("a\n  @", &ParseConfig::default()).unwrap_err();
        assert_eq!(err.kind, LexFailureKind::UnexpectedCharacter);
        assert_eq!(err.found, '@');
        assert_eq!(err.position.offset, 4);
        assert_eq!(err.position.line, 2);
        assert_eq!(err.position.column, 3);
    }

    #[test]
    fn unterminated_block_comment_fails_at_its_start() {
        let err = tokenize("1 /* open", &ParseConfig::default()).unwrap_err();
        assert_eq!(err.kind, LexFailureKind::UnterminatedComment);
        assert_eq!(err.position.offset, 2);
    }

    #[test]
    fn peek_char_inspects_without_consuming() {
        let cursor = Cursor::new("ab");
        assert_eq!(peek_char(&cursor, 1), Some('b'));
        assert_eq!(peek_char(&cursor, 5), None);
        assert_eq!(cursor.offset(), 0);
    }
}
