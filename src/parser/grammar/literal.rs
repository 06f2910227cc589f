//! Literal parsers

use crate::ast::expression::{Boolean, Ident, Integer};
use crate::error::ParseFailureKind;
use crate::lexer::{Token, TokenKind};

use crate::parser::combinators::{BoxedParser, token};

/// Parse an identifier
pub fn ident() -> BoxedParser<Ident> {
    token(TokenKind::Ident)
        >> |t: Token| Ident {
            value: t.lexeme,
            span: t.span,
        }
}

/// Parse an integer literal. Values outside `i64` are rejected.
pub fn integer() -> BoxedParser<Integer> {
    token(TokenKind::Integer).try_map(|t: Token| {
        let value = t
            .lexeme
            .parse::<i64>()
            .map_err(|_| ParseFailureKind::InvalidLiteral)?;
        Ok(Integer {
            value,
            span: t.span,
        })
    })
}

/// Parse a boolean literal: "true" | "false"
pub fn boolean() -> BoxedParser<Boolean> {
    let truthy = token(TokenKind::True)
        >> |t: Token| Boolean {
            value: true,
            span: t.span,
        };
    let falsy = token(TokenKind::False)
        >> |t: Token| Boolean {
            value: false,
            span: t.span,
        };
    truthy | falsy
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParseConfig;
    use crate::parser::state::Parser;
    use crate::parser::stream::TokenStream;

    fn stream(source: &str) -> TokenStream {
        TokenStream::from_source(source, ParseConfig::default()).unwrap()
    }

    #[test]
    fn integer_in_range() {
        let (int, rest) = integer().parse(&stream("9223372036854775807")).unwrap();
        assert_eq!(int.value, i64::MAX);
        assert!(rest.at_end());
    }

    #[test]
    fn integer_out_of_range() {
        let err = integer().parse(&stream("9223372036854775808")).unwrap_err();
        assert_eq!(err.kind, ParseFailureKind::InvalidLiteral);
        assert_eq!(err.position.offset, 0);
    }

    #[test]
    fn boolean_literals() {
        let (t, _) = boolean().parse(&stream("true")).unwrap();
        let (f, _) = boolean().parse(&stream("false")).unwrap();
        assert!(t.value);
        assert!(!f.value);

        let err = boolean().parse(&stream("truth")).unwrap_err();
        assert!(err.expects(TokenKind::True));
        assert!(err.expects(TokenKind::False));
    }

    #[test]
    fn ident_keeps_lexeme_and_span() {
        let (id, _) = ident().parse(&stream("  answer")).unwrap();
        assert_eq!(id.value, "answer");
        assert_eq!(id.span.start.offset, 2);
        assert_eq!(id.span.end.offset, 8);
    }
}
