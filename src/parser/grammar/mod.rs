//! Grammar rules for the tether language
//!
//! This module contains all the parsing rules organized by category:
//! - `literal`: integers, booleans and identifiers
//! - `expression`: the precedence ladder, calls, groups, `if` and `fn`
//! - `statement`: `let`, `return`, expression statements and blocks

mod expression;
mod literal;
mod statement;

use crate::ast::Program;
use crate::lexer::Span;

use super::combinators::{BoxedParser, end_of_input, many};
use super::state::Parser;
use super::stream::TokenStream;

pub use expression::expression;
pub use statement::{block, statement};

/// program := statement* EOF
pub fn program() -> BoxedParser<Program> {
    BoxedParser::new(|input: &TokenStream| {
        let start = input.current_position();
        let (statements, rest) = (many(statement()) - end_of_input()).parse(input)?;
        let end = rest.current_position();
        Ok((
            Program {
                statements,
                span: Span::new(start, end),
            },
            rest,
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParseConfig;
    use crate::error::ParseFailureKind;
    use crate::lexer::TokenKind;

    fn stream(source: &str) -> TokenStream {
        TokenStream::from_source(source, ParseConfig::default()).unwrap()
    }

    #[test]
    fn empty_program() {
        let (program, rest) = program().parse(&stream("")).unwrap();
        assert!(program.statements.is_empty());
        assert!(rest.at_end());
    }

    #[test]
    fn statements_without_separators() {
        let (program, _) = program().parse(&stream("let a = 1 a + 1")).unwrap();
        assert_eq!(program.statements.len(), 2);
    }

    #[test]
    fn unclosed_group_reports_missing_paren() {
        let err = program().parse(&stream("(1+2")).unwrap_err();
        assert_eq!(err.kind, ParseFailureKind::UnexpectedToken);
        assert_eq!(err.position.offset, 4);
        assert_eq!(err.found, TokenKind::Eof);
        assert!(err.expects(TokenKind::RParen));
        assert_eq!(err.expected.len(), 1);
    }

    #[test]
    fn invalid_literal_survives_to_the_top() {
        let err = program()
            .parse(&stream("99999999999999999999"))
            .unwrap_err();
        assert_eq!(err.kind, ParseFailureKind::InvalidLiteral);
    }
}
