//! Combinator-based recursive descent over an immutable [`TokenStream`].
//!
//! Every rule takes the stream by reference and returns the parsed value with
//! the stream that follows it. Backtracking is simply retrying another rule on
//! the same input.

mod combinators;
mod grammar;
mod state;
mod stream;

pub use combinators::*;
pub use grammar::{block, expression, program, statement};
pub use state::{ParseResult, Parser};
pub use stream::TokenStream;

use tracing::debug;

use crate::ast::{Expression, Program};
use crate::config::ParseConfig;
use crate::error::Failure;

/// Parse a whole program from a stream positioned at its first token.
///
/// The returned stream is at end of input.
pub fn parse_program(input: &TokenStream) -> ParseResult<Program> {
    program().parse(input)
}

/// Parse one expression, leaving whatever follows it unconsumed.
pub fn parse_expression(input: &TokenStream) -> ParseResult<Expression> {
    expression().parse(input)
}

/// Tokenize and parse `source` as a program.
pub fn parse(source: &str, config: &ParseConfig) -> Result<Program, Failure> {
    let input = TokenStream::from_source(source, config.clone())?;
    debug!(tokens = input.tokens().len(), "parsing program");

    let (program, _) = parse_program(&input)?;
    debug!(statements = program.statements.len(), "parsed program");
    Ok(program)
}

/// Tokenize and parse `source` as a single expression followed by end of input.
pub fn parse_expression_str(source: &str, config: &ParseConfig) -> Result<Expression, Failure> {
    let input = TokenStream::from_source(source, config.clone())?;
    debug!(tokens = input.tokens().len(), "parsing expression");

    let (expression, _) = (expression() - end_of_input()).parse(&input)?;
    Ok(expression)
}
