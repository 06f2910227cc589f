use crate::error::ParseFailure;

use super::stream::TokenStream;

/// A parsed value together with the stream positioned right after it.
pub type ParseResult<T> = Result<(T, TokenStream), ParseFailure>;

/// A grammar rule: a pure function from an input stream to a value and the
/// stream that follows it.
///
/// The input is only borrowed. Trying another rule on the same input after a
/// failure needs no rollback because the failed attempt never changed it.
pub trait Parser<T>: Sized {
    fn parse(&self, input: &TokenStream) -> ParseResult<T>;
}

// Allow closures to be parsers
impl<T, F: Fn(&TokenStream) -> ParseResult<T>> Parser<T> for F {
    fn parse(&self, input: &TokenStream) -> ParseResult<T> {
        self(input)
    }
}
