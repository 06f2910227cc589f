//! Statement parsers

use crate::ast::statement::{
    Block, ExpressionStatement, LetStatement, ReturnStatement, Statement,
};
use crate::lexer::{Span, Token, TokenKind};

use crate::parser::combinators::{
    BoxedParser, alternative, expect_assign, expect_lbrace, expect_rbrace, expect_semicolon, many,
    nested, optional, token,
};
use crate::parser::state::Parser;
use crate::parser::stream::TokenStream;

use super::expression::expression;
use super::literal::ident;

/// Span from `start` through the optional terminating semicolon.
fn terminated(start: Span, body: Span, semicolon: &Option<Token>) -> Span {
    let end = semicolon.as_ref().map_or(body, |t| t.span);
    start.merge(&end)
}

/// let_stmt := "let" IDENT "=" expression ";"?
pub fn let_statement() -> BoxedParser<Statement> {
    (token(TokenKind::Let) + (ident() - expect_assign()) + expression()
        + optional(expect_semicolon()))
    .map(|(((keyword, name), value), semicolon)| {
        let span = terminated(keyword.span, value.span(), &semicolon);
        Statement::Let(LetStatement { name, value, span })
    })
}

/// return_stmt := "return" expression ";"?
pub fn return_statement() -> BoxedParser<Statement> {
    (token(TokenKind::Return) + expression() + optional(expect_semicolon())).map(
        |((keyword, value), semicolon)| {
            let span = terminated(keyword.span, value.span(), &semicolon);
            Statement::Return(ReturnStatement { value, span })
        },
    )
}

/// expr_stmt := expression ";"?
pub fn expression_statement() -> BoxedParser<Statement> {
    (expression() + optional(expect_semicolon())).map(|(expression, semicolon)| {
        let span = terminated(expression.span(), expression.span(), &semicolon);
        Statement::Expression(ExpressionStatement { expression, span })
    })
}

/// statement := let_stmt | return_stmt | expr_stmt
pub fn statement() -> BoxedParser<Statement> {
    BoxedParser::new(|input: &TokenStream| {
        alternative(vec![
            let_statement(),
            return_statement(),
            expression_statement(),
        ])
        .parse(input)
    })
}

/// block := "{" statement* "}"
pub fn block() -> BoxedParser<Block> {
    BoxedParser::new(|input: &TokenStream| {
        nested(expect_lbrace() + many(statement()) + expect_rbrace())
            .map(|((open, statements), close)| Block {
                statements,
                span: open.span.merge(&close.span),
            })
            .parse(input)
    })
}
