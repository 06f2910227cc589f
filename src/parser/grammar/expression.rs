//! Expression parsers
//!
//! Precedence is encoded by layering, lowest binding outermost:
//! equality, comparison, additive, multiplicative, unary, postfix, primary.
//! Operator loops and the call suffix look at the next token with
//! `lookahead(0)` and stop quietly when it does not continue them.

use crate::ast::expression::{
    BinOpKind, BinaryOp, Call, Expression, FunctionLiteral, Group, IfElse, PrefixOp,
    PrefixOperator,
};
use crate::lexer::{Token, TokenKind};

use crate::parser::combinators::{
    BoxedParser, alternative, expect_comma, expect_lparen, expect_rparen, nested, optional,
    separated, token,
};
use crate::parser::state::{ParseResult, Parser};
use crate::parser::stream::TokenStream;

use super::literal::{boolean, ident, integer};
use super::statement::block;

/// group := "(" expression ")"
pub fn group() -> BoxedParser<Expression> {
    nested(expect_lparen() + expression() + expect_rparen()).map(|((open, inner), close)| {
        Expression::Group(Group {
            inner: Box::new(inner),
            span: open.span.merge(&close.span),
        })
    })
}

/// if_expr := "if" "(" expression ")" block ("else" block)?
pub fn if_expr() -> BoxedParser<Expression> {
    let condition = nested(expect_lparen() * expression() - expect_rparen());
    let otherwise = optional(token(TokenKind::Else) * block());

    (token(TokenKind::If) + condition + block() + otherwise).map(
        |(((keyword, condition), consequence), alternative)| {
            let end = match &alternative {
                Some(block) => block.span,
                None => consequence.span,
            };
            Expression::If(IfElse {
                condition: Box::new(condition),
                consequence,
                alternative,
                span: keyword.span.merge(&end),
            })
        },
    )
}

/// fn_expr := "fn" "(" (IDENT ("," IDENT)*)? ")" block
pub fn fn_expr() -> BoxedParser<Expression> {
    let params = expect_lparen() * separated(ident(), expect_comma()) - expect_rparen();

    (token(TokenKind::Fn) + params + block()).map(|((keyword, params), body)| {
        let span = keyword.span.merge(&body.span);
        Expression::Function(FunctionLiteral { params, body, span })
    })
}

/// primary := INTEGER | "true" | "false" | IDENT | group | if_expr | fn_expr
pub fn primary() -> BoxedParser<Expression> {
    BoxedParser::new(|input: &TokenStream| {
        alternative(vec![
            integer().map(Expression::Integer),
            boolean().map(Expression::Boolean),
            ident().map(Expression::Variable),
            group(),
            if_expr(),
            fn_expr(),
        ])
        .label("expression")
        .parse(input)
    })
}

/// arguments := "(" (expression ("," expression)*)? ")"
fn arguments() -> BoxedParser<(Vec<Expression>, Token)> {
    nested(expect_lparen() * separated(expression(), expect_comma()) + expect_rparen())
}

/// postfix := primary ("(" arguments? ")")*
pub fn postfix() -> BoxedParser<Expression> {
    BoxedParser::new(|input: &TokenStream| {
        let (mut callee, mut rest) = primary().parse(input)?;

        while rest.peek_is(0, TokenKind::LParen)? {
            let ((args, close), next) = arguments().parse(&rest)?;
            let span = callee.span().merge(&close.span);
            callee = Expression::Call(Call {
                callee: Box::new(callee),
                args,
                span,
            });
            rest = next;
        }

        Ok((callee, rest))
    })
}

fn prefix_operator(kind: TokenKind) -> Option<PrefixOperator> {
    match kind {
        TokenKind::Bang => Some(PrefixOperator::Not),
        TokenKind::Minus => Some(PrefixOperator::Negate),
        _ => None,
    }
}

/// unary := ("!" | "-") unary | postfix
pub fn unary() -> BoxedParser<Expression> {
    BoxedParser::new(|input: &TokenStream| {
        let current = input.lookahead(0)?;
        let Some(op) = prefix_operator(current.kind) else {
            return postfix().parse(input);
        };
        let start = current.span;

        let (operand, rest) = nested(unary()).parse(&input.advance()?)?;
        let span = start.merge(&operand.span());
        Ok((
            Expression::Prefix(PrefixOp {
                op,
                operand: Box::new(operand),
                span,
            }),
            rest,
        ))
    })
}

/// One left-associative precedence level: `operand (op operand)*`.
///
/// Once an operator is consumed the right operand is required.
fn binary_level(
    input: &TokenStream,
    operand: fn() -> BoxedParser<Expression>,
    operator: fn(TokenKind) -> Option<BinOpKind>,
) -> ParseResult<Expression> {
    let (mut left, mut rest) = operand().parse(input)?;

    while let Some(op) = operator(rest.lookahead(0)?.kind) {
        let (right, next) = operand().parse(&rest.advance()?)?;
        let span = left.span().merge(&right.span());
        left = Expression::Binary(BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
            span,
        });
        rest = next;
    }

    Ok((left, rest))
}

/// multiplicative := unary (("*" | "/") unary)*
pub fn multiplicative() -> BoxedParser<Expression> {
    BoxedParser::new(|input: &TokenStream| {
        binary_level(input, unary, |kind| match kind {
            TokenKind::Star => Some(BinOpKind::Mul),
            TokenKind::Slash => Some(BinOpKind::Div),
            _ => None,
        })
    })
}

/// additive := multiplicative (("+" | "-") multiplicative)*
pub fn additive() -> BoxedParser<Expression> {
    BoxedParser::new(|input: &TokenStream| {
        binary_level(input, multiplicative, |kind| match kind {
            TokenKind::Plus => Some(BinOpKind::Add),
            TokenKind::Minus => Some(BinOpKind::Sub),
            _ => None,
        })
    })
}

/// comparison := additive (("<" | ">") additive)*
pub fn comparison() -> BoxedParser<Expression> {
    BoxedParser::new(|input: &TokenStream| {
        binary_level(input, additive, |kind| match kind {
            TokenKind::Lt => Some(BinOpKind::Lt),
            TokenKind::Gt => Some(BinOpKind::Gt),
            _ => None,
        })
    })
}

/// equality := comparison (("==" | "!=") comparison)*
pub fn equality() -> BoxedParser<Expression> {
    BoxedParser::new(|input: &TokenStream| {
        binary_level(input, comparison, |kind| match kind {
            TokenKind::Eq => Some(BinOpKind::Eq),
            TokenKind::NotEq => Some(BinOpKind::NotEq),
            _ => None,
        })
    })
}

/// expression := equality
pub fn expression() -> BoxedParser<Expression> {
    equality()
}
