//! Syntax tree produced by the parser
//!
//! Nodes own their children and carry the span of the tokens they were built
//! from. The tree has no back-references and is never modified after parsing.

pub mod expression;
pub mod statement;

pub use expression::{
    BinOpKind, BinaryOp, Boolean, Call, Expression, FunctionLiteral, Group, Ident, IfElse,
    Integer, PrefixOp, PrefixOperator,
};
pub use statement::{Block, ExpressionStatement, LetStatement, ReturnStatement, Statement};

use crate::lexer::Span;

/// The root of the tree: every top-level statement in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
    pub span: Span,
}
