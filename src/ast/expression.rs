use crate::lexer::Span;

use super::statement::Block;

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Integer(Integer),
    Boolean(Boolean),
    Variable(Ident),
    Prefix(PrefixOp),
    Binary(BinaryOp),
    Call(Call),
    Group(Group),
    If(IfElse),
    Function(FunctionLiteral),
}

impl Expression {
    pub fn span(&self) -> Span {
        match self {
            Expression::Integer(i) => i.span,
            Expression::Boolean(b) => b.span,
            Expression::Variable(v) => v.span,
            Expression::Prefix(p) => p.span,
            Expression::Binary(b) => b.span,
            Expression::Call(c) => c.span,
            Expression::Group(g) => g.span,
            Expression::If(i) => i.span,
            Expression::Function(f) => f.span,
        }
    }

    /// Name of the node variant, for diagnostics and tests.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expression::Integer(_) => "Integer",
            Expression::Boolean(_) => "Boolean",
            Expression::Variable(_) => "Variable",
            Expression::Prefix(_) => "Prefix",
            Expression::Binary(_) => "Binary",
            Expression::Call(_) => "Call",
            Expression::Group(_) => "Group",
            Expression::If(_) => "If",
            Expression::Function(_) => "Function",
        }
    }

    /// The expression with any grouping parentheses removed.
    pub fn ungrouped(&self) -> &Expression {
        match self {
            Expression::Group(g) => g.inner.ungrouped(),
            other => other,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub value: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Integer {
    pub value: i64,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Boolean {
    pub value: bool,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOperator {
    Not,
    Negate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrefixOp {
    pub op: PrefixOperator,
    pub operand: Box<Expression>,
    pub span: Span,
}

/// Binary operator kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOpKind {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    NotEq,
    Lt,
    Gt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOp {
    pub op: BinOpKind,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub callee: Box<Expression>,
    pub args: Vec<Expression>,
    pub span: Span,
}

/// A parenthesized expression. The span includes the parentheses.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub inner: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfElse {
    pub condition: Box<Expression>,
    pub consequence: Block,
    pub alternative: Option<Block>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionLiteral {
    pub params: Vec<Ident>,
    pub body: Block,
    pub span: Span,
}
