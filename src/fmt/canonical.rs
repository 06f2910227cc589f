//! Canonical source rendering for the syntax tree
//!
//! Every prefix and binary expression is wrapped in parentheses, so the
//! output shows exactly how the parser grouped the input. Grouping
//! parentheses from the source are dropped; the explicit ones make them
//! redundant.

use std::fmt::{self, Display};

use crate::ast::{
    BinOpKind, Block, Expression, FunctionLiteral, IfElse, PrefixOperator, Program, Statement,
};

const INDENT: &str = "    ";

struct Formatter {
    buffer: String,
    indent_level: usize,
}

impl Formatter {
    fn new() -> Self {
        Self {
            buffer: String::new(),
            indent_level: 0,
        }
    }

    fn indent(&mut self) {
        self.indent_level += 1;
    }

    fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.buffer.push_str(INDENT);
        }
    }

    fn write_str(&mut self, s: &str) {
        self.buffer.push_str(s);
    }

    fn write_newline(&mut self) {
        self.buffer.push('\n');
    }

    fn finish(self) -> String {
        self.buffer
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut formatter = Formatter::new();
        for stmt in &self.statements {
            format_statement(stmt, &mut formatter);
            formatter.write_newline();
        }
        f.write_str(&formatter.finish())
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut formatter = Formatter::new();
        format_statement(self, &mut formatter);
        f.write_str(&formatter.finish())
    }
}

impl Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut formatter = Formatter::new();
        format_block(self, &mut formatter);
        f.write_str(&formatter.finish())
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut formatter = Formatter::new();
        format_expression(self, &mut formatter);
        f.write_str(&formatter.finish())
    }
}

fn format_statement(stmt: &Statement, fmt: &mut Formatter) {
    fmt.write_indent();
    match stmt {
        Statement::Let(binding) => {
            fmt.write_str("let ");
            fmt.write_str(&binding.name.value);
            fmt.write_str(" = ");
            format_expression(&binding.value, fmt);
        }
        Statement::Return(ret) => {
            fmt.write_str("return ");
            format_expression(&ret.value, fmt);
        }
        Statement::Expression(expr) => format_expression(&expr.expression, fmt),
    }
    fmt.write_str(";");
}

fn format_block(block: &Block, fmt: &mut Formatter) {
    if block.statements.is_empty() {
        fmt.write_str("{}");
        return;
    }

    fmt.write_str("{");
    fmt.write_newline();

    fmt.indent();
    for stmt in &block.statements {
        format_statement(stmt, fmt);
        fmt.write_newline();
    }
    fmt.dedent();

    fmt.write_indent();
    fmt.write_str("}");
}

fn format_expression(expr: &Expression, fmt: &mut Formatter) {
    match expr {
        Expression::Integer(int) => fmt.write_str(&int.value.to_string()),
        Expression::Boolean(b) => fmt.write_str(if b.value { "true" } else { "false" }),
        Expression::Variable(ident) => fmt.write_str(&ident.value),
        Expression::Group(group) => format_expression(&group.inner, fmt),
        Expression::Prefix(prefix) => {
            fmt.write_str("(");
            fmt.write_str(prefix_symbol(prefix.op));
            format_expression(&prefix.operand, fmt);
            fmt.write_str(")");
        }
        Expression::Binary(binop) => {
            fmt.write_str("(");
            format_expression(&binop.left, fmt);
            fmt.write_str(" ");
            fmt.write_str(binop_symbol(binop.op));
            fmt.write_str(" ");
            format_expression(&binop.right, fmt);
            fmt.write_str(")");
        }
        Expression::Call(call) => {
            format_expression(&call.callee, fmt);
            fmt.write_str("(");
            for (i, arg) in call.args.iter().enumerate() {
                if i > 0 {
                    fmt.write_str(", ");
                }
                format_expression(arg, fmt);
            }
            fmt.write_str(")");
        }
        Expression::If(ite) => format_if_else(ite, fmt),
        Expression::Function(func) => format_function(func, fmt),
    }
}

fn format_if_else(ite: &IfElse, fmt: &mut Formatter) {
    fmt.write_str("if (");
    format_expression(&ite.condition, fmt);
    fmt.write_str(") ");
    format_block(&ite.consequence, fmt);

    if let Some(alternative) = &ite.alternative {
        fmt.write_str(" else ");
        format_block(alternative, fmt);
    }
}

fn format_function(func: &FunctionLiteral, fmt: &mut Formatter) {
    fmt.write_str("fn(");
    for (i, param) in func.params.iter().enumerate() {
        if i > 0 {
            fmt.write_str(", ");
        }
        fmt.write_str(&param.value);
    }
    fmt.write_str(") ");
    format_block(&func.body, fmt);
}

fn binop_symbol(kind: BinOpKind) -> &'static str {
    match kind {
        BinOpKind::Add => "+",
        BinOpKind::Sub => "-",
        BinOpKind::Mul => "*",
        BinOpKind::Div => "/",
        BinOpKind::Eq => "==",
        BinOpKind::NotEq => "!=",
        BinOpKind::Lt => "<",
        BinOpKind::Gt => ">",
    }
}

fn prefix_symbol(kind: PrefixOperator) -> &'static str {
    match kind {
        PrefixOperator::Not => "!",
        PrefixOperator::Negate => "-",
    }
}
