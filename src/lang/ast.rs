use super::token::Operator;
use crate::mach::SymbolId;

/// A compilation unit: definitions and top-level statements in source order.
#[derive(Debug, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

#[derive(Debug, PartialEq)]
pub enum Statement {
    Assignment(Operator, SymbolId, Expression),
    ArgAssignment(usize, Expression),
    Print(Vec<Expression>),
    While(Expression, Vec<Statement>),
    /// Init and post clauses are `Assignment`, `ArgAssignment` or `Expression`.
    For(Box<Statement>, Expression, Box<Statement>, Vec<Statement>),
    If(Expression, Vec<Statement>, Option<Vec<Statement>>),
    Expression(Expression),
    Call(SymbolId, Vec<Expression>),
    Return(Option<Expression>),
    Function(SymbolId, Vec<Statement>),
    Procedure(SymbolId, Vec<Statement>),
}

#[derive(Debug, PartialEq)]
pub enum Expression {
    Literal(SymbolId),
    Variable(SymbolId),
    String(SymbolId),
    Binop(Operator, Box<Expression>, Box<Expression>),
    Unaryop(Operator, Box<Expression>),
    Bltin(SymbolId, Box<Expression>),
    Preinc(SymbolId),
    Predec(SymbolId),
    Postinc(SymbolId),
    Postdec(SymbolId),
    Call(SymbolId, Vec<Expression>),
    Arg(usize),
    Read(SymbolId),
}

impl Statement {
    pub fn is_definition(&self) -> bool {
        matches!(self, Statement::Function(..) | Statement::Procedure(..))
    }
}
