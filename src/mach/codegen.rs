use super::{Address, Cell, Opcode, Program, SymbolId, Symbols};
use crate::error;
use crate::lang::ast::{Expression, Statement};
use crate::lang::token::Operator;
use crate::lang::{ast, Error};
use tracing::debug;

type Result<T> = std::result::Result<T, Error>;

/// Emits `ast` into `program` and returns the entry address of its
/// top-level code. Definitions are emitted first, each sealed at the
/// generation cursor. With `echo` set, expression statements print
/// their value instead of discarding it.
pub fn codegen(
    program: &mut Program,
    symbols: &mut Symbols,
    ast: &ast::Program,
    echo: bool,
) -> Result<Address> {
    program.rewind();
    let mut gen = Generator {
        program,
        symbols,
        echo,
    };
    for statement in ast.statements.iter().filter(|s| s.is_definition()) {
        gen.definition(statement)?;
    }
    let entry = gen.program.base();
    for statement in ast.statements.iter().filter(|s| !s.is_definition()) {
        gen.statement(statement)?;
    }
    gen.emit(Cell::Stop)?;
    debug!(entry, len = gen.program.len(), "generated");
    Ok(entry)
}

struct Generator<'a> {
    program: &'a mut Program,
    symbols: &'a mut Symbols,
    echo: bool,
}

impl<'a> Generator<'a> {
    fn emit<T: Into<Cell>>(&mut self, cell: T) -> Result<Address> {
        self.program.push(cell)
    }

    fn here(&self) -> Address {
        self.program.len()
    }

    /// Reserves a cell to be patched with an address later.
    fn placeholder(&mut self) -> Result<Address> {
        self.emit(Cell::Stop)
    }

    fn patch_here(&mut self, slot: Address) -> Result<()> {
        let here = self.here();
        self.program.patch(slot, Cell::Address(here))
    }

    fn definition(&mut self, statement: &Statement) -> Result<()> {
        let (id, body) = match statement {
            Statement::Function(id, body) | Statement::Procedure(id, body) => (*id, body),
            _ => return Err(error!(InternalError; "not a definition")),
        };
        self.statements(body)?;
        self.emit(Opcode::ProcRet)?;
        self.emit(Cell::Stop)?;
        let start = self.program.define();
        let symbol = self.symbols.get_mut(id);
        symbol.defn = Some(start);
        debug!(name = symbol.name(), start, "defined");
        Ok(())
    }

    fn statements(&mut self, statements: &[Statement]) -> Result<()> {
        for statement in statements {
            self.statement(statement)?;
        }
        Ok(())
    }

    fn statement(&mut self, statement: &Statement) -> Result<()> {
        match statement {
            Statement::Assignment(..) | Statement::ArgAssignment(..) => {
                self.clause(statement)?;
                self.emit(Opcode::Pop)?;
            }
            Statement::Print(items) => self.r#print(items)?,
            Statement::While(cond, body) => self.r#while(cond, body)?,
            Statement::For(init, cond, post, body) => self.r#for(init, cond, post, body)?,
            Statement::If(cond, then, otherwise) => self.r#if(cond, then, otherwise.as_deref())?,
            Statement::Expression(expr) => {
                self.expression(expr)?;
                self.emit(if self.echo {
                    Opcode::PrintTop
                } else {
                    Opcode::Pop
                })?;
            }
            Statement::Call(id, args) => self.call(*id, args)?,
            Statement::Return(Some(expr)) => {
                self.expression(expr)?;
                self.emit(Opcode::FuncRet)?;
            }
            Statement::Return(None) => {
                self.emit(Opcode::ProcRet)?;
            }
            Statement::Function(..) | Statement::Procedure(..) => {
                return Err(error!(InternalError; "nested definition"));
            }
        }
        Ok(())
    }

    /// Code for a statement that leaves its value on the stack.
    fn clause(&mut self, statement: &Statement) -> Result<()> {
        match statement {
            Statement::Assignment(op, id, expr) => {
                self.expression(expr)?;
                self.emit(Opcode::VarPush)?;
                self.emit(Cell::Symbol(*id))?;
                self.emit(Generator::assignment_opcode(*op)?)?;
            }
            Statement::ArgAssignment(n, expr) => {
                self.expression(expr)?;
                self.emit(Opcode::ArgAssign)?;
                self.emit(Cell::Count(*n))?;
            }
            Statement::Expression(expr) => self.expression(expr)?,
            _ => return Err(error!(InternalError; "not a clause")),
        }
        Ok(())
    }

    fn r#print(&mut self, items: &[Expression]) -> Result<()> {
        for item in items {
            match item {
                Expression::String(id) => {
                    let text = match self.symbols.get(*id).text() {
                        Some(text) => text.clone(),
                        None => return Err(error!(InternalError; "string without text")),
                    };
                    self.emit(Opcode::PrStr)?;
                    self.emit(Cell::Text(text))?;
                }
                _ => {
                    self.expression(item)?;
                    self.emit(Opcode::PrExpr)?;
                }
            }
        }
        Ok(())
    }

    fn r#while(&mut self, cond: &Expression, body: &[Statement]) -> Result<()> {
        self.emit(Opcode::While)?;
        let body_slot = self.placeholder()?;
        let end_slot = self.placeholder()?;
        self.expression(cond)?;
        self.emit(Cell::Stop)?;
        self.patch_here(body_slot)?;
        self.statements(body)?;
        self.emit(Cell::Stop)?;
        self.patch_here(end_slot)
    }

    fn r#for(
        &mut self,
        init: &Statement,
        cond: &Expression,
        post: &Statement,
        body: &[Statement],
    ) -> Result<()> {
        self.emit(Opcode::For)?;
        let cond_slot = self.placeholder()?;
        let post_slot = self.placeholder()?;
        let body_slot = self.placeholder()?;
        let end_slot = self.placeholder()?;
        self.clause(init)?;
        self.emit(Cell::Stop)?;
        self.patch_here(cond_slot)?;
        self.expression(cond)?;
        self.emit(Cell::Stop)?;
        self.patch_here(post_slot)?;
        self.clause(post)?;
        self.emit(Cell::Stop)?;
        self.patch_here(body_slot)?;
        self.statements(body)?;
        self.emit(Cell::Stop)?;
        self.patch_here(end_slot)
    }

    fn r#if(
        &mut self,
        cond: &Expression,
        then: &[Statement],
        otherwise: Option<&[Statement]>,
    ) -> Result<()> {
        self.emit(Opcode::If)?;
        let then_slot = self.placeholder()?;
        let else_slot = self.placeholder()?;
        let end_slot = self.placeholder()?;
        self.expression(cond)?;
        self.emit(Cell::Stop)?;
        self.patch_here(then_slot)?;
        self.statements(then)?;
        self.emit(Cell::Stop)?;
        if let Some(otherwise) = otherwise {
            self.patch_here(else_slot)?;
            self.statements(otherwise)?;
            self.emit(Cell::Stop)?;
        }
        self.patch_here(end_slot)
    }

    fn call(&mut self, id: SymbolId, args: &[Expression]) -> Result<()> {
        for arg in args {
            self.expression(arg)?;
        }
        self.emit(Opcode::Call)?;
        self.emit(Cell::Symbol(id))?;
        self.emit(Cell::Count(args.len()))?;
        Ok(())
    }

    fn expression(&mut self, expr: &Expression) -> Result<()> {
        match expr {
            Expression::Literal(id) => {
                let val = self.symbols.get(*id).val();
                self.emit(Opcode::ConstPush)?;
                self.emit(Cell::Number(val))?;
            }
            Expression::Variable(id) => {
                self.emit(Opcode::VarPush)?;
                self.emit(Cell::Symbol(*id))?;
                self.emit(Opcode::Eval)?;
            }
            Expression::String(_) => {
                return Err(error!(InternalError; "string in expression"));
            }
            Expression::Binop(op, lhs, rhs) => {
                self.expression(lhs)?;
                self.expression(rhs)?;
                self.emit(Generator::binary_opcode(*op)?)?;
            }
            Expression::Unaryop(op, operand) => {
                self.expression(operand)?;
                self.emit(match op {
                    Operator::Minus => Opcode::Negate,
                    Operator::Not => Opcode::Not,
                    _ => return Err(error!(InternalError; "not a unary operator")),
                })?;
            }
            Expression::Bltin(id, arg) => {
                self.expression(arg)?;
                self.emit(Opcode::Bltin)?;
                self.emit(Cell::Symbol(*id))?;
            }
            Expression::Preinc(id) => self.with_symbol(Opcode::PreInc, *id)?,
            Expression::Predec(id) => self.with_symbol(Opcode::PreDec, *id)?,
            Expression::Postinc(id) => self.with_symbol(Opcode::PostInc, *id)?,
            Expression::Postdec(id) => self.with_symbol(Opcode::PostDec, *id)?,
            Expression::Call(id, args) => self.call(*id, args)?,
            Expression::Arg(n) => {
                self.emit(Opcode::Arg)?;
                self.emit(Cell::Count(*n))?;
            }
            Expression::Read(id) => self.with_symbol(Opcode::VarRead, *id)?,
        }
        Ok(())
    }

    fn with_symbol(&mut self, op: Opcode, id: SymbolId) -> Result<()> {
        self.emit(op)?;
        self.emit(Cell::Symbol(id))?;
        Ok(())
    }

    fn binary_opcode(op: Operator) -> Result<Opcode> {
        use Operator::*;
        Ok(match op {
            Plus => Opcode::Add,
            Minus => Opcode::Sub,
            Multiply => Opcode::Mul,
            Divide => Opcode::Div,
            Modulo => Opcode::Mod,
            Caret => Opcode::Pow,
            Less => Opcode::Lt,
            LessEqual => Opcode::Le,
            Greater => Opcode::Gt,
            GreaterEqual => Opcode::Ge,
            Equal => Opcode::Eq,
            NotEqual => Opcode::Ne,
            And => Opcode::And,
            Or => Opcode::Or,
            _ => return Err(error!(InternalError; "not a binary operator")),
        })
    }

    fn assignment_opcode(op: Operator) -> Result<Opcode> {
        use Operator::*;
        Ok(match op {
            Assign => Opcode::Assign,
            AddAssign => Opcode::AddEq,
            SubtractAssign => Opcode::SubEq,
            MultiplyAssign => Opcode::MulEq,
            DivideAssign => Opcode::DivEq,
            ModuloAssign => Opcode::ModEq,
            _ => return Err(error!(InternalError; "not an assignment operator")),
        })
    }
}
