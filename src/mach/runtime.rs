use super::codegen::codegen;
use super::*;
use crate::error;
use crate::lang::{ast, lex, parse, Error};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

type Result<T> = std::result::Result<T, Error>;

/// Operand stack entry: a value, or a symbol reference awaiting `EVAL`
/// or an assignment.
#[derive(Debug, Clone, Copy)]
struct Datum {
    val: f64,
    sym: Option<SymbolId>,
}

impl Datum {
    fn val(val: f64) -> Datum {
        Datum { val, sym: None }
    }
}

/// Call frame. `argn` is the stack length when the call was made, so the
/// arguments occupy `argn - nargs .. argn`.
#[derive(Debug, Clone, Copy)]
struct Frame {
    sym: SymbolId,
    nargs: usize,
    retpc: Address,
    argn: usize,
}

/// ## Virtual machine
///
/// Owns everything a MiniC session needs: the symbol table, the program
/// store, both stacks and the console.
pub struct Runtime<C: Console = StdConsole> {
    symbols: Symbols,
    program: Program,
    stack: Stack<Datum>,
    frames: Stack<Frame>,
    pc: Address,
    returning: bool,
    depth: usize,
    echo: bool,
    limits: Limits,
    console: C,
    interrupted: Arc<AtomicBool>,
}

impl Default for Runtime<StdConsole> {
    fn default() -> Self {
        Runtime::new(StdConsole)
    }
}

impl<C: Console> Runtime<C> {
    pub fn new(console: C) -> Runtime<C> {
        Runtime::with_limits(console, Limits::default())
    }

    pub fn with_limits(console: C, limits: Limits) -> Runtime<C> {
        Runtime {
            symbols: Symbols::default(),
            program: Program::new(limits.program_len()),
            stack: Stack::new(limits.stack_len(), || error!(StackOverflow)),
            frames: Stack::new(limits.frames_len(), || error!(CallNestedTooDeeply)),
            pc: 0,
            returning: false,
            depth: 0,
            echo: false,
            limits,
            console,
            interrupted: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn symbols(&self) -> &Symbols {
        &self.symbols
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Value of a variable, `None` if it was never assigned.
    pub fn value_of(&self, name: &str) -> Option<f64> {
        self.symbols.value_of(name)
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    /// Print the value of bare expression statements compiled from now on.
    pub fn set_echo(&mut self, echo: bool) {
        self.echo = echo;
    }

    /// Setting the flag stops a running program with a break error.
    pub fn interrupt_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupted)
    }

    /// Operand stack depth left by the last execution.
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    pub fn listing(&self) -> String {
        self.program.listing(&self.symbols)
    }

    pub fn generate(&mut self, ast: &ast::Program) -> Result<Address> {
        let r = codegen(&mut self.program, &mut self.symbols, ast, self.echo);
        if r.is_err() {
            self.program.rewind();
        }
        r
    }

    pub fn compile(&mut self, source: &str) -> Result<Address> {
        let tokens = lex(source);
        let ast = parse(&tokens, &mut self.symbols, self.limits.depth_len())?;
        self.generate(&ast)
    }

    /// Compiles and runs `source`, then discards its top-level code.
    /// Definitions remain available to later calls.
    pub fn enter(&mut self, source: &str) -> Result<()> {
        let entry = self.compile(source)?;
        let r = self.execute(entry);
        self.program.rewind();
        r
    }

    pub fn execute(&mut self, start: Address) -> Result<()> {
        self.stack.clear();
        self.frames.clear();
        self.pc = start;
        self.returning = false;
        self.depth = 0;
        self.interrupted.store(false, Ordering::SeqCst);
        debug!(start, len = self.program.len(), "execute");
        self.exec(start)
    }

    fn exec(&mut self, start: Address) -> Result<()> {
        if self.depth >= self.limits.depth_len() {
            return Err(error!(NestedTooDeeply));
        }
        self.depth += 1;
        let r = self.dispatch(start);
        self.depth -= 1;
        r
    }

    fn dispatch(&mut self, start: Address) -> Result<()> {
        self.pc = start;
        while !self.returning {
            if self.interrupted.load(Ordering::Relaxed) {
                return Err(error!(Break));
            }
            match self.program.get(self.pc) {
                Some(Cell::Stop) => break,
                Some(Cell::Address(addr)) => self.pc = *addr,
                Some(Cell::Op(op)) => {
                    let op = *op;
                    self.pc += 1;
                    self.operation(op)?;
                }
                Some(_) => return Err(error!(InternalError; "operand executed")),
                None => return Err(error!(InternalError; "pc out of range")),
            }
        }
        Ok(())
    }

    fn operand(&mut self) -> Result<Cell> {
        match self.program.get(self.pc) {
            Some(cell) => {
                let cell = cell.clone();
                self.pc += 1;
                Ok(cell)
            }
            None => Err(error!(InternalError; "missing operand")),
        }
    }

    fn symbol_operand(&mut self) -> Result<SymbolId> {
        match self.operand()? {
            Cell::Symbol(id) => Ok(id),
            _ => Err(error!(InternalError; "expected symbol")),
        }
    }

    fn count_operand(&mut self) -> Result<usize> {
        match self.operand()? {
            Cell::Count(n) => Ok(n),
            _ => Err(error!(InternalError; "expected count")),
        }
    }

    fn address_at(&self, addr: Address) -> Result<Address> {
        match self.program.get(addr) {
            Some(Cell::Address(a)) => Ok(*a),
            _ => Err(error!(InternalError; "expected address")),
        }
    }

    fn name(&self, id: SymbolId) -> String {
        self.symbols.get(id).name().to_string()
    }

    fn push(&mut self, val: f64) -> Result<()> {
        self.stack.push(Datum::val(val))
    }

    fn pop(&mut self) -> Result<f64> {
        Ok(self.stack.pop()?.val)
    }

    fn operation(&mut self, op: Opcode) -> Result<()> {
        use Opcode::*;
        match op {
            ConstPush => match self.operand()? {
                Cell::Number(n) => self.push(n),
                _ => Err(error!(InternalError; "expected number")),
            },
            VarPush => {
                let id = self.symbol_operand()?;
                self.stack.push(Datum {
                    val: 0.0,
                    sym: Some(id),
                })
            }
            Eval => self.r#eval(),
            Pop => self.stack.pop().map(|_| ()),

            Add => self.binary(|a, b| Ok(a + b)),
            Sub => self.binary(|a, b| Ok(a - b)),
            Mul => self.binary(|a, b| Ok(a * b)),
            Div => self.binary(|a, b| {
                if b == 0.0 {
                    return Err(error!(DivisionByZero));
                }
                Ok(a / b)
            }),
            Mod => self.binary(|a, b| {
                if b == 0.0 {
                    return Err(error!(DivisionByZero));
                }
                Ok(a % b)
            }),
            Pow => self.binary(Runtime::<C>::power),
            Lt => self.binary(|a, b| Ok(truth(a < b))),
            Le => self.binary(|a, b| Ok(truth(a <= b))),
            Gt => self.binary(|a, b| Ok(truth(a > b))),
            Ge => self.binary(|a, b| Ok(truth(a >= b))),
            Eq => self.binary(|a, b| Ok(truth(a == b))),
            Ne => self.binary(|a, b| Ok(truth(a != b))),
            And => self.binary(|a, b| Ok(truth(a != 0.0 && b != 0.0))),
            Or => self.binary(|a, b| Ok(truth(a != 0.0 || b != 0.0))),
            Negate => {
                let v = self.pop()?;
                self.push(-v)
            }
            Not => {
                let v = self.pop()?;
                self.push(truth(v == 0.0))
            }

            Assign => self.assign(|_, v| Ok(v)),
            AddEq => self.assign(|x, v| Ok(x + v)),
            SubEq => self.assign(|x, v| Ok(x - v)),
            MulEq => self.assign(|x, v| Ok(x * v)),
            DivEq => self.assign(|x, v| {
                if v == 0.0 {
                    return Err(error!(DivisionByZero));
                }
                Ok(x / v)
            }),
            ModEq => self.assign(|x, v| {
                if v == 0.0 {
                    return Err(error!(DivisionByZero));
                }
                Ok(x % v)
            }),
            PreInc => self.step(1.0, true),
            PreDec => self.step(-1.0, true),
            PostInc => self.step(1.0, false),
            PostDec => self.step(-1.0, false),

            Bltin => {
                let id = self.symbol_operand()?;
                let f = match self.symbols.get(id).builtin {
                    Some(f) => f,
                    None => return Err(error!(InternalError; "not a builtin")),
                };
                let v = self.pop()?;
                self.push(f(v)?)
            }

            PrExpr => {
                let v = self.pop()?;
                self.console.write_str(&format!("{} ", format_g(v)));
                Ok(())
            }
            PrStr => match self.operand()? {
                Cell::Text(text) => {
                    self.console.write_str(&text.replace("\\n", "\n"));
                    Ok(())
                }
                _ => Err(error!(InternalError; "expected text")),
            },
            PrintTop => {
                let v = self.pop()?;
                self.console.write_str(&format!("\t{}\n", format_g(v)));
                let id = self.symbols.resolve("_");
                let last = self.symbols.get_mut(id);
                last.kind = Kind::Var;
                last.val = v;
                Ok(())
            }
            VarRead => self.varread(),

            While => self.r#while(),
            For => self.r#for(),
            If => self.r#if(),

            Call => self.call(),
            FuncRet => {
                let frame = self.frame()?;
                if self.symbols.get(frame.sym).kind() == Kind::Procedure {
                    return Err(error!(ProcedureReturnsValue; &self.name(frame.sym)));
                }
                let v = self.pop()?;
                self.ret()?;
                self.push(v)
            }
            ProcRet => {
                let frame = self.frame()?;
                if self.symbols.get(frame.sym).kind() == Kind::Function {
                    return Err(error!(FunctionReturnsNoValue; &self.name(frame.sym)));
                }
                self.ret()
            }
            Arg => {
                let slot = self.arg_slot()?;
                let v = match self.stack.get(slot) {
                    Some(d) => d.val,
                    None => return Err(error!(InternalError; "argument slot")),
                };
                self.push(v)
            }
            ArgAssign => {
                let slot = self.arg_slot()?;
                let v = self.pop()?;
                match self.stack.get_mut(slot) {
                    Some(d) => d.val = v,
                    None => return Err(error!(InternalError; "argument slot")),
                }
                self.push(v)
            }
        }
    }

    fn binary(&mut self, f: impl Fn(f64, f64) -> Result<f64>) -> Result<()> {
        let (a, b) = self.stack.pop_2()?;
        self.push(f(a.val, b.val)?)
    }

    fn power(a: f64, b: f64) -> Result<f64> {
        let r = a.powf(b);
        if r.is_nan() && !a.is_nan() && !b.is_nan() {
            Err(error!(DomainError; "^"))
        } else if r.is_infinite() && a.is_finite() && b.is_finite() {
            Err(error!(RangeError; "^"))
        } else {
            Ok(r)
        }
    }

    fn r#eval(&mut self) -> Result<()> {
        let id = match self.stack.pop()?.sym {
            Some(id) => id,
            None => return Err(error!(InternalError; "eval without symbol")),
        };
        self.verify(id)?;
        let v = self.symbols.get(id).val();
        self.push(v)
    }

    /// Target reference on top, value below it.
    fn assign(&mut self, f: impl Fn(f64, f64) -> Result<f64>) -> Result<()> {
        let target = self.stack.pop()?;
        let v = self.pop()?;
        let id = match target.sym {
            Some(id) => id,
            None => return Err(error!(InternalError; "assignment without symbol")),
        };
        let symbol = self.symbols.get_mut(id);
        if !symbol.is_assignable() {
            return Err(error!(AssignmentToNonVariable; symbol.name()));
        }
        let v = f(symbol.val, v)?;
        symbol.val = v;
        symbol.kind = Kind::Var;
        self.push(v)
    }

    fn verify(&self, id: SymbolId) -> Result<()> {
        let symbol = self.symbols.get(id);
        match symbol.kind() {
            Kind::Var => Ok(()),
            Kind::Undef => Err(error!(UndefinedVariable; symbol.name())),
            _ => Err(error!(NotAVariable; symbol.name())),
        }
    }

    fn step(&mut self, delta: f64, pre: bool) -> Result<()> {
        let id = self.symbol_operand()?;
        self.verify(id)?;
        let symbol = self.symbols.get_mut(id);
        let old = symbol.val;
        symbol.val += delta;
        let v = if pre { symbol.val } else { old };
        self.push(v)
    }

    fn varread(&mut self) -> Result<()> {
        let id = self.symbol_operand()?;
        if !self.symbols.get(id).is_assignable() {
            return Err(error!(AssignmentToNonVariable; &self.name(id)));
        }
        let (val, found) = match self.console.read_line("$ ") {
            None => (0.0, 0.0),
            Some(line) => match line.trim().parse::<f64>() {
                Ok(v) => (v, 1.0),
                Err(_) => return Err(error!(NonNumberRead; &self.name(id))),
            },
        };
        let symbol = self.symbols.get_mut(id);
        symbol.val = val;
        symbol.kind = Kind::Var;
        self.push(found)
    }

    fn cond(&mut self, addr: Address) -> Result<bool> {
        self.exec(addr)?;
        Ok(self.pop()? != 0.0)
    }

    fn r#while(&mut self) -> Result<()> {
        let savepc = self.pc;
        while self.cond(savepc + 2)? {
            self.exec(savepc)?;
            if self.returning {
                return Ok(());
            }
        }
        self.pc = self.address_at(savepc + 1)?;
        Ok(())
    }

    fn r#for(&mut self) -> Result<()> {
        let savepc = self.pc;
        self.exec(savepc + 4)?;
        self.pop()?;
        while self.cond(savepc)? {
            self.exec(savepc + 2)?;
            if self.returning {
                return Ok(());
            }
            self.exec(savepc + 1)?;
            self.pop()?;
        }
        self.pc = self.address_at(savepc + 3)?;
        Ok(())
    }

    fn r#if(&mut self) -> Result<()> {
        let savepc = self.pc;
        if self.cond(savepc + 3)? {
            self.exec(savepc)?;
        } else if self.address_at(savepc + 1).is_ok() {
            self.exec(savepc + 1)?;
        }
        if !self.returning {
            self.pc = self.address_at(savepc + 2)?;
        }
        Ok(())
    }

    fn call(&mut self) -> Result<()> {
        let id = self.symbol_operand()?;
        let nargs = self.count_operand()?;
        if self.frames.is_full() {
            return Err(error!(CallNestedTooDeeply; &self.name(id)));
        }
        let defn = match self.symbols.get(id).defn() {
            Some(defn) => defn,
            None => return Err(error!(UndefinedFunction; &self.name(id))),
        };
        let argn = self.stack.len();
        if nargs > argn {
            return Err(error!(StackUnderflow));
        }
        self.frames.push(Frame {
            sym: id,
            nargs,
            retpc: self.pc,
            argn,
        })?;
        trace!(name = self.symbols.get(id).name(), nargs, "call");
        self.exec(defn)?;
        self.returning = false;
        Ok(())
    }

    fn frame(&self) -> Result<Frame> {
        match self.frames.last() {
            Some(frame) => Ok(*frame),
            None => Err(error!(InternalError; "return outside call")),
        }
    }

    fn ret(&mut self) -> Result<()> {
        let frame = self.frames.pop()?;
        if self.stack.len() != frame.argn {
            return Err(error!(InternalError; "unbalanced return"));
        }
        self.stack.truncate(frame.argn - frame.nargs)?;
        self.pc = frame.retpc;
        self.returning = true;
        trace!(name = self.symbols.get(frame.sym).name(), "return");
        Ok(())
    }

    fn arg_slot(&mut self) -> Result<usize> {
        let n = self.count_operand()?;
        let frame = self.frame()?;
        if n == 0 {
            return Err(error!(InternalError; "$0"));
        }
        if n > frame.nargs {
            return Err(error!(NotEnoughArguments; &self.name(frame.sym)));
        }
        Ok(frame.argn - frame.nargs + n - 1)
    }
}

fn truth(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}
