use super::{Address, SymbolId};
use std::rc::Rc;

/// ## Virtual machine instruction set
///
/// The MiniC virtual machine has no registers.
/// Every operation is performed on the operand stack.
///
/// For example: `x = 3 * y` compiles to
/// `[CONSTPUSH 3, VARPUSH y, EVAL, MUL, VARPUSH x, ASSIGN, POP]`
///
/// Operations that take operands read them from the cells that follow.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    // *** Stack manipulation
    /// `[CONSTPUSH, number]` Push a literal.
    ConstPush,
    /// `[VARPUSH, symbol]` Push a symbol reference. Infallible.
    VarPush,
    /// Replace a symbol reference with its value.
    Eval,
    Pop,

    // *** Expression operations
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    And,
    Or,
    Negate,
    Not,

    // *** Assignment, target reference on top of the value
    Assign,
    AddEq,
    SubEq,
    MulEq,
    DivEq,
    ModEq,
    /// `[PREINC, symbol]`
    PreInc,
    PreDec,
    PostInc,
    PostDec,

    /// `[BLTIN, symbol]`
    Bltin,

    // *** Input and output
    PrExpr,
    /// `[PRSTR, text]`
    PrStr,
    /// Pop and echo as a tab-indented value, remembering it in `_`.
    PrintTop,
    /// `[VARREAD, symbol]`
    VarRead,

    // *** Branch control
    /// `[WHILE, body, end]` cond STOP body STOP
    While,
    /// `[FOR, cond, post, body, end]` init STOP cond STOP post STOP body STOP
    For,
    /// `[IF, then, else, end]` cond STOP then STOP else STOP
    If,

    // *** Calls
    /// `[CALL, symbol, count]`
    Call,
    FuncRet,
    ProcRet,
    /// `[ARG, n]`
    Arg,
    /// `[ARGASSIGN, n]`
    ArgAssign,
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Opcode::*;
        let s = match self {
            ConstPush => "CONSTPUSH",
            VarPush => "VARPUSH",
            Eval => "EVAL",
            Pop => "POP",

            Add => "ADD",
            Sub => "SUB",
            Mul => "MUL",
            Div => "DIV",
            Mod => "MOD",
            Pow => "POW",
            Lt => "LT",
            Le => "LE",
            Gt => "GT",
            Ge => "GE",
            Eq => "EQ",
            Ne => "NE",
            And => "AND",
            Or => "OR",
            Negate => "NEGATE",
            Not => "NOT",

            Assign => "ASSIGN",
            AddEq => "ADDEQ",
            SubEq => "SUBEQ",
            MulEq => "MULEQ",
            DivEq => "DIVEQ",
            ModEq => "MODEQ",
            PreInc => "PREINC",
            PreDec => "PREDEC",
            PostInc => "POSTINC",
            PostDec => "POSTDEC",

            Bltin => "BLTIN",

            PrExpr => "PREXPR",
            PrStr => "PRSTR",
            PrintTop => "PRINTTOP",
            VarRead => "VARREAD",

            While => "WHILE",
            For => "FOR",
            If => "IF",

            Call => "CALL",
            FuncRet => "FUNCRET",
            ProcRet => "PROCRET",
            Arg => "ARG",
            ArgAssign => "ARGASSIGN",
        };
        write!(f, "{}", s)
    }
}

/// One slot of the instruction stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Op(Opcode),
    Number(f64),
    Symbol(SymbolId),
    Text(Rc<str>),
    Count(usize),
    Address(Address),
    Stop,
}

impl From<Opcode> for Cell {
    fn from(op: Opcode) -> Cell {
        Cell::Op(op)
    }
}
