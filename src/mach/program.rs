use super::{format_g, Address, Cell, Symbols};
use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// ## Instruction stream
///
/// Append-only and bounded. Definitions stay below the base; the
/// top-level code of the current unit lives above it and can be rewound.
#[derive(Debug, Clone)]
pub struct Program {
    cells: Vec<Cell>,
    max_len: usize,
    base: Address,
}

impl Program {
    pub fn new(max_len: usize) -> Program {
        Program {
            cells: vec![],
            max_len,
            base: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, addr: Address) -> Option<&Cell> {
        self.cells.get(addr)
    }

    /// The generation cursor: first cell after the last definition.
    pub fn base(&self) -> Address {
        self.base
    }

    pub fn push<T: Into<Cell>>(&mut self, cell: T) -> Result<Address> {
        if self.cells.len() >= self.max_len {
            return Err(error!(ProgramTooBig));
        }
        self.cells.push(cell.into());
        Ok(self.cells.len() - 1)
    }

    /// Fills in a cell emitted earlier as a placeholder.
    pub fn patch(&mut self, addr: Address, cell: Cell) -> Result<()> {
        match self.cells.get_mut(addr) {
            Some(slot) => {
                *slot = cell;
                Ok(())
            }
            None => Err(error!(InternalError; "patch out of range")),
        }
    }

    /// Seals everything emitted since the base as a definition and
    /// returns its start address.
    pub fn define(&mut self) -> Address {
        let start = self.base;
        self.base = self.cells.len();
        start
    }

    /// Discards top-level code, keeping definitions.
    pub fn rewind(&mut self) {
        self.cells.truncate(self.base);
    }

    pub fn listing(&self, symbols: &Symbols) -> String {
        let mut s = String::new();
        for (addr, cell) in self.cells.iter().enumerate() {
            let text = match cell {
                Cell::Op(op) => op.to_string(),
                Cell::Number(n) => format_g(*n),
                Cell::Symbol(id) => {
                    let symbol = symbols.get(*id);
                    if symbol.name().is_empty() {
                        format!("<{}>", symbol.kind())
                    } else {
                        symbol.name().to_string()
                    }
                }
                Cell::Text(t) => format!("\"{}\"", t),
                Cell::Count(n) => n.to_string(),
                Cell::Address(a) => format!("@{}", a),
                Cell::Stop => "STOP".to_string(),
            };
            s.push_str(&format!("{}\t{}\n", addr, text));
        }
        s
    }}
