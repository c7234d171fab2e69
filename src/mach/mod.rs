/*!
## Rust Machine Module

This Rust module is a code generator and stack virtual machine for MiniC.

*/

pub type Address = usize;

mod codegen;
mod format;
mod function;
mod io;
mod limits;
mod opcode;
mod program;
mod runtime;
mod stack;
mod symbol;

pub use codegen::codegen;
pub use format::format_g;
pub use function::Builtin;
pub use function::Function;
pub use io::CollectConsole;
pub use io::Console;
pub use io::StdConsole;
pub use limits::Limits;
pub use opcode::Cell;
pub use opcode::Opcode;
pub use program::Program;
pub use runtime::Runtime;
pub use stack::Stack;
pub use symbol::Kind;
pub use symbol::Symbol;
pub use symbol::SymbolId;
pub use symbol::Symbols;

#[cfg(test)]
mod tests;
