//! # minic
//!
//! Runs a MiniC source file, or an interactive prompt when given none.
//!

mod term;

fn main() {
    term::main();
}
