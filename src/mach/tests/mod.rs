use crate::mach::{Cell, CollectConsole, Opcode, Runtime};

mod codegen_test;

fn runtime() -> Runtime<CollectConsole> {
    Runtime::new(CollectConsole::new())
}

fn cell(runtime: &Runtime<CollectConsole>, addr: usize) -> Cell {
    match runtime.program().get(addr) {
        Some(cell) => cell.clone(),
        None => panic!("no cell at {}", addr),
    }
}

fn op(runtime: &Runtime<CollectConsole>, addr: usize) -> Opcode {
    match cell(runtime, addr) {
        Cell::Op(op) => op,
        c => panic!("{:?} at {} is not an operation", c, addr),
    }
}
