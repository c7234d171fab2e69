#![allow(dead_code)]
use minic::mach::{CollectConsole, Limits, Runtime};

pub fn runtime() -> Runtime<CollectConsole> {
    Runtime::new(CollectConsole::new())
}

pub fn runtime_with(limits: Limits) -> Runtime<CollectConsole> {
    Runtime::with_limits(CollectConsole::new(), limits)
}

pub fn runtime_reading(lines: &[&str]) -> Runtime<CollectConsole> {
    Runtime::new(CollectConsole::with_input(lines.iter().copied()))
}

/// Runs `source` and returns what it printed, followed by `?error` if it failed.
pub fn exec(runtime: &mut Runtime<CollectConsole>, source: &str) -> String {
    let result = runtime.enter(source);
    let mut s = runtime.console_mut().take_output();
    if let Err(error) = result {
        s.push_str(&format!("?{}\n", error));
    }
    s
}
