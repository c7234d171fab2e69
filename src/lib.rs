//! # MiniC
//!
//! A small imperative language compiled to a flat instruction stream and
//! run on a stack virtual machine.
//!
//! ```
//! use minic::mach::{CollectConsole, Runtime};
//!
//! let mut r = Runtime::new(CollectConsole::new());
//! r.enter("func sq() return $1 * $1\nprint sq(7)").unwrap();
//! assert_eq!(r.console().output(), "49 ");
//! ```
//!
//! The language has numeric variables, arithmetic and logical operators,
//! `print`, `while`, `for`, `if`/`else`, the usual compound assignments,
//! increment and decrement, built-in math functions such as `sin` and
//! `sqrt`, and user-defined functions and procedures taking positional
//! arguments `$1`, `$2` and so on.

pub mod lang;
pub mod mach;
