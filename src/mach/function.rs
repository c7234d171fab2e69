use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// Native unary function bound to a builtin symbol.
pub type Builtin = fn(f64) -> Result<f64>;

pub struct Function {}

impl Function {
    pub const BUILTINS: [(&'static str, Builtin); 14] = [
        ("sin", Function::sin),
        ("cos", Function::cos),
        ("atan", Function::atan),
        ("asin", Function::asin),
        ("acos", Function::acos),
        ("sinh", Function::sinh),
        ("cosh", Function::cosh),
        ("tanh", Function::tanh),
        ("log", Function::log),
        ("log10", Function::log10),
        ("exp", Function::exp),
        ("sqrt", Function::sqrt),
        ("int", Function::int),
        ("abs", Function::abs),
    ];

    pub const CONSTANTS: [(&'static str, f64); 5] = [
        ("PI", std::f64::consts::PI),
        ("E", std::f64::consts::E),
        ("GAMMA", 0.577_215_664_901_532_860_6),
        ("DEG", 57.295_779_513_082_320_876_8),
        ("PHI", 1.618_033_988_749_894_848_2),
    ];

    /// Rejects NaN produced from a number and infinity produced from a finite value.
    pub fn checked(name: &str, x: f64, result: f64) -> Result<f64> {
        if result.is_nan() && !x.is_nan() {
            Err(error!(DomainError; name))
        } else if result.is_infinite() && x.is_finite() {
            Err(error!(RangeError; name))
        } else {
            Ok(result)
        }
    }

    pub fn sin(x: f64) -> Result<f64> {
        Function::checked("sin", x, x.sin())
    }
    pub fn cos(x: f64) -> Result<f64> {
        Function::checked("cos", x, x.cos())
    }
    pub fn atan(x: f64) -> Result<f64> {
        Function::checked("atan", x, x.atan())
    }
    pub fn asin(x: f64) -> Result<f64> {
        Function::checked("asin", x, x.asin())
    }
    pub fn acos(x: f64) -> Result<f64> {
        Function::checked("acos", x, x.acos())
    }
    pub fn sinh(x: f64) -> Result<f64> {
        Function::checked("sinh", x, x.sinh())
    }
    pub fn cosh(x: f64) -> Result<f64> {
        Function::checked("cosh", x, x.cosh())
    }
    pub fn tanh(x: f64) -> Result<f64> {
        Function::checked("tanh", x, x.tanh())
    }
    pub fn log(x: f64) -> Result<f64> {
        if x <= 0.0 {
            return Err(error!(DomainError; "log"));
        }
        Function::checked("log", x, x.ln())
    }
    pub fn log10(x: f64) -> Result<f64> {
        if x <= 0.0 {
            return Err(error!(DomainError; "log10"));
        }
        Function::checked("log10", x, x.log10())
    }
    pub fn exp(x: f64) -> Result<f64> {
        Function::checked("exp", x, x.exp())
    }
    pub fn sqrt(x: f64) -> Result<f64> {
        Function::checked("sqrt", x, x.sqrt())
    }
    pub fn int(x: f64) -> Result<f64> {
        if x.is_nan() {
            return Err(error!(DomainError; "int"));
        }
        if x.is_infinite() {
            return Err(error!(RangeError; "int"));
        }
        Ok(x.trunc())
    }
    pub fn abs(x: f64) -> Result<f64> {
        Ok(x.abs())
    }
}
