use super::LineNumber;

#[derive(Clone, PartialEq)]
pub struct Error {
    code: ErrorCode,
    line_number: LineNumber,
    message: String,
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($err:ident) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
    };
    ($err:ident, $line:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).in_line_number($line)
    };
    ($err:ident; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).message($msg)
    };
    ($err:ident, $line:expr; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_line_number($line)
            .message($msg)
    };
}

impl Error {
    pub fn new(code: ErrorCode) -> Error {
        Error {
            code,
            line_number: None,
            message: String::new(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn line_number(&self) -> LineNumber {
        self.line_number
    }

    pub fn is_compile_error(&self) -> bool {
        (self.code as u16) < 20
    }

    pub fn in_line_number(&self, line: LineNumber) -> Error {
        debug_assert!(self.line_number.is_none());
        Error {
            code: self.code,
            line_number: line,
            message: self.message.clone(),
        }
    }

    pub fn message(&self, message: &str) -> Error {
        debug_assert_eq!(self.message.len(), 0);
        Error {
            code: self.code,
            line_number: self.line_number,
            message: message.to_string(),
        }
    }
}

/// Compile errors are numbered below 20, runtime errors from 20 up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    SyntaxError = 2,
    IllegalCharacter = 3,
    DefinitionOnly = 4,
    StackOverflow = 20,
    StackUnderflow = 21,
    CallNestedTooDeeply = 22,
    ProgramTooBig = 23,
    DivisionByZero = 24,
    UndefinedVariable = 25,
    NotAVariable = 26,
    AssignmentToNonVariable = 27,
    NotEnoughArguments = 28,
    ProcedureReturnsValue = 29,
    FunctionReturnsNoValue = 30,
    UndefinedFunction = 31,
    DomainError = 32,
    RangeError = 33,
    NestedTooDeeply = 34,
    NonNumberRead = 35,
    Break = 36,
    InternalError = 51,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use ErrorCode::*;
        let code_str = match self {
            SyntaxError => "syntax error",
            IllegalCharacter => "illegal character",
            DefinitionOnly => "used outside definition",
            StackOverflow => "stack overflow",
            StackUnderflow => "stack underflow",
            CallNestedTooDeeply => "call nested too deeply",
            ProgramTooBig => "program too big",
            DivisionByZero => "division by zero",
            UndefinedVariable => "undefined variable",
            NotAVariable => "attempt to evaluate non-variable",
            AssignmentToNonVariable => "assignment to non-variable",
            NotEnoughArguments => "not enough arguments",
            ProcedureReturnsValue => "procedure returns value",
            FunctionReturnsNoValue => "function returns no value",
            UndefinedFunction => "undefined function",
            DomainError => "argument out of domain",
            RangeError => "result out of range",
            NestedTooDeeply => "nested too deeply",
            NonNumberRead => "non-number read into",
            Break => "break",
            InternalError => "internal error",
        };
        write!(f, "{}", code_str)
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {{ {} }}", self.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut suffix = String::new();
        if let Some(line_number) = self.line_number {
            suffix.push_str(&format!(" in line {}", line_number));
        }
        if !self.message.is_empty() {
            suffix.push_str(&format!("; {}", self.message));
        }
        write!(f, "{}{}", self.code, suffix)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(error!(DivisionByZero).to_string(), "division by zero");
        assert_eq!(
            error!(UndefinedVariable; "y").to_string(),
            "undefined variable; y"
        );
        assert_eq!(
            error!(SyntaxError, Some(3); "expected ')'").to_string(),
            "syntax error in line 3; expected ')'"
        );
    }

    #[test]
    fn test_compile_error_split() {
        assert!(error!(SyntaxError).is_compile_error());
        assert!(error!(IllegalCharacter).is_compile_error());
        assert!(!error!(StackOverflow).is_compile_error());
        assert!(!error!(Break).is_compile_error());
    }
}
