//! Runtime errors
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigError,
    DivideByZero,
    Encoding,
    HeaderViolation,
    IllegalMemoryAccess,
    Interpreter,
    InvalidAbbreviation,
    InvalidAddress,
    InvalidLocalVariable,
    InvalidObject,
    InvalidObjectAttribute,
    InvalidObjectProperty,
    InvalidObjectTree,
    InvalidRoutine,
    PropertySize,
    ReturnNoCaller,
    SnapshotMismatch,
    StackOverflow,
    StackUnderflow,
    UnimplementedInstruction,
    UnsupportedVersion,
}

/// A runtime error.
///
/// Every error aborts the current [execute](crate::zmachine::ZMachine::execute)
/// invocation; machine state is left as it was when the error was raised and
/// the embedder may recover by restoring a snapshot.
pub struct RuntimeError {
    /// Error code
    code: ErrorCode,
    /// Error message
    message: String,
}

impl RuntimeError {
    /// Constructor
    ///
    /// # Arguments
    /// * `code` - Error code
    /// * `message` - Error message
    pub fn fatal(code: ErrorCode, message: String) -> RuntimeError {
        RuntimeError { code, message }
    }

    /// Get the error code
    ///
    /// # Returns
    /// Error code
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the error message
    ///
    /// # Returns
    /// Error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[macro_export]
macro_rules! fatal_error {
    ($code:expr, $($arg:tt)*) => {
        Err(RuntimeError::fatal($code, format!($($arg)*)))
    };
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{:?}]: {}", self.code, self.message)
    }
}

impl fmt::Debug for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{:?}]: {}", self.code, self.message)
    }
}
