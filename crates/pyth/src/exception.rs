//! Error types for the interpreter.
//!
//! Two layers, following the split between what callers see and what the
//! evaluator threads internally:
//! - [`Error`] is the public error: a kind plus a message, printed by the
//!   CLI as `Kind: message`.
//! - [`RunError`] wraps `Error` together with the `Break` control signal,
//!   which only ever travels between the evaluator's loop frames and is
//!   converted before reaching the public API.

use std::fmt::{self, Write};

use strum::{Display, EnumString, IntoStaticStr};

use crate::value::Value;

/// Result type alias for operations that can produce a runtime error.
pub(crate) type RunResult<T> = Result<T, RunError>;

/// The class of a user-visible interpreter error.
///
/// Uses strum derives so the string representation matches the variant name
/// exactly (e.g. `BadTypeCombination` -> "BadTypeCombination").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Invalid byte in token position, or EOF where a token was required.
    LexerError,
    /// Arity/structure violations: block token as expression head, unknown
    /// operator, bad assignment target, else without a matching block.
    ParserError,
    /// An operator was invoked with a signature not in its dispatch table.
    BadTypeCombination,
    /// Sequence subscript out of range.
    IndexError,
    /// Lookup of an undefined variable.
    NameError,
    /// Domain errors: log of a non-positive number, factorial of a negative
    /// integer, shift by a negative count, break outside a loop.
    ValueError,
}

/// A user-visible interpreter error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    message: String,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Builds the error raised when no dispatch rule matches an operator's
    /// argument types. The message lists each argument with its repr and
    /// variant name, one per indented line.
    pub(crate) fn bad_type_combination(op: &str, args: &[&Value]) -> Self {
        let mut message = format!("\n    function '{op}'");
        for (i, arg) in args.iter().enumerate() {
            let _ = write!(
                message,
                "\n    arg {}: {}, type {}.",
                i + 1,
                arg.repr(),
                arg.variant_name()
            );
        }
        Self::new(ErrorKind::BadTypeCombination, message)
    }

    /// The class of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The human-readable message, without the kind prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for Error {}

/// Internal result payload of evaluation: either a real error or the break
/// control signal raised by `B` and consumed by the nearest enclosing loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RunError {
    /// `B` was evaluated; unwinds to the nearest `F`/`#` loop.
    Break,
    /// A genuine error; aborts the run unless a `#` loop swallows it.
    Raise(Error),
}

impl RunError {
    /// Converts the internal signal into the public error. A `Break` that
    /// escapes every loop is itself an error.
    pub(crate) fn into_error(self) -> Error {
        match self {
            Self::Break => Error::new(ErrorKind::ValueError, "break outside loop"),
            Self::Raise(err) => err,
        }
    }
}

impl From<Error> for RunError {
    fn from(err: Error) -> Self {
        Self::Raise(err)
    }
}

pub(crate) fn lexer_error(message: impl Into<String>) -> Error {
    Error::new(ErrorKind::LexerError, message)
}

pub(crate) fn parser_error(message: impl Into<String>) -> Error {
    Error::new(ErrorKind::ParserError, message)
}

pub(crate) fn index_error(message: impl Into<String>) -> RunError {
    Error::new(ErrorKind::IndexError, message).into()
}

pub(crate) fn name_error(name: &str) -> RunError {
    Error::new(ErrorKind::NameError, format!("name '{name}' is not defined")).into()
}

pub(crate) fn value_error(message: impl Into<String>) -> RunError {
    Error::new(ErrorKind::ValueError, message).into()
}
