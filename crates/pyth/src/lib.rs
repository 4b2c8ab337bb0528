//! An interpreter for the Pyth code-golf language.
//!
//! Pyth source is a dense stream of one- and two-byte operator tokens with
//! no delimiters: each operator consumes exactly its declared number of
//! argument expressions. The pipeline is
//! `source bytes -> preprocessor -> token stream -> AST -> evaluation`,
//! with top-level expression results auto-printed unless suppressed.
//!
//! ```
//! let (output, error) = pyth::interpret(b"*3\"ni\"", "");
//! assert!(error.is_none());
//! assert_eq!(output, "ninini\n");
//! ```

mod builtins;
mod exception;
mod expressions;
mod io;
mod lexer;
mod number;
mod parse;
mod run;
mod value;

pub use crate::{
    exception::{Error, ErrorKind},
    io::{CollectStringPrint, NoPrint, PrintWriter, StdPrint},
    run::{Runner, interpret},
};
