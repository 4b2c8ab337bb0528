//! Output handling for auto-print and the `p` operator.
//!
//! Pyth programs produce output implicitly (top-level expressions are
//! auto-printed) and explicitly (`p`). Both paths go through a
//! [`PrintWriter`], so hosts can capture output instead of writing to the
//! process stdout.

use std::{
    borrow::Cow,
    io::{self, Write as _},
};

use crate::exception::Error;

/// Trait for handling interpreter output.
///
/// Implement this to capture or redirect output from Pyth code. The default
/// implementation [`StdPrint`] writes to stdout.
pub trait PrintWriter {
    /// Called with the rendered text of one printed value, without any
    /// trailing newline. Newlines are emitted separately via [`stdout_push`].
    ///
    /// [`stdout_push`]: PrintWriter::stdout_push
    fn stdout_write(&mut self, output: Cow<'_, str>) -> Result<(), Error>;

    /// Add a single character to stdout. Used for the newline after an
    /// auto-printed value.
    fn stdout_push(&mut self, end: char) -> Result<(), Error>;
}

/// Default `PrintWriter` that writes directly to the process stdout.
#[derive(Debug, Default)]
pub struct StdPrint;

impl PrintWriter for StdPrint {
    fn stdout_write(&mut self, output: Cow<'_, str>) -> Result<(), Error> {
        let _ = io::stdout().write_all(output.as_bytes());
        Ok(())
    }

    fn stdout_push(&mut self, end: char) -> Result<(), Error> {
        let mut buf = [0_u8; 4];
        let _ = io::stdout().write_all(end.encode_utf8(&mut buf).as_bytes());
        Ok(())
    }
}

/// A `PrintWriter` that collects all output into a string.
///
/// Used by [`interpret`](crate::interpret) and throughout the test suite to
/// compare captured output against expectations.
#[derive(Debug, Default)]
pub struct CollectStringPrint(String);

impl CollectStringPrint {
    /// Creates a new empty `CollectStringPrint`.
    #[must_use]
    pub fn new() -> Self {
        Self(String::new())
    }

    /// Returns the collected output as a string slice.
    #[must_use]
    pub fn output(&self) -> &str {
        self.0.as_str()
    }

    /// Consumes the writer and returns the collected output.
    #[must_use]
    pub fn into_output(self) -> String {
        self.0
    }
}

impl PrintWriter for CollectStringPrint {
    fn stdout_write(&mut self, output: Cow<'_, str>) -> Result<(), Error> {
        self.0.push_str(&output);
        Ok(())
    }

    fn stdout_push(&mut self, end: char) -> Result<(), Error> {
        self.0.push(end);
        Ok(())
    }
}

/// `PrintWriter` that ignores all output.
///
/// Useful for suppressing output during testing or benchmarking.
#[derive(Debug, Default)]
pub struct NoPrint;

impl PrintWriter for NoPrint {
    fn stdout_write(&mut self, _output: Cow<'_, str>) -> Result<(), Error> {
        Ok(())
    }

    fn stdout_push(&mut self, _end: char) -> Result<(), Error> {
        Ok(())
    }
}
