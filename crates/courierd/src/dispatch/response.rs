//! Reply writer for stream connections.
//!
//! A reply is the bare text produced by the dispatcher: the command's success
//! message or the rendered error. It is written once, after which the
//! connection is closed.

use std::io::Write;

use super::errors::DispatchError;

/// Writes replies to an output stream.
pub struct ResponseWriter<W> {
    writer: W,
}

impl<W: Write> ResponseWriter<W> {
    /// Creates a new response writer wrapping the given output stream.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes `reply` in full and flushes the stream.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Io`] if writing or flushing fails.
    pub fn write_reply(&mut self, reply: &str) -> Result<(), DispatchError> {
        self.writer.write_all(reply.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }

    /// Writes the text of `error` as the reply.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Io`] if writing fails.
    pub fn write_error(&mut self, error: &DispatchError) -> Result<(), DispatchError> {
        self.write_reply(&error.to_string())
    }
}
