//! Request decoding for the dispatch loop.
//!
//! A request is one buffer holding a `header`/`body` envelope. Transports
//! deliver raw bytes, so decoding first trims NUL padding and checks the
//! encoding before the envelope is read.

use courier_wire::{Fragment, ShapeRules, read_fields};

use super::errors::DispatchError;

const ENVELOPE_FIELDS: &[&str] = &["header", "body"];
const ENVELOPE_SHAPES: ShapeRules<'static> = ShapeRules::objects(&["body"]);

/// Trims NUL padding from both ends of `bytes` and decodes them as UTF-8.
///
/// # Errors
///
/// Returns [`DispatchError::NotUtf8`] with the offset of the first invalid
/// byte, counted from the start of the trimmed request.
pub fn decode_request(bytes: &[u8]) -> Result<&str, DispatchError> {
    let start = bytes.iter().position(|byte| *byte != 0).unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|byte| *byte != 0)
        .map_or(start, |last| last + 1);
    let trimmed = bytes.get(start..end).unwrap_or_default();
    std::str::from_utf8(trimmed).map_err(|error| DispatchError::NotUtf8 {
        position: error.valid_up_to(),
    })
}

/// The routing envelope of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope<'a> {
    /// Command selector.
    pub header: &'a str,
    /// Command arguments, positioned against the original buffer.
    pub body: Fragment<'a>,
}

impl<'a> Envelope<'a> {
    /// Reads the envelope from a whole request buffer.
    ///
    /// One pair of braces around the entire message is accepted and ignored.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Wire`] when either field is missing, malformed
    /// or has the wrong shape.
    pub fn parse(buffer: &'a str) -> Result<Self, DispatchError> {
        let message = Fragment::new(buffer).strip_enclosing_braces();
        let fields = read_fields(message, 0, &ENVELOPE_SHAPES, ENVELOPE_FIELDS)?;
        Ok(Self {
            header: fields.scalar("header")?,
            body: fields.object("body")?,
        })
    }
}
