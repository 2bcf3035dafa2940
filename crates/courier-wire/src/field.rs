//! Single `key: value` pair reader.
//!
//! The reader is a single pass over the fragment with no tokenizer: the value
//! shape is chosen by its first significant byte and the value body is found
//! by scanning for the matching terminator. Object bodies are matched by
//! counting brace depth alone: quotes are not tracked at this level, so an
//! unclosed quote inside an object surfaces when the nested fragment is read.

use crate::error::WireError;
use crate::fragment::Fragment;
use crate::scanner::{is_whitespace, scan_until, skip_whitespace};

/// The shape of a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// A double-quoted string.
    Quoted,
    /// An unquoted run terminated by `,` or the end of the fragment.
    Bare,
    /// A brace-delimited nested object.
    Object,
}

/// One decoded field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field<'a> {
    key: &'a str,
    key_start: usize,
    shape: Shape,
    value: Fragment<'a>,
    value_start: usize,
}

impl<'a> Field<'a> {
    /// The field name.
    #[must_use]
    pub const fn key(&self) -> &'a str {
        self.key
    }

    /// Absolute offset where the key starts.
    #[must_use]
    pub const fn key_start(&self) -> usize {
        self.key_start
    }

    /// The value shape.
    #[must_use]
    pub const fn shape(&self) -> Shape {
        self.shape
    }

    /// Returns `true` when the value is a nested object.
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self.shape, Shape::Object)
    }

    /// The value text, exclusive of its delimiters.
    #[must_use]
    pub const fn value(&self) -> &'a str {
        self.value.text()
    }

    /// The value as a fragment anchored at its absolute offset.
    ///
    /// For objects this is the body between the braces, ready to be handed to
    /// [`crate::read_fields`].
    #[must_use]
    pub const fn value_fragment(&self) -> Fragment<'a> {
        self.value
    }

    /// Absolute offset of the value's first character: the opening quote or
    /// brace, or the first character of a bare value.
    #[must_use]
    pub const fn value_start(&self) -> usize {
        self.value_start
    }
}

/// A field together with the local offset just past its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadField<'a> {
    /// The decoded field.
    pub field: Field<'a>,
    /// Local offset immediately after the consumed value.
    pub end: usize,
}

/// Reads one `key: value` pair starting at local offset `pos`.
///
/// # Errors
///
/// Returns [`WireError::EmptyKey`] when no key is present,
/// [`WireError::MissingDelimiter`] when the `:` separator or the value
/// terminator is absent, and [`WireError::MissingValue`] when the fragment ends
/// before a value starts.
pub fn read_field(fragment: Fragment<'_>, pos: usize) -> Result<ReadField<'_>, WireError> {
    let bytes = fragment.bytes();
    let (key, key_start, key_end) = read_key(fragment, pos)?;

    let separator = skip_whitespace(bytes, key_end);
    if fragment.byte_at(separator) != Some(b':') {
        return Err(WireError::missing_delimiter(
            ':',
            fragment.absolute(separator),
        ));
    }

    let value_start = skip_whitespace(bytes, separator + 1);
    let (shape, value, end) = match fragment.byte_at(value_start) {
        None => {
            return Err(WireError::MissingValue {
                key: key.to_owned(),
                position: fragment.absolute(value_start),
            });
        }
        Some(b'"') => read_quoted(fragment, value_start)?,
        Some(b'{') => read_object(fragment, value_start)?,
        Some(_) => read_bare(fragment, key, value_start)?,
    };

    Ok(ReadField {
        field: Field {
            key,
            key_start: fragment.absolute(key_start),
            shape,
            value,
            value_start: fragment.absolute(value_start),
        },
        end,
    })
}

/// Reads a key, which is either a bare run or a quoted name.
fn read_key(fragment: Fragment<'_>, pos: usize) -> Result<(&str, usize, usize), WireError> {
    let bytes = fragment.bytes();
    let start = skip_whitespace(bytes, pos);

    if fragment.byte_at(start) == Some(b'"') {
        let close = scan_until(bytes, start + 1, |byte| byte == b'"');
        if fragment.byte_at(close).is_none() {
            return Err(WireError::missing_delimiter('"', fragment.absolute(close)));
        }
        let key = fragment.slice(start + 1, close).text();
        if key.is_empty() {
            return Err(WireError::EmptyKey {
                position: fragment.absolute(start),
            });
        }
        return Ok((key, start, close + 1));
    }

    let end = scan_until(bytes, start, |byte| is_whitespace(byte) || byte == b':');
    if end == start {
        return Err(WireError::EmptyKey {
            position: fragment.absolute(start),
        });
    }
    Ok((fragment.slice(start, end).text(), start, end))
}

type Value<'a> = (Shape, Fragment<'a>, usize);

fn read_quoted(fragment: Fragment<'_>, open: usize) -> Result<Value<'_>, WireError> {
    let close = scan_until(fragment.bytes(), open + 1, |byte| byte == b'"');
    if fragment.byte_at(close) != Some(b'"') {
        return Err(WireError::missing_delimiter('"', fragment.absolute(close)));
    }
    Ok((Shape::Quoted, fragment.slice(open + 1, close), close + 1))
}

fn read_object(fragment: Fragment<'_>, open: usize) -> Result<Value<'_>, WireError> {
    let close = matching_brace(fragment.bytes(), open)
        .ok_or_else(|| WireError::missing_delimiter('}', fragment.absolute(fragment.len())))?;
    Ok((Shape::Object, fragment.slice(open + 1, close), close + 1))
}

fn read_bare<'a>(fragment: Fragment<'a>, key: &str, start: usize) -> Result<Value<'a>, WireError> {
    let bytes = fragment.bytes();
    let end = scan_until(bytes, start, |byte| byte == b',');
    let trimmed_end = bytes
        .get(start..end)
        .and_then(|run| run.iter().rposition(|byte| !is_whitespace(*byte)))
        .map_or(start, |last| start + last + 1);
    if trimmed_end == start {
        return Err(WireError::MissingValue {
            key: key.to_owned(),
            position: fragment.absolute(start),
        });
    }
    Ok((Shape::Bare, fragment.slice(start, trimmed_end), end))
}

/// Finds the local offset of the brace closing the one at `open`.
pub(crate) fn matching_brace(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0_usize;
    for (offset, byte) in bytes.get(open..)?.iter().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }
    None
}
