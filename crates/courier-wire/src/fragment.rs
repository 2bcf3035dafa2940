//! Offset-carrying views into a request buffer.
//!
//! A [`Fragment`] pairs a slice of the request with the absolute offset of its
//! first byte. Readers operate on local offsets and translate through the
//! fragment whenever a position leaves the reader, so nested objects report
//! positions against the original buffer without any caller arithmetic.

use crate::field::matching_brace;
use crate::scanner::{is_whitespace, skip_whitespace};

/// A borrowed slice of a request buffer together with its absolute offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment<'a> {
    text: &'a str,
    base: usize,
}

impl<'a> Fragment<'a> {
    /// Wraps a whole top-level buffer; its base offset is zero.
    #[must_use]
    pub const fn new(text: &'a str) -> Self {
        Self { text, base: 0 }
    }

    /// Wraps a slice whose first byte lives at `base` in the original buffer.
    #[must_use]
    pub const fn with_base(text: &'a str, base: usize) -> Self {
        Self { text, base }
    }

    /// Returns the borrowed text.
    #[must_use]
    pub const fn text(&self) -> &'a str {
        self.text
    }

    /// Returns the text as bytes.
    #[must_use]
    pub const fn bytes(&self) -> &'a [u8] {
        self.text.as_bytes()
    }

    /// Absolute offset of the first byte.
    #[must_use]
    pub const fn base(&self) -> usize {
        self.base
    }

    /// Length of the fragment in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns `true` when the fragment holds no text.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Translates a local offset into an absolute one.
    #[must_use]
    pub const fn absolute(&self, local: usize) -> usize {
        self.base + local
    }

    /// Returns the sub-fragment spanning `start..end` in local offsets.
    ///
    /// Out-of-range or non-boundary offsets yield an empty fragment anchored at
    /// `start`; readers only slice at ASCII delimiters, which are always
    /// character boundaries.
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> Self {
        let text = self.text.get(start..end).unwrap_or_default();
        Self::with_base(text, self.absolute(start))
    }

    /// Returns the byte at a local offset, if any.
    #[must_use]
    pub fn byte_at(&self, local: usize) -> Option<u8> {
        self.bytes().get(local).copied()
    }

    /// Strips one pair of braces enclosing the whole fragment.
    ///
    /// Requests may arrive wrapped as `{ header: ..., body: {...} }`. When the
    /// first significant byte is `{` and its matching `}` is the last
    /// significant byte, the body between them is returned; otherwise the
    /// fragment is returned unchanged.
    #[must_use]
    pub fn strip_enclosing_braces(&self) -> Self {
        let bytes = self.bytes();
        let open = skip_whitespace(bytes, 0);
        if self.byte_at(open) != Some(b'{') {
            return *self;
        }
        let Some(last) = bytes.iter().rposition(|byte| !is_whitespace(*byte)) else {
            return *self;
        };
        match matching_brace(bytes, open) {
            Some(close) if close == last => self.slice(open + 1, close),
            _ => *self,
        }
    }
}

impl<'a> From<&'a str> for Fragment<'a> {
    fn from(text: &'a str) -> Self {
        Self::new(text)
    }
}

impl AsRef<str> for Fragment<'_> {
    fn as_ref(&self) -> &str {
        self.text
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn slices_keep_absolute_offsets() {
        let outer = Fragment::with_base("abcdef", 10);
        let inner = outer.slice(2, 5);
        assert_eq!(inner.text(), "cde");
        assert_eq!(inner.base(), 12);
        assert_eq!(inner.absolute(1), 13);
    }

    #[test]
    fn out_of_range_slice_is_empty() {
        let fragment = Fragment::new("abc");
        let slice = fragment.slice(2, 9);
        assert!(slice.is_empty());
        assert_eq!(slice.base(), 2);
    }

    #[rstest]
    #[case(" { header: \"x\" } ", " header: \"x\" ", 2)]
    #[case("{a: {b: \"c\"}}", "a: {b: \"c\"}", 1)]
    fn strips_braces_around_whole_message(
        #[case] input: &str,
        #[case] inner: &str,
        #[case] base: usize,
    ) {
        let stripped = Fragment::new(input).strip_enclosing_braces();
        assert_eq!(stripped.text(), inner);
        assert_eq!(stripped.base(), base);
    }

    #[rstest]
    #[case("header: \"x\", body: {}")]
    #[case("{ a: \"x\" }, body: {}")]
    #[case("{ unclosed")]
    #[case("")]
    fn leaves_unwrapped_messages_alone(#[case] input: &str) {
        let fragment = Fragment::new(input);
        assert_eq!(fragment.strip_enclosing_braces(), fragment);
    }
}
