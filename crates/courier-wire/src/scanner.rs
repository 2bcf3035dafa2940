//! Cursor primitives shared by the field and record readers.

/// Returns `true` for the whitespace bytes the format treats as insignificant.
#[must_use]
pub const fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r' | b'\n')
}

/// Advances `pos` past spaces, tabs, carriage returns and line feeds.
///
/// Returns `pos` unchanged when it already points at a significant byte or
/// lies at or beyond the end of `bytes`.
#[must_use]
pub fn skip_whitespace(bytes: &[u8], pos: usize) -> usize {
    scan_until(bytes, pos, |byte| !is_whitespace(byte))
}

/// Advances `pos` until `stop` matches a byte or the end of `bytes` is reached.
#[must_use]
pub fn scan_until(bytes: &[u8], pos: usize, stop: impl Fn(u8) -> bool) -> usize {
    let rest = bytes.get(pos..).unwrap_or_default();
    rest.iter()
        .position(|byte| stop(*byte))
        .map_or(pos.max(bytes.len()), |offset| pos + offset)
}
