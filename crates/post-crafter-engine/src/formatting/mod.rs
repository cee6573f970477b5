//! Plain-text formatting for post captions.
//!
//! Social feeds strip markup, so "bold" is expressed by swapping ASCII
//! letters and digits for their counterparts in the Mathematical
//! Alphanumeric Symbols block. All offsets in this module count Unicode
//! scalar values, never bytes.

pub mod bold;
pub mod emoji;

pub use bold::{
    BOLD_RANGES, BoldDirection, BoldRange, BoldToggle, apply_bold, is_bold_char, remove_bold,
    toggle_bold, toggle_direction, transcode,
};
pub use emoji::{EMOJI_PALETTE, insert_at, replace_range};

use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("range {start}..{end} is outside a buffer of {len} characters")]
    InvalidRange { start: usize, end: usize, len: usize },
}

/// Byte offset of the scalar value at `index`, or the buffer length when
/// `index` is one past the end.
pub(crate) fn byte_offset(text: &str, index: usize) -> Option<usize> {
    text.char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(text.len()))
        .nth(index)
}

/// Validate a scalar-value span and convert it to a byte range.
pub(crate) fn checked_byte_range(
    text: &str,
    start: usize,
    end: usize,
) -> Result<Range<usize>, FormatError> {
    let invalid = || FormatError::InvalidRange {
        start,
        end,
        len: text.chars().count(),
    };
    if start > end {
        return Err(invalid());
    }
    let byte_start = byte_offset(text, start).ok_or_else(invalid)?;
    let byte_end = byte_offset(text, end).ok_or_else(invalid)?;
    Ok(byte_start..byte_end)
}
