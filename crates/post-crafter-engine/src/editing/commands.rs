use std::ops::Range;

use crate::editing::{EditError, Notice};
use crate::formatting::{BoldDirection, checked_byte_range, toggle_direction, transcode};

/// Edit operations understood by [`Document::apply`](crate::editing::Document::apply).
///
/// Every range is a scalar-value span of the current text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    /// Bold the selection, or un-bold it when it is already bold.
    ToggleBold { range: Range<usize> },
    /// Replace `range` with `text`. An empty range inserts at the caret.
    InsertText { range: Range<usize>, text: String },
    /// Delete `range`, or the character before the caret when it is empty.
    DeleteBackward { range: Range<usize> },
}

/// A command lowered to a single replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Replacement {
    /// Scalar-value span of the old text to replace.
    pub(crate) range: Range<usize>,
    /// Byte span of the same text.
    pub(crate) bytes: Range<usize>,
    pub(crate) text: String,
    pub(crate) selection: Range<usize>,
    pub(crate) direction: Option<BoldDirection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Compiled {
    Replace(Replacement),
    Notice(Notice),
    Noop,
}

pub(crate) fn compile_command(text: &str, cmd: &Cmd) -> Result<Compiled, EditError> {
    match cmd {
        Cmd::ToggleBold { range } => {
            let bytes = checked_byte_range(text, range.start, range.end)?;
            if range.is_empty() {
                return Ok(Compiled::Notice(Notice::SelectTextFirst));
            }

            let direction = toggle_direction(&text[bytes.clone()]);
            let replacement = transcode(&text[bytes.clone()], direction);
            let end = range.start + replacement.chars().count();

            Ok(Compiled::Replace(Replacement {
                range: range.clone(),
                bytes,
                text: replacement,
                selection: range.start..end,
                direction: Some(direction),
            }))
        }
        Cmd::InsertText { range, text: inserted } => {
            let bytes = checked_byte_range(text, range.start, range.end)?;
            if range.is_empty() && inserted.is_empty() {
                return Ok(Compiled::Noop);
            }

            let caret = range.start + inserted.chars().count();
            Ok(Compiled::Replace(Replacement {
                range: range.clone(),
                bytes,
                text: inserted.clone(),
                selection: caret..caret,
                direction: None,
            }))
        }
        Cmd::DeleteBackward { range } => {
            checked_byte_range(text, range.start, range.end)?;
            let range = match (range.is_empty(), range.start) {
                (false, _) => range.clone(),
                (true, 0) => return Ok(Compiled::Noop),
                (true, caret) => caret - 1..caret,
            };
            let bytes = checked_byte_range(text, range.start, range.end)?;

            Ok(Compiled::Replace(Replacement {
                range: range.clone(),
                bytes,
                text: String::new(),
                selection: range.start..range.start,
                direction: None,
            }))
        }
    }
}
