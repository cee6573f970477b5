use std::fmt;
use std::ops::Range;

use crate::formatting::BoldDirection;

/// Result of applying a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Scalar-value ranges of the new text that were written. A deletion
    /// reports the empty range where the removed text used to be.
    pub changed: Vec<Range<usize>>,
    pub new_selection: Range<usize>,
    pub version: u64,
    /// Set for bold toggles that changed the document.
    pub direction: Option<BoldDirection>,
    pub notice: Option<Notice>,
}

impl Patch {
    /// True when the document was left untouched.
    pub fn is_noop(&self) -> bool {
        self.changed.is_empty()
    }
}

/// User-facing advisory produced instead of an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    SelectTextFirst,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::SelectTextFirst => write!(f, "Please select text to make it bold"),
        }
    }
}
