use crate::formatting::{FormatError, checked_byte_range};

/// One plain ASCII run and where its bold counterpart starts in the
/// Mathematical Alphanumeric Symbols block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoldRange {
    pub plain_start: char,
    pub plain_end: char,
    pub bold_start: u32,
}

impl BoldRange {
    const fn new(plain_start: char, plain_end: char, bold_start: u32) -> Self {
        Self {
            plain_start,
            plain_end,
            bold_start,
        }
    }

    /// Number of code points covered, identical on the plain and bold side.
    pub const fn len(&self) -> u32 {
        self.plain_end as u32 - self.plain_start as u32 + 1
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Last bold code point (inclusive).
    pub const fn bold_end(&self) -> u32 {
        self.bold_start + self.len() - 1
    }

    fn contains_plain(&self, ch: char) -> bool {
        (self.plain_start..=self.plain_end).contains(&ch)
    }

    fn contains_bold(&self, ch: char) -> bool {
        (self.bold_start..=self.bold_end()).contains(&(ch as u32))
    }

    fn embolden(&self, ch: char) -> char {
        let code = ch as u32 - self.plain_start as u32 + self.bold_start;
        char::from_u32(code).unwrap_or(ch)
    }

    fn plain(&self, ch: char) -> char {
        let code = ch as u32 - self.bold_start + self.plain_start as u32;
        char::from_u32(code).unwrap_or(ch)
    }
}

/// Uppercase, lowercase, digits. Disjoint on both sides.
pub const BOLD_RANGES: [BoldRange; 3] = [
    BoldRange::new('A', 'Z', 0x1D5D4),
    BoldRange::new('a', 'z', 0x1D5EE),
    BoldRange::new('0', '9', 0x1D7CE),
];

/// Which way a toggle went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoldDirection {
    Apply,
    Remove,
}

/// Outcome of [`toggle_bold`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoldToggle {
    /// Empty selection; the buffer is untouched and the caller should ask
    /// the user to select something.
    NothingSelected,
    Toggled {
        buffer: String,
        /// Scalar-value index to restore the selection end to.
        selection_end: usize,
        direction: BoldDirection,
    },
}

pub fn is_bold_char(ch: char) -> bool {
    BOLD_RANGES.iter().any(|range| range.contains_bold(ch))
}

/// Map a single ASCII letter or digit to its bold form. Anything else is
/// returned as is.
pub fn bold_char(ch: char) -> char {
    BOLD_RANGES
        .iter()
        .find(|range| range.contains_plain(ch))
        .map_or(ch, |range| range.embolden(ch))
}

/// Inverse of [`bold_char`].
pub fn unbold_char(ch: char) -> char {
    BOLD_RANGES
        .iter()
        .find(|range| range.contains_bold(ch))
        .map_or(ch, |range| range.plain(ch))
}

pub fn apply_bold(text: &str) -> String {
    text.chars().map(bold_char).collect()
}

pub fn remove_bold(text: &str) -> String {
    text.chars().map(unbold_char).collect()
}

/// Decide what a toggle over `text` should do.
///
/// Only ASCII alphanumerics and bold characters vote. The text counts as
/// bold when at least one of them is present and all of them are bold.
/// A mix of plain and bold alphanumerics therefore applies bold, which
/// leaves the already-bold characters as they are.
pub fn toggle_direction(text: &str) -> BoldDirection {
    let mut voters = text
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || is_bold_char(*ch))
        .peekable();

    if voters.peek().is_some() && voters.all(is_bold_char) {
        BoldDirection::Remove
    } else {
        BoldDirection::Apply
    }
}

/// Transform `text` in the given direction.
pub fn transcode(text: &str, direction: BoldDirection) -> String {
    match direction {
        BoldDirection::Apply => apply_bold(text),
        BoldDirection::Remove => remove_bold(text),
    }
}

/// Toggle bold over the scalar-value span `[start, end)` of `buffer`.
pub fn toggle_bold(buffer: &str, start: usize, end: usize) -> Result<BoldToggle, FormatError> {
    let bytes = checked_byte_range(buffer, start, end)?;
    if start == end {
        return Ok(BoldToggle::NothingSelected);
    }

    let selected = &buffer[bytes.clone()];
    let direction = toggle_direction(selected);
    let replacement = transcode(selected, direction);
    let selection_end = start + replacement.chars().count();

    let mut out = String::with_capacity(buffer.len() - selected.len() + replacement.len());
    out.push_str(&buffer[..bytes.start]);
    out.push_str(&replacement);
    out.push_str(&buffer[bytes.end..]);

    Ok(BoldToggle::Toggled {
        buffer: out,
        selection_end,
        direction,
    })
}
