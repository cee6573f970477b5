use std::ops::Range;

use xi_rope::Rope;
use xi_rope::delta::Builder;

use crate::editing::commands::{Compiled, compile_command};
use crate::editing::{Cmd, EditError, Patch};

/// Caption being edited, with its selection and an edit counter.
///
/// The rope is the single source of truth for the text. Positions handed
/// in and out of a `Document` are scalar-value indices:
///
/// ```rust
/// # use post_crafter_engine::editing::{Cmd, Document};
/// let mut doc = Document::new("Great work");
/// let patch = doc
///     .apply(Cmd::InsertText { range: 5..5, text: "🎉".to_string() })
///     .unwrap();
///
/// assert_eq!(doc.text(), "Great🎉 work");
/// assert_eq!(patch.new_selection, 6..6);
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) buffer: Rope,
    /// Current selection as scalar-value indices
    pub(crate) selection: Range<usize>,
    /// Incremented on each applied edit
    pub(crate) version: u64,
}

impl Document {
    /// Create a document with the caret at the end of `text`.
    pub fn new(text: &str) -> Self {
        let len = text.chars().count();
        Self {
            buffer: Rope::from(text),
            selection: len..len,
            version: 0,
        }
    }

    /// Apply a command and return what changed.
    ///
    /// Empty bold toggles and zero-width edits leave the document and its
    /// version alone; the returned patch then has no changed ranges.
    pub fn apply(&mut self, cmd: Cmd) -> Result<Patch, EditError> {
        let text = self.text();

        let replacement = match compile_command(&text, &cmd)? {
            Compiled::Replace(replacement) => replacement,
            Compiled::Notice(notice) => {
                log::debug!("{cmd:?} produced notice: {notice}");
                return Ok(self.unchanged(Some(notice)));
            }
            Compiled::Noop => return Ok(self.unchanged(None)),
        };

        let mut builder = Builder::new(self.buffer.len());
        if replacement.text.is_empty() {
            builder.delete(replacement.bytes.clone());
        } else {
            builder.replace(
                replacement.bytes.clone(),
                Rope::from(replacement.text.as_str()),
            );
        }
        let delta = builder.build();
        self.buffer = delta.apply(&self.buffer);

        // Deletions leave a collapsed range at the join
        let inserted = replacement.text.chars().count();
        let changed = vec![replacement.range.start..replacement.range.start + inserted];

        self.selection = replacement.selection.clone();
        self.version += 1;
        log::debug!(
            "applied {cmd:?}: replaced {:?}, version {}",
            replacement.range,
            self.version
        );

        Ok(Patch {
            changed,
            new_selection: replacement.selection,
            version: self.version,
            direction: replacement.direction,
            notice: None,
        })
    }

    fn unchanged(&self, notice: Option<crate::editing::Notice>) -> Patch {
        Patch {
            changed: Vec::new(),
            new_selection: self.selection.clone(),
            version: self.version,
            direction: None,
            notice,
        }
    }

    /// Get the current selection range
    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    /// Set the selection, clamped to the document and normalised so that
    /// `start <= end`.
    pub fn set_selection(&mut self, selection: Range<usize>) {
        let len = self.len();
        let start = selection.start.min(selection.end).min(len);
        let end = selection.start.max(selection.end).min(len);
        self.selection = start..end;
    }

    /// Text covered by the current selection.
    pub fn selected_text(&self) -> String {
        let text = self.text();
        text.chars()
            .skip(self.selection.start)
            .take(self.selection.len())
            .collect()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    /// Length in scalar values.
    pub fn len(&self) -> usize {
        self.buffer.slice_to_cow(0..self.buffer.len()).chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.len() == 0
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.text() == other.text()
            && self.selection == other.selection
            && self.version == other.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::Notice;
    use crate::formatting::{BoldDirection, FormatError, is_bold_char};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_document_has_caret_at_end() {
        let doc = Document::new("Hi 👋");
        assert_eq!(doc.len(), 4);
        assert_eq!(doc.selection(), 4..4);
        assert_eq!(doc.version(), 0);
    }

    #[test]
    fn test_toggle_bold_selects_transformed_span() {
        let mut doc = Document::new("Hello World 123");
        let patch = doc.apply(Cmd::ToggleBold { range: 6..11 }).unwrap();

        assert_eq!(patch.direction, Some(BoldDirection::Apply));
        assert_eq!(patch.changed, vec![6..11]);
        assert_eq!(patch.new_selection, 6..11);
        assert_eq!(patch.version, 1);
        assert_eq!(doc.selection(), 6..11);
        assert!(doc.selected_text().chars().all(is_bold_char));
        assert!(doc.text().starts_with("Hello "));
        assert!(doc.text().ends_with(" 123"));
    }

    #[test]
    fn test_toggle_twice_restores_text() {
        let mut doc = Document::new("Hello World 123");
        doc.apply(Cmd::ToggleBold { range: 0..15 }).unwrap();

        let selection = doc.selection();
        let patch = doc.apply(Cmd::ToggleBold { range: selection }).unwrap();

        assert_eq!(patch.direction, Some(BoldDirection::Remove));
        assert_eq!(doc.text(), "Hello World 123");
        assert_eq!(doc.version(), 2);
    }

    #[test]
    fn test_empty_toggle_reports_notice_without_editing() {
        let mut doc = Document::new("Hello");
        doc.set_selection(3..3);
        let patch = doc.apply(Cmd::ToggleBold { range: 3..3 }).unwrap();

        assert!(patch.is_noop());
        assert_eq!(patch.notice, Some(Notice::SelectTextFirst));
        assert_eq!(patch.version, 0);
        assert_eq!(doc.text(), "Hello");
        assert_eq!(doc.selection(), 3..3);
    }

    #[test]
    fn test_insert_replaces_selection() {
        let mut doc = Document::new("ship it now");
        let patch = doc
            .apply(Cmd::InsertText {
                range: 5..7,
                text: "🚀".to_string(),
            })
            .unwrap();

        assert_eq!(doc.text(), "ship 🚀 now");
        assert_eq!(patch.changed, vec![5..6]);
        assert_eq!(patch.new_selection, 6..6);
    }

    #[test]
    fn test_delete_backward_after_emoji() {
        let mut doc = Document::new("Great🎉 work");
        let patch = doc.apply(Cmd::DeleteBackward { range: 6..6 }).unwrap();

        assert_eq!(doc.text(), "Great work");
        assert_eq!(patch.changed, vec![5..5]);
        assert_eq!(patch.new_selection, 5..5);
        assert_eq!(patch.version, 1);
    }

    #[test]
    fn test_deletion_is_not_a_noop() {
        let mut doc = Document::new("abc");
        let patch = doc.apply(Cmd::DeleteBackward { range: 3..3 }).unwrap();

        assert_eq!(doc.text(), "ab");
        assert!(!patch.is_noop());
        assert_eq!(patch.changed, vec![2..2]);
        assert_eq!(patch.version, 1);

        doc.set_selection(0..0);
        let patch = doc.apply(Cmd::DeleteBackward { range: 0..0 }).unwrap();
        assert!(patch.is_noop());
        assert_eq!(patch.version, 1);
    }

    #[test]
    fn test_delete_whole_text_leaves_empty_document() {
        let mut doc = Document::new("bye");
        doc.apply(Cmd::DeleteBackward { range: 0..3 }).unwrap();

        assert!(doc.is_empty());
        assert_eq!(doc.len(), 0);
        assert_eq!(doc.selection(), 0..0);
    }

    #[test]
    fn test_invalid_range_leaves_document_untouched() {
        let mut doc = Document::new("abc");
        let err = doc.apply(Cmd::ToggleBold { range: 1..7 }).unwrap_err();

        assert_eq!(
            err,
            EditError::Format(FormatError::InvalidRange {
                start: 1,
                end: 7,
                len: 3
            })
        );
        assert_eq!(doc.text(), "abc");
        assert_eq!(doc.version(), 0);
    }

    #[test]
    fn test_set_selection_clamps_and_orders() {
        let mut doc = Document::new("abc");
        doc.set_selection(5..1);
        assert_eq!(doc.selection(), 1..3);
    }
}
