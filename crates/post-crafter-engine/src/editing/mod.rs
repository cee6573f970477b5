/*!
 * # Editing Core
 *
 * The caption editor keeps its text in a single **`xi_rope::Rope`** and
 * routes every change through a [`Cmd`]:
 *
 * - **Commands compile to deltas**: a command is validated against the
 *   current text, turned into a scalar-value replacement, and applied to
 *   the rope as a `Delta` built over byte offsets.
 * - **Scalar-value coordinates**: selections, carets and the ranges in a
 *   [`Patch`] count Unicode scalar values, matching what a text widget
 *   reports. Byte offsets never leave this module.
 * - **Advisories are not errors**: toggling bold with nothing selected
 *   returns a patch carrying [`Notice::SelectTextFirst`] and leaves the
 *   document untouched. Only malformed ranges produce an [`EditError`].
 *
 * ## Usage Pattern
 *
 * ```rust
 * use post_crafter_engine::editing::{Cmd, Document};
 *
 * let mut doc = Document::new("Hello world");
 * let patch = doc.apply(Cmd::ToggleBold { range: 0..5 }).unwrap();
 * assert_eq!(patch.new_selection, 0..5);
 * assert_eq!(doc.text().chars().count(), 11);
 * ```
 */

pub mod commands;
pub mod document;
pub mod patch;

pub use commands::Cmd;
pub use document::Document;
pub use patch::{Notice, Patch};

use crate::formatting::FormatError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error(transparent)]
    Format(#[from] FormatError),
}
