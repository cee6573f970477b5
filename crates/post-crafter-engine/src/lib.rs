pub mod catalog;
pub mod editing;
pub mod formatting;
pub mod wizard;

// Re-export key types for easier usage
pub use catalog::{Catalog, CatalogError, GeneratedPost, PostType, QuickStart};
pub use editing::{Cmd, Document, EditError, Notice, Patch};
pub use formatting::{BoldDirection, BoldToggle, EMOJI_PALETTE, FormatError};
pub use wizard::{Event, Page, Pending, Wizard, WizardError};
