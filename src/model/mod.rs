//! Document model types.
//!
//! This module defines the intermediate representation that bridges
//! Markdown scanning and DOCX writing. Every block is created once during
//! the line scan and rendered once by the writer.

mod block;
mod document;
mod footnote;
mod paragraph;
mod resource;
mod table;

pub use block::{Block, Caption, CaptionKind, Heading, TocEntry};
pub use document::{Document, Metadata, Warning};
pub use footnote::{placeholder_text, Footnote, FootnoteRegistry};
pub use paragraph::{InlineContent, Paragraph, TextRun, TextStyle};
pub use resource::Resource;
pub use table::{Table, TableCell, TableRow};
