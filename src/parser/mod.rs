//! Markdown parsing module.

mod classify;
mod context;
mod footnote;
mod inline;
mod markdown;
mod options;
mod table;

pub use classify::{indent_width, is_table_separator, LineClassifier, LineKind, BULLET_GLYPHS};
pub use context::{ConversionContext, ScanState, SectionCounters};
pub use footnote::{FootnoteExtractor, Span};
pub use inline::InlineParser;
pub use markdown::MarkdownParser;
pub use options::{BulletMode, ErrorMode, ParseOptions, DEFAULT_NOTES_TITLE};
pub use table::{split_row, TableBuilder};
