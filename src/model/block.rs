//! Block-level types.

use super::{Paragraph, Table};
use serde::{Deserialize, Serialize};

/// A content block in the document.
///
/// Blocks are produced in source order by a single scan over the input and
/// are never modified after they are appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Block {
    /// Document title (the first `#` heading)
    Title(Paragraph),

    /// Section heading
    Heading(Heading),

    /// Body paragraph
    Paragraph(Paragraph),

    /// Bullet item; the glyph is kept in the text
    BulletItem {
        /// Nesting level (1-4)
        level: u8,
        /// Item content including the glyph
        content: Paragraph,
    },

    /// Circled-number list item (①, ②, ...)
    NumberedItem(Paragraph),

    /// Bibliographic reference item
    Reference(Paragraph),

    /// Native table
    Table(Table),

    /// Embedded image
    Image {
        /// Key into the document resources
        resource_id: String,
        /// Alternative text
        alt_text: String,
        /// Path as written in the source
        path: String,
    },

    /// Bracketed text standing in for an image that could not be embedded
    Placeholder(String),

    /// Figure or table caption
    Caption(Caption),

    /// Table-of-contents line
    TocEntry(TocEntry),

    /// Forced page break
    PageBreak,

    /// Empty paragraph used as vertical spacing
    Spacer,

    /// Footnote definition in the trailing notes section
    Note {
        /// Footnote number
        number: u32,
        /// Definition text
        text: String,
    },
}

impl Block {
    /// Get plain text content of the block.
    pub fn plain_text(&self) -> String {
        match self {
            Block::Placeholder(text) => text.clone(),
            Block::Heading(h) => h.display_text(),
            Block::Title(p) => p.plain_text(),
            Block::Paragraph(p) | Block::NumberedItem(p) | Block::Reference(p) => p.plain_text(),
            Block::BulletItem { content, .. } => content.plain_text(),
            Block::Table(t) => t.plain_text(),
            Block::Image { alt_text, .. } => alt_text.clone(),
            Block::Caption(c) => c.label(),
            Block::TocEntry(t) => format!("{}\t{}", t.title, t.page),
            Block::PageBreak | Block::Spacer => String::new(),
            Block::Note { number, text } => format!("{} {}", number, text),
        }
    }

    /// Short name of the block variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Title(_) => "title",
            Block::Heading(_) => "heading",
            Block::Paragraph(_) => "paragraph",
            Block::BulletItem { .. } => "bullet_item",
            Block::NumberedItem(_) => "numbered_item",
            Block::Reference(_) => "reference",
            Block::Table(_) => "table",
            Block::Image { .. } => "image",
            Block::Placeholder(_) => "placeholder",
            Block::Caption(_) => "caption",
            Block::TocEntry(_) => "toc_entry",
            Block::PageBreak => "page_break",
            Block::Spacer => "spacer",
            Block::Note { .. } => "note",
        }
    }

    /// Check if this block is a heading of any level.
    pub fn is_heading(&self) -> bool {
        matches!(self, Block::Heading(_))
    }
}

/// A section heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading level (1-3)
    pub level: u8,

    /// Heading text as written in the source
    pub content: Paragraph,

    /// Synthesized section number (e.g. "2.3"), absent when the text
    /// carries its own numbering or numbering is disabled
    pub number: Option<String>,
}

impl Heading {
    /// Create a heading without a synthesized number.
    pub fn new(level: u8, content: Paragraph) -> Self {
        Self {
            level: level.clamp(1, 3),
            content,
            number: None,
        }
    }

    /// Set the synthesized section number.
    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = Some(number.into());
        self
    }

    /// Heading text without the synthesized number.
    pub fn text(&self) -> String {
        self.content.plain_text()
    }

    /// Heading text as displayed, including the synthesized number.
    pub fn display_text(&self) -> String {
        match self.number {
            Some(ref number) => format!("{} {}", number, self.text()),
            None => self.text(),
        }
    }
}

/// Caption kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptionKind {
    /// Figure caption (`<그림 N>`)
    Figure,
    /// Table caption (`<표 N>`)
    Table,
}

impl CaptionKind {
    /// Korean label used in rendered captions.
    pub fn label(&self) -> &'static str {
        match self {
            CaptionKind::Figure => "그림",
            CaptionKind::Table => "표",
        }
    }
}

/// A numbered figure or table caption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caption {
    /// Figure or table
    pub kind: CaptionKind,

    /// Running number assigned during conversion
    pub number: u32,

    /// Caption text after the `<표 N>` marker
    pub text: String,
}

impl Caption {
    /// Rendered caption line, e.g. `<표 1> 분석 결과`.
    pub fn label(&self) -> String {
        if self.text.is_empty() {
            format!("<{} {}>", self.kind.label(), self.number)
        } else {
            format!("<{} {}> {}", self.kind.label(), self.number, self.text)
        }
    }
}

/// A table-of-contents entry with its page number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Nesting level (1-3)
    pub level: u8,

    /// Entry title
    pub title: String,

    /// Page number as written
    pub page: String,
}
