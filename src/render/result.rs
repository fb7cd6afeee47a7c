//! Conversion result with metadata and statistics.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::model::{Block, Document, Metadata, Warning};

/// Result of converting one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionResult {
    /// Where the DOCX was written, if it was written to a file
    pub output: Option<PathBuf>,

    /// Document metadata
    pub metadata: Metadata,

    /// Content statistics
    pub stats: ConversionStats,

    /// Problems recovered from during conversion
    pub warnings: Vec<Warning>,
}

impl ConversionResult {
    /// Summarize a converted document.
    pub fn from_document(doc: &Document, output: Option<PathBuf>) -> Self {
        Self {
            output,
            metadata: doc.metadata.clone(),
            stats: ConversionStats::from_document(doc),
            warnings: doc.warnings.clone(),
        }
    }

    /// Check if the conversion finished without warnings.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Counts of the blocks produced by a conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Headings, including the title
    pub heading_count: u32,

    /// Body paragraphs
    pub paragraph_count: u32,

    /// Bullet and circled-number items
    pub list_item_count: u32,

    /// Bibliography entries
    pub reference_count: u32,

    /// Tables
    pub table_count: u32,

    /// Embedded images
    pub image_count: u32,

    /// Images replaced by placeholders
    pub placeholder_count: u32,

    /// Figure and table captions
    pub caption_count: u32,

    /// Table-of-contents lines
    pub toc_entry_count: u32,

    /// Footnotes in the notes section
    pub footnote_count: u32,

    /// Forced page breaks
    pub page_break_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,
}

impl ConversionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count the blocks of a document.
    pub fn from_document(doc: &Document) -> Self {
        let mut stats = Self::new();
        for block in &doc.blocks {
            stats.add_block(block);
        }
        stats
    }

    /// Count one block.
    pub fn add_block(&mut self, block: &Block) {
        match block {
            Block::Title(_) | Block::Heading(_) => self.heading_count += 1,
            Block::Paragraph(_) => self.paragraph_count += 1,
            Block::BulletItem { .. } | Block::NumberedItem(_) => self.list_item_count += 1,
            Block::Reference(_) => self.reference_count += 1,
            Block::Table(_) => self.table_count += 1,
            Block::Image { .. } => self.image_count += 1,
            Block::Placeholder(_) => self.placeholder_count += 1,
            Block::Caption(_) => self.caption_count += 1,
            Block::TocEntry(_) => self.toc_entry_count += 1,
            Block::Note { .. } => self.footnote_count += 1,
            Block::PageBreak => self.page_break_count += 1,
            Block::Spacer => {}
        }
        self.count_text(&block.plain_text());
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &ConversionStats) {
        self.heading_count += other.heading_count;
        self.paragraph_count += other.paragraph_count;
        self.list_item_count += other.list_item_count;
        self.reference_count += other.reference_count;
        self.table_count += other.table_count;
        self.image_count += other.image_count;
        self.placeholder_count += other.placeholder_count;
        self.caption_count += other.caption_count;
        self.toc_entry_count += other.toc_entry_count;
        self.footnote_count += other.footnote_count;
        self.page_break_count += other.page_break_count;
        self.word_count += other.word_count;
        self.char_count += other.char_count;
    }
}
