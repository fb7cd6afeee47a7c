//! # mdocx
//!
//! Converts Korean business-plan Markdown into formatted Word documents.
//!
//! The input dialect is line oriented: `#` headings, Korean bullet glyphs
//! (`□ ○ - •`), `^n^[...]` footnotes, pipe tables, `<그림 N>` / `<표 N>`
//! captions, dotted-leader TOC lines and `![alt](path)` images. Each line is
//! classified once and mapped onto a named Word paragraph style.
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() -> mdocx::Result<()> {
//!     // plan.md -> plan.docx
//!     let result = mdocx::convert_file("plan.md")?;
//!     for warning in &result.warnings {
//!         eprintln!("{}", warning);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Native Word output**: styles, tables with shaded headers, embedded images
//! - **Footnotes**: inline definitions collected into a trailing notes section
//! - **Captions**: figure/table captions renumbered and deduplicated
//! - **Recoverable problems**: missing images and empty tables become warnings
//! - **Batch conversion**: uses Rayon to convert many files in parallel

pub mod convert;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use convert::{convert_batch, default_output_path, BatchOutcome, ConvertOptions};
pub use detect::{decode_source, is_markdown_path, read_source};
pub use error::{Error, Result};
pub use model::{
    Block, Caption, CaptionKind, Document, FootnoteRegistry, Heading, InlineContent, Metadata,
    Paragraph, Resource, Table, TableCell, TableRow, TextRun, TextStyle, TocEntry, Warning,
};
pub use parser::{BulletMode, ErrorMode, LineClassifier, LineKind, MarkdownParser, ParseOptions};
pub use render::{ConversionResult, ConversionStats, DocxWriter, JsonFormat, RenderOptions};

use std::io::Read;
use std::path::{Path, PathBuf};

/// Parse a Markdown file and return the document model.
///
/// # Example
///
/// ```no_run
/// use mdocx::parse_file;
///
/// let doc = parse_file("plan.md").unwrap();
/// println!("Blocks: {}", doc.blocks.len());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    MarkdownParser::open(path)?.parse()
}

/// Parse a Markdown file with custom options.
///
/// # Example
///
/// ```no_run
/// use mdocx::{parse_file_with_options, BulletMode, ParseOptions};
///
/// let options = ParseOptions::new()
///     .strict()
///     .with_bullet_mode(BulletMode::Glyph);
/// let doc = parse_file_with_options("plan.md", options).unwrap();
/// ```
pub fn parse_file_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Document> {
    MarkdownParser::open_with_options(path, options)?.parse()
}

/// Parse Markdown text.
///
/// # Example
///
/// ```
/// let doc = mdocx::parse_str("# 사업계획서\n## 개요\n본문").unwrap();
/// assert_eq!(doc.title(), Some("사업계획서"));
/// ```
pub fn parse_str(markdown: &str) -> Result<Document> {
    MarkdownParser::from_text(markdown).parse()
}

/// Parse Markdown text with custom options.
pub fn parse_str_with_options(markdown: &str, options: ParseOptions) -> Result<Document> {
    MarkdownParser::from_text_with_options(markdown, options).parse()
}

/// Parse Markdown from raw bytes (BOM, line endings and NFC are handled).
pub fn parse_bytes(data: &[u8]) -> Result<Document> {
    MarkdownParser::from_bytes_with_options(data, ParseOptions::default())?.parse()
}

/// Parse Markdown from a reader.
pub fn parse_reader<R: Read>(reader: R) -> Result<Document> {
    MarkdownParser::from_reader_with_options(reader, ParseOptions::default())?.parse()
}

/// Convert a Markdown file to a DOCX file next to it (`plan.md` → `plan.docx`).
pub fn convert_file<P: AsRef<Path>>(path: P) -> Result<ConversionResult> {
    convert::convert_file(path, None, &ConvertOptions::default())
}

/// Convert a Markdown file to DOCX at an explicit output path.
///
/// # Example
///
/// ```no_run
/// use mdocx::convert_file_to;
///
/// let result = convert_file_to("plan.md", "out/사업계획서.docx").unwrap();
/// println!("{} footnotes", result.stats.footnote_count);
/// ```
pub fn convert_file_to<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<ConversionResult> {
    convert::convert_file(input, Some(output.as_ref()), &ConvertOptions::default())
}

/// Convert Markdown text to DOCX bytes.
pub fn to_docx_bytes(markdown: &str) -> Result<Vec<u8>> {
    let doc = parse_str(markdown)?;
    render::to_docx(&doc, &RenderOptions::default())
}

/// Extract the plain-text rendering of a Markdown file.
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let doc = parse_file(path)?;
    Ok(render::to_text(&doc))
}

/// Dump the document model of a Markdown file as JSON.
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let doc = parse_file(path)?;
    render::to_json(&doc, format)
}

/// Builder for parsing and converting Markdown documents.
///
/// # Example
///
/// ```no_run
/// use mdocx::Mdocx;
///
/// let result = Mdocx::new()
///     .strict()
///     .without_heading_numbers()
///     .with_image_width(4.5)
///     .parse("plan.md")?
///     .write_docx("plan.docx")?;
/// # Ok::<(), mdocx::Error>(())
/// ```
pub struct Mdocx {
    parse_options: ParseOptions,
    render_options: RenderOptions,
}

impl Mdocx {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            parse_options: ParseOptions::default(),
            render_options: RenderOptions::default(),
        }
    }

    /// Fail on missing images.
    pub fn strict(mut self) -> Self {
        self.parse_options = self.parse_options.strict();
        self
    }

    /// Replace missing images with placeholders (the default).
    pub fn lenient(mut self) -> Self {
        self.parse_options = self.parse_options.lenient();
        self
    }

    /// Set bullet leveling mode.
    pub fn with_bullet_mode(mut self, mode: BulletMode) -> Self {
        self.parse_options = self.parse_options.with_bullet_mode(mode);
        self
    }

    /// Do not synthesize section numbers for headings.
    pub fn without_heading_numbers(mut self) -> Self {
        self.parse_options = self.parse_options.with_heading_numbers(false);
        self
    }

    /// Set the notes section title.
    pub fn with_notes_title(mut self, title: impl Into<String>) -> Self {
        self.parse_options = self.parse_options.with_notes_title(title);
        self
    }

    /// Enable or disable image embedding.
    pub fn with_images(mut self, embed: bool) -> Self {
        self.parse_options = self.parse_options.with_images(embed);
        self
    }

    /// Resolve relative image paths against a directory.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.parse_options = self.parse_options.with_base_dir(dir);
        self
    }

    /// Set the document font.
    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.render_options = self.render_options.with_font(font);
        self
    }

    /// Set the embedded image width in inches.
    pub fn with_image_width(mut self, inches: f32) -> Self {
        self.render_options = self.render_options.with_image_width(inches);
        self
    }

    /// Start the body on a new page after the title.
    pub fn with_title_page(mut self) -> Self {
        self.render_options = self.render_options.with_title_page_break(true);
        self
    }

    /// Parse a Markdown file.
    pub fn parse<P: AsRef<Path>>(self, path: P) -> Result<MdocxResult> {
        let document = MarkdownParser::open_with_options(path, self.parse_options)?.parse()?;
        Ok(MdocxResult {
            document,
            render_options: self.render_options,
        })
    }

    /// Parse Markdown text.
    pub fn parse_str(self, markdown: &str) -> Result<MdocxResult> {
        let document = MarkdownParser::from_text_with_options(markdown, self.parse_options).parse()?;
        Ok(MdocxResult {
            document,
            render_options: self.render_options,
        })
    }
}

impl Default for Mdocx {
    fn default() -> Self {
        Self::new()
    }
}

/// A parsed document plus the options to render it with.
pub struct MdocxResult {
    /// The parsed document
    pub document: Document,
    /// Render options to use
    render_options: RenderOptions,
}

impl MdocxResult {
    /// Serialize to DOCX bytes.
    pub fn to_docx(&self) -> Result<Vec<u8>> {
        render::to_docx(&self.document, &self.render_options)
    }

    /// Write a DOCX file.
    pub fn write_docx<P: AsRef<Path>>(&self, path: P) -> Result<ConversionResult> {
        let path = path.as_ref();
        render::write_docx(&self.document, path, &self.render_options)?;
        Ok(ConversionResult::from_document(
            &self.document,
            Some(path.to_path_buf()),
        ))
    }

    /// Plain-text rendering.
    pub fn to_text(&self) -> String {
        render::to_text(&self.document)
    }

    /// JSON dump of the document model.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Conversion statistics.
    pub fn stats(&self) -> ConversionStats {
        ConversionStats::from_document(&self.document)
    }

    /// Warnings recorded while parsing.
    pub fn warnings(&self) -> &[Warning] {
        &self.document.warnings
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}
