//! End-to-end conversion: Markdown source in, DOCX package out.
//!
//! # Example
//!
//! ```no_run
//! use mdocx::convert::{convert_file, ConvertOptions};
//!
//! fn main() -> mdocx::Result<()> {
//!     let options = ConvertOptions::new().strict();
//!     let result = convert_file("plan.md", None, &options)?;
//!     println!("{} tables", result.stats.table_count);
//!     Ok(())
//! }
//! ```

mod batch;

pub use batch::{batch_output_path, convert_batch, convert_batch_with, plan_outputs, BatchOutcome};

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::model::Document;
use crate::parser::{BulletMode, MarkdownParser, ParseOptions};
use crate::render::{ConversionResult, DocxWriter, RenderOptions};

/// Options for a full conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Parsing options
    pub parse: ParseOptions,

    /// Rendering options
    pub render: RenderOptions,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set parsing options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse = options;
        self
    }

    /// Set rendering options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render = options;
        self
    }

    /// Fail on missing images instead of inserting placeholders.
    pub fn strict(mut self) -> Self {
        self.parse = self.parse.strict();
        self
    }

    /// Set bullet leveling mode.
    pub fn with_bullet_mode(mut self, mode: BulletMode) -> Self {
        self.parse = self.parse.with_bullet_mode(mode);
        self
    }

    /// Enable or disable synthesized heading numbers.
    pub fn with_heading_numbers(mut self, enabled: bool) -> Self {
        self.parse = self.parse.with_heading_numbers(enabled);
        self
    }

    /// Set the image width in inches.
    pub fn with_image_width(mut self, inches: f32) -> Self {
        self.render = self.render.with_image_width(inches);
        self
    }
}

/// Default output path: the input's file stem with a `.docx` extension,
/// next to the input.
pub fn default_output_path<P: AsRef<Path>>(input: P) -> PathBuf {
    input.as_ref().with_extension("docx")
}

/// Parse a Markdown file into a document.
pub fn parse_document<P: AsRef<Path>>(input: P, options: &ConvertOptions) -> Result<Document> {
    MarkdownParser::open_with_options(input, options.parse.clone())?.parse()
}

/// Convert a Markdown file to DOCX.
///
/// When `output` is `None` the file is written next to the input (see
/// [`default_output_path`]).
pub fn convert_file<P: AsRef<Path>>(
    input: P,
    output: Option<&Path>,
    options: &ConvertOptions,
) -> Result<ConversionResult> {
    let input = input.as_ref();
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(input));

    let doc = parse_document(input, options)?;
    DocxWriter::new(options.render.clone()).write_file(&doc, &output)?;

    log::info!("Wrote {}", output.display());
    Ok(ConversionResult::from_document(&doc, Some(output)))
}

/// Convert Markdown text to DOCX bytes.
///
/// Relative image paths resolve against `options.parse.base_dir`, or the
/// working directory when it is unset.
pub fn convert_text(markdown: &str, options: &ConvertOptions) -> Result<(Vec<u8>, ConversionResult)> {
    let doc = MarkdownParser::from_text_with_options(markdown, options.parse.clone()).parse()?;
    let bytes = DocxWriter::new(options.render.clone()).to_bytes(&doc)?;
    Ok((bytes, ConversionResult::from_document(&doc, None)))
}
