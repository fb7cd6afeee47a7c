//! Parsing options and configuration.

use std::path::PathBuf;

/// Title of the trailing footnote section.
pub const DEFAULT_NOTES_TITLE: &str = "주석";

/// Options for scanning Markdown into a document.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// How bullet nesting levels are derived
    pub bullet_mode: BulletMode,

    /// Prefix unnumbered headings with synthesized section numbers
    pub number_headings: bool,

    /// Treat `### Page N. Title` lines as page breaks
    pub page_markers: bool,

    /// Heading text of the footnote section
    pub notes_title: String,

    /// Directory relative image paths are resolved against
    pub base_dir: Option<PathBuf>,

    /// Whether to load and embed referenced images
    pub embed_images: bool,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable strict mode (missing images abort the conversion).
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Enable lenient mode (missing images become placeholders).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set bullet leveling mode.
    pub fn with_bullet_mode(mut self, mode: BulletMode) -> Self {
        self.bullet_mode = mode;
        self
    }

    /// Enable or disable synthesized heading numbers.
    pub fn with_heading_numbers(mut self, enabled: bool) -> Self {
        self.number_headings = enabled;
        self
    }

    /// Enable or disable `### Page N.` page markers.
    pub fn with_page_markers(mut self, enabled: bool) -> Self {
        self.page_markers = enabled;
        self
    }

    /// Set the footnote section title.
    pub fn with_notes_title(mut self, title: impl Into<String>) -> Self {
        self.notes_title = title.into();
        self
    }

    /// Set the image base directory.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Enable or disable image embedding.
    pub fn with_images(mut self, embed: bool) -> Self {
        self.embed_images = embed;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Lenient,
            bullet_mode: BulletMode::Indentation,
            number_headings: true,
            page_markers: true,
            notes_title: DEFAULT_NOTES_TITLE.to_string(),
            base_dir: None,
            embed_images: true,
        }
    }
}

/// Error handling mode during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on a missing image
    Strict,
    /// Substitute placeholders and continue
    #[default]
    Lenient,
}

/// How the nesting level of a bullet item is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BulletMode {
    /// From the leading indentation width (0/2/4/6+ columns)
    #[default]
    Indentation,
    /// From the glyph itself (□ ○ - •)
    Glyph,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_builder() {
        let options = ParseOptions::new()
            .strict()
            .with_bullet_mode(BulletMode::Glyph)
            .with_heading_numbers(false)
            .with_notes_title("Notes");

        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert_eq!(options.bullet_mode, BulletMode::Glyph);
        assert!(!options.number_headings);
        assert_eq!(options.notes_title, "Notes");
    }

    #[test]
    fn test_default_options() {
        let options = ParseOptions::default();
        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert_eq!(options.bullet_mode, BulletMode::Indentation);
        assert!(options.number_headings);
        assert!(options.page_markers);
        assert!(options.embed_images);
        assert_eq!(options.notes_title, "주석");
    }
}
