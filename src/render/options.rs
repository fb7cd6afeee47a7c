//! Rendering options and configuration.

/// Default document font (covers Hangul and Latin).
pub const DEFAULT_FONT: &str = "Malgun Gothic";

/// Options for writing a document as DOCX.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Font applied to every style
    pub font_name: String,

    /// Body text size in points; other styles keep their fixed sizes
    pub body_size_pt: f32,

    /// Width of embedded images in inches (height keeps the aspect ratio)
    pub image_width_in: f32,

    /// Background fill of table header cells (hex RGB)
    pub header_fill: String,

    /// Page margins
    pub margins: Margins,

    /// Page size
    pub page_size: PageSize,

    /// Start the body on a new page after the title
    pub title_page_break: bool,

    /// Author written to the package core properties
    pub author: Option<String>,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document font.
    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font_name = font.into();
        self
    }

    /// Set the body text size.
    pub fn with_body_size(mut self, points: f32) -> Self {
        self.body_size_pt = points.clamp(6.0, 36.0);
        self
    }

    /// Set the image width.
    pub fn with_image_width(mut self, inches: f32) -> Self {
        self.image_width_in = inches.clamp(0.5, 8.0);
        self
    }

    /// Set the table header fill colour.
    pub fn with_header_fill(mut self, hex: impl Into<String>) -> Self {
        self.header_fill = hex.into();
        self
    }

    /// Set the page margins.
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// Set the page size.
    pub fn with_page_size(mut self, size: PageSize) -> Self {
        self.page_size = size;
        self
    }

    /// Enable or disable a page break after the title.
    pub fn with_title_page_break(mut self, enabled: bool) -> Self {
        self.title_page_break = enabled;
        self
    }

    /// Set the author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Usable text width in twentieths of a point.
    pub fn text_width_twips(&self) -> u32 {
        let (width, _) = self.page_size.twips();
        width.saturating_sub(inches_to_twips(self.margins.left + self.margins.right))
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            font_name: DEFAULT_FONT.to_string(),
            body_size_pt: 11.0,
            image_width_in: 5.0,
            header_fill: "F2F2F2".to_string(),
            margins: Margins::default(),
            page_size: PageSize::A4,
            title_page_break: false,
            author: None,
        }
    }
}

/// Page margins in inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    /// Top margin
    pub top: f32,
    /// Bottom margin
    pub bottom: f32,
    /// Left margin
    pub left: f32,
    /// Right margin
    pub right: f32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 1.2,
            bottom: 1.0,
            left: 1.2,
            right: 1.0,
        }
    }
}

/// Page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    /// 210 x 297 mm
    #[default]
    A4,
    /// 8.5 x 11 in
    Letter,
}

impl PageSize {
    /// Width and height in twentieths of a point.
    pub fn twips(&self) -> (u32, u32) {
        match self {
            PageSize::A4 => (11906, 16838),
            PageSize::Letter => (12240, 15840),
        }
    }
}

/// Convert inches to twentieths of a point.
pub fn inches_to_twips(inches: f32) -> u32 {
    (inches * 1440.0).round().max(0.0) as u32
}
