//! Paragraph and text-level types.

use serde::{Deserialize, Serialize};

/// A sequence of inline content: the runs of one Word paragraph.
///
/// The paragraph carries no style of its own; the enclosing [`Block`]
/// variant decides which paragraph style it is rendered with.
///
/// [`Block`]: super::Block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Inline runs in source order
    pub content: Vec<InlineContent>,
}

impl Paragraph {
    /// Create a new empty paragraph.
    pub fn new() -> Self {
        Self {
            content: Vec::new(),
        }
    }

    /// Create a paragraph with plain text.
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut p = Self::new();
        p.add_text(text);
        p
    }

    /// Add plain text to the paragraph.
    pub fn add_text(&mut self, text: impl Into<String>) {
        self.add_run(TextRun::new(text));
    }

    /// Add a styled text run. Empty runs are dropped.
    pub fn add_run(&mut self, run: TextRun) {
        if !run.is_empty() {
            self.content.push(InlineContent::Text(run));
        }
    }

    /// Add a footnote reference.
    pub fn add_footnote_ref(&mut self, number: u32) {
        self.content.push(InlineContent::FootnoteRef(number));
    }

    /// Append every inline item of another paragraph.
    pub fn extend(&mut self, other: Paragraph) {
        self.content.extend(other.content);
    }

    /// Get plain text content of the paragraph.
    ///
    /// Footnote references are rendered as their bare number.
    pub fn plain_text(&self) -> String {
        self.content
            .iter()
            .map(|c| match c {
                InlineContent::Text(run) => run.text.clone(),
                InlineContent::FootnoteRef(n) => n.to_string(),
            })
            .collect()
    }

    /// Text of the runs only, without footnote reference numbers.
    pub fn text_only(&self) -> String {
        self.content
            .iter()
            .filter_map(|c| match c {
                InlineContent::Text(run) => Some(run.text.as_str()),
                InlineContent::FootnoteRef(_) => None,
            })
            .collect()
    }

    /// Footnote numbers referenced by this paragraph, in order.
    pub fn footnote_refs(&self) -> Vec<u32> {
        self.content
            .iter()
            .filter_map(|c| match c {
                InlineContent::FootnoteRef(n) => Some(*n),
                InlineContent::Text(_) => None,
            })
            .collect()
    }

    /// Check if the paragraph is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty() || self.plain_text().trim().is_empty()
    }
}

impl From<&str> for Paragraph {
    fn from(text: &str) -> Self {
        Self::with_text(text)
    }
}

/// Inline content within a paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum InlineContent {
    /// A text run with styling
    Text(TextRun),

    /// A footnote reference, rendered as a superscript number
    FootnoteRef(u32),
}

/// A run of text with consistent styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub text: String,

    /// Text styling
    pub style: TextStyle,
}

impl TextRun {
    /// Create a new text run with default style.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle::default(),
        }
    }

    /// Create a bold text run.
    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle {
                bold: true,
                ..Default::default()
            },
        }
    }

    /// Create an italic text run.
    pub fn italic(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle {
                italic: true,
                ..Default::default()
            },
        }
    }

    /// Check if this run is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Text styling properties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Bold text
    pub bold: bool,

    /// Italic text
    pub italic: bool,

    /// Superscript
    pub superscript: bool,
}

impl TextStyle {
    /// Check if any styling is applied.
    pub fn has_styling(&self) -> bool {
        self.bold || self.italic || self.superscript
    }
}
