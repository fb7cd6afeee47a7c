//! Footnote marker extraction.
//!
//! Markers look like `^3^` (bare reference) or `^3^[정의 텍스트]`
//! (reference plus inline definition). Every marker found is registered
//! with the document's [`FootnoteRegistry`].

use regex::Regex;

use crate::model::FootnoteRegistry;

/// A piece of text split at footnote markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    /// Literal text between markers
    Text(String),
    /// Reference to footnote N
    Ref(u32),
}

/// Splits text at footnote markers.
#[derive(Debug, Clone)]
pub struct FootnoteExtractor {
    marker: Regex,
    note_line: Regex,
}

impl FootnoteExtractor {
    /// Create an extractor.
    pub fn new() -> Self {
        Self {
            marker: Regex::new(r"\^(\d+)\^(?:\[([^\]]*)\])?").unwrap(),
            note_line: Regex::new(r"^(?:\^(\d+)\^|\[(\d+)\]|\((\d+)\)|(\d+)[.)])\s*(.*)$").unwrap(),
        }
    }

    /// Check whether text contains at least one footnote marker.
    pub fn has_marker(&self, text: &str) -> bool {
        self.marker.is_match(text)
    }

    /// Split text into literal spans and footnote references, registering
    /// every reference and inline definition.
    ///
    /// A number too large to represent is kept as literal text.
    pub fn extract(&self, text: &str, registry: &mut FootnoteRegistry) -> Vec<Span> {
        let mut spans = Vec::new();
        let mut last = 0;

        for caps in self.marker.captures_iter(text) {
            let whole = match caps.get(0) {
                Some(m) => m,
                None => continue,
            };
            let number: u32 = match caps[1].parse() {
                Ok(n) => n,
                Err(_) => continue,
            };

            if whole.start() > last {
                spans.push(Span::Text(text[last..whole.start()].to_string()));
            }

            match caps.get(2) {
                Some(def) if !def.as_str().trim().is_empty() => {
                    registry.define(number, def.as_str().trim())
                }
                _ => registry.reference(number),
            }
            spans.push(Span::Ref(number));
            last = whole.end();
        }

        if last < text.len() {
            spans.push(Span::Text(text[last..].to_string()));
        }
        spans
    }

    /// Parse one line of a source notes section.
    ///
    /// Returns the explicit number, if the line carries one, and the note
    /// text.
    pub fn parse_note_line<'a>(&self, line: &'a str) -> (Option<u32>, &'a str) {
        let trimmed = line.trim();
        if let Some(caps) = self.note_line.captures(trimmed) {
            let number = (1..=4)
                .filter_map(|i| caps.get(i))
                .find_map(|m| m.as_str().parse().ok());
            if let (Some(number), Some(text)) = (number, caps.get(5)) {
                return (Some(number), text.as_str().trim());
            }
        }
        (None, trimmed)
    }
}

impl Default for FootnoteExtractor {
    fn default() -> Self {
        Self::new()
    }
}
