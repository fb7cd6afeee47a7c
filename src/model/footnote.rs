//! Footnote registry collected during a conversion.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maps footnote numbers to their definition text.
///
/// Numbers are never reused: a bracketed definition replaces whatever was
/// stored for its number, a bare reference only fills a placeholder for an
/// unknown number, and auto-numbered notes always start above the highest
/// number seen so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FootnoteRegistry {
    entries: BTreeMap<u32, Footnote>,
    max_number: u32,
}

/// One registered footnote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footnote {
    /// Definition text
    pub text: String,

    /// True while only a bare reference has been seen
    pub placeholder: bool,
}

impl FootnoteRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an explicit definition, replacing any earlier text.
    pub fn define(&mut self, number: u32, text: impl Into<String>) {
        self.track(number);
        self.entries.insert(
            number,
            Footnote {
                text: text.into(),
                placeholder: false,
            },
        );
    }

    /// Register a bare reference. Existing entries are left untouched.
    pub fn reference(&mut self, number: u32) {
        self.track(number);
        self.entries.entry(number).or_insert_with(|| Footnote {
            text: placeholder_text(number),
            placeholder: true,
        });
    }

    /// Register a definition only if the number has no real definition yet.
    ///
    /// Returns true when the text was stored.
    pub fn define_if_absent(&mut self, number: u32, text: impl Into<String>) -> bool {
        match self.entries.get(&number) {
            Some(existing) if !existing.placeholder => false,
            _ => {
                self.define(number, text);
                true
            }
        }
    }

    /// Register a definition under the next free number.
    pub fn add_auto(&mut self, text: impl Into<String>) -> u32 {
        let number = self.max_number + 1;
        self.define(number, text);
        number
    }

    /// Get the definition text for a number.
    pub fn get(&self, number: u32) -> Option<&str> {
        self.entries.get(&number).map(|f| f.text.as_str())
    }

    /// Highest footnote number seen.
    pub fn max_number(&self) -> u32 {
        self.max_number
    }

    /// Number of registered footnotes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no footnote was registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in ascending numeric order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Footnote)> {
        self.entries.iter().map(|(n, f)| (*n, f))
    }

    fn track(&mut self, number: u32) {
        self.max_number = self.max_number.max(number);
    }
}

/// Text stored for a footnote that is referenced but never defined.
pub fn placeholder_text(number: u32) -> String {
    format!("참조 {}", number)
}
