//! Mutable state threaded through one conversion.

use std::collections::HashSet;

use crate::model::{CaptionKind, Document};

/// Scan state of the line loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    /// Classifying ordinary lines
    #[default]
    Scanning,
    /// Collecting rows of an open table
    InTable,
    /// Input exhausted; notes are being flushed
    Done,
}

/// Hierarchical section counters for heading levels 1-3.
///
/// Entering a level increments it and resets every deeper level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionCounters {
    counts: [u32; 3],
}

impl SectionCounters {
    /// Create zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a heading of the given level (clamped to 1-3) and return its
    /// section number: `"2."`, `"2.1"` or `"2.1.3"`.
    pub fn enter(&mut self, level: u8) -> String {
        let idx = level.clamp(1, 3) as usize - 1;
        self.counts[idx] += 1;
        for deeper in &mut self.counts[idx + 1..] {
            *deeper = 0;
        }
        self.number(idx + 1)
    }

    /// Align the counters with an explicit number such as `[2, 3]`.
    pub fn sync(&mut self, numbers: &[u32]) {
        for (i, slot) in self.counts.iter_mut().enumerate() {
            *slot = numbers.get(i).copied().unwrap_or(0);
        }
    }

    /// Align the counters with a heading's own number at `level`.
    ///
    /// A full number (`2.3` at level 2) replaces every counter. A shorter
    /// one (`3.` at level 2) sets only that level, keeping its parents.
    pub fn align(&mut self, level: u8, numbers: &[u32]) {
        let depth = level.clamp(1, 3) as usize;
        if numbers.len() >= depth {
            self.sync(numbers);
            return;
        }
        if let Some(&last) = numbers.last() {
            self.counts[depth - 1] = last;
            for deeper in &mut self.counts[depth..] {
                *deeper = 0;
            }
        }
    }

    /// Current counter value for a level.
    pub fn get(&self, level: u8) -> u32 {
        self.counts[level.clamp(1, 3) as usize - 1]
    }

    fn number(&self, depth: usize) -> String {
        if depth == 1 {
            return format!("{}.", self.counts[0]);
        }
        self.counts[..depth]
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// State of one conversion: the document under construction plus every
/// counter and flag the line handlers share.
#[derive(Debug, Default)]
pub struct ConversionContext {
    /// Document being assembled
    pub document: Document,

    /// Scan state
    pub state: ScanState,

    /// Heading counters
    pub sections: SectionCounters,

    /// Figure captions emitted so far
    pub figure_count: u32,

    /// Table captions emitted so far
    pub table_count: u32,

    /// Raw caption lines already emitted
    pub processed_captions: HashSet<String>,

    /// Whether the document title has been taken
    pub title_seen: bool,

    /// Images embedded so far
    pub image_count: u32,
}

impl ConversionContext {
    /// Create a fresh context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the running counter for a caption kind.
    pub fn next_caption_number(&mut self, kind: CaptionKind) -> u32 {
        let counter = match kind {
            CaptionKind::Figure => &mut self.figure_count,
            CaptionKind::Table => &mut self.table_count,
        };
        *counter += 1;
        *counter
    }

    /// Mark a caption line as emitted. Returns false if it already was.
    pub fn mark_caption(&mut self, raw: &str) -> bool {
        self.processed_captions.insert(raw.trim().to_string())
    }

    /// Allocate the next image resource ID.
    pub fn next_image_id(&mut self) -> String {
        self.image_count += 1;
        format!("image{}", self.image_count)
    }

    /// Consume the context and return the finished document.
    pub fn finish(self) -> Document {
        self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_counters_reset_deeper_levels() {
        let mut s = SectionCounters::new();
        assert_eq!(s.enter(1), "1.");
        assert_eq!(s.enter(2), "1.1");
        assert_eq!(s.enter(3), "1.1.1");
        assert_eq!(s.enter(2), "1.2");
        assert_eq!(s.get(3), 0);
        assert_eq!(s.enter(1), "2.");
        assert_eq!(s.enter(3), "2.0.1");
    }

    #[test]
    fn test_section_sync() {
        let mut s = SectionCounters::new();
        s.sync(&[3, 2]);
        assert_eq!(s.enter(3), "3.2.1");
        assert_eq!(s.enter(2), "3.3");
    }

    #[test]
    fn test_section_align() {
        let mut s = SectionCounters::new();
        s.align(1, &[3]);
        assert_eq!(s.enter(2), "3.1");

        s.align(2, &[5]);
        assert_eq!(s.get(1), 3);
        assert_eq!(s.enter(3), "3.5.1");

        s.align(2, &[4, 2]);
        assert_eq!(s.enter(2), "4.3");
    }

    #[test]
    fn test_caption_counters_are_independent() {
        let mut ctx = ConversionContext::new();
        assert_eq!(ctx.next_caption_number(CaptionKind::Table), 1);
        assert_eq!(ctx.next_caption_number(CaptionKind::Figure), 1);
        assert_eq!(ctx.next_caption_number(CaptionKind::Table), 2);
    }

    #[test]
    fn test_mark_caption() {
        let mut ctx = ConversionContext::new();
        assert!(ctx.mark_caption("<표 1> 결과"));
        assert!(!ctx.mark_caption("  <표 1> 결과  "));
    }
}
