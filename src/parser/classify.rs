//! Line classification.
//!
//! Every input line is assigned exactly one [`LineKind`]. The rules are
//! tried in a fixed order and the first match wins, so the order of the
//! checks in [`LineClassifier::classify`] is part of the contract.

use regex::Regex;

use super::context::ScanState;
use super::options::BulletMode;
use crate::model::{CaptionKind, TocEntry};

/// Bullet glyphs in nesting order.
pub const BULLET_GLYPHS: [char; 4] = ['□', '○', '-', '•'];

/// Keywords that mark a numbered line as a bibliography entry.
const REFERENCE_KEYWORDS: &[&str] = &[
    "저자명",
    "논문제목",
    "저널명",
    "출판사명",
    "보고서제목",
    "기관명",
    "et al.",
    "pp.",
];

/// Classification of one source line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind {
    /// Empty or whitespace-only line
    Blank,

    /// Horizontal rule or editorial note, dropped from output
    Skip,

    /// `### Page N. Title` marker
    PageMarker {
        /// Marker title after the page number
        title: String,
    },

    /// `#` heading; level is the count of leading `#`
    Heading {
        /// Count of leading `#`
        level: u8,
        /// Heading text
        text: String,
    },

    /// `![alt](path)`
    Image {
        /// Alternative text
        alt: String,
        /// Image path as written
        path: String,
    },

    /// First row of a pipe table (the next line is a separator)
    TableStart,

    /// Continuation row of an open table
    TableRow,

    /// `<그림 N>` / `<표 N>` caption
    Caption {
        /// Figure or table
        kind: CaptionKind,
        /// Caption text after the marker
        text: String,
    },

    /// Bullet item; text keeps its glyph
    Bullet {
        /// Nesting level (1-4)
        level: u8,
        /// Trimmed line including the glyph
        text: String,
    },

    /// Table-of-contents line with dotted leader and page number
    TocEntry(TocEntry),

    /// Line carrying its own hierarchical number (`1.`, `1.1`, `Ⅰ`, `1)`)
    Numbered {
        /// Heading depth (1-3)
        depth: u8,
        /// Numeric components when the number is decimal (`2.3` → `[2, 3]`)
        numbers: Vec<u32>,
        /// Trimmed line
        text: String,
    },

    /// Numbered bibliography entry
    Reference {
        /// Trimmed line
        text: String,
    },

    /// Circled-number item (①, ②, ...)
    CircledItem {
        /// Trimmed line
        text: String,
    },

    /// Plain paragraph text
    Text {
        /// Trimmed line
        text: String,
    },
}

/// Ordered rule set mapping raw lines to [`LineKind`].
#[derive(Debug, Clone)]
pub struct LineClassifier {
    bullet_mode: BulletMode,
    page_markers: bool,
    heading: Regex,
    page_marker: Regex,
    image: Regex,
    caption: Regex,
    toc: Regex,
    numbered: Regex,
    own_number: Regex,
    year: Regex,
    roman: Regex,
    paren_number: Regex,
    circled: Regex,
}

impl LineClassifier {
    /// Create a classifier.
    pub fn new(bullet_mode: BulletMode, page_markers: bool) -> Self {
        Self {
            bullet_mode,
            page_markers,
            heading: Regex::new(r"^(#{1,6})\s+(.*?)(?:\s+#+)?\s*$").unwrap(),
            page_marker: Regex::new(r"^###\s+Page\s+\d+\.?\s*(.*)$").unwrap(),
            image: Regex::new(r"^!\[(.*?)\]\((.*?)\)").unwrap(),
            caption: Regex::new(
                r"(?i)^(?:[<\[]\s*(그림|표|figure|table)\s*\d+\s*[>\]]|(figure|table)\s+\d+[.:])\s*(.*)$",
            )
            .unwrap(),
            toc: Regex::new(r"^(.+?)\s*[…\.]{3,}.*?(\d+)\s*$").unwrap(),
            numbered: Regex::new(r"^(\d+)\.(?:(\d+)\.?(?:(\d+)\.?)?)?\s+\S").unwrap(),
            own_number: Regex::new(r"^(?:[ⅠⅡⅢⅣⅤⅥⅦⅧⅨⅩⅪⅫ]+\.?|\d+(?:\.\d+)*\.?|\d+\))\s").unwrap(),
            year: Regex::new(r"\(\d{4}\)").unwrap(),
            roman: Regex::new(r"^[ⅠⅡⅢⅣⅤⅥⅦⅧⅨⅩⅪⅫ]+\.?\s+").unwrap(),
            paren_number: Regex::new(r"^\d+\)\s+").unwrap(),
            circled: Regex::new(r"^[①-⑳]").unwrap(),
        }
    }

    /// Classify one raw line.
    ///
    /// `next` is the following raw line (used to detect a table start) and
    /// `state` tells whether a table is currently open.
    pub fn classify(&self, line: &str, next: Option<&str>, state: ScanState) -> LineKind {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            return LineKind::Blank;
        }

        if state == ScanState::InTable && is_table_line(trimmed) {
            return LineKind::TableRow;
        }

        if is_rule(trimmed) || trimmed.starts_with("**※") || trimmed.starts_with("(※") {
            return LineKind::Skip;
        }

        if self.page_markers {
            if let Some(caps) = self.page_marker.captures(trimmed) {
                return LineKind::PageMarker {
                    title: caps[1].trim().to_string(),
                };
            }
        }

        if let Some(caps) = self.heading.captures(trimmed) {
            return LineKind::Heading {
                level: caps[1].len() as u8,
                text: caps[2].to_string(),
            };
        }

        if let Some(caps) = self.image.captures(trimmed) {
            let path = caps[2].trim();
            let path = path
                .strip_prefix('<')
                .and_then(|p| p.strip_suffix('>'))
                .unwrap_or(path);
            return LineKind::Image {
                alt: caps[1].trim().to_string(),
                path: path.to_string(),
            };
        }

        if is_table_line(trimmed) && next.map(is_table_separator).unwrap_or(false) {
            return LineKind::TableStart;
        }

        if let Some((kind, text)) = self.caption(trimmed) {
            return LineKind::Caption { kind, text };
        }

        if let Some(level) = self.bullet_level(line) {
            return LineKind::Bullet {
                level,
                text: trimmed.to_string(),
            };
        }

        if let Some(entry) = self.toc_entry(line) {
            return LineKind::TocEntry(entry);
        }

        if let Some(numbers) = self.section_numbers(trimmed) {
            if self.is_reference_item(trimmed) {
                return LineKind::Reference {
                    text: trimmed.to_string(),
                };
            }
            return LineKind::Numbered {
                depth: numbers.len().clamp(1, 3) as u8,
                numbers,
                text: trimmed.to_string(),
            };
        }

        if self.roman.is_match(trimmed) {
            return LineKind::Numbered {
                depth: 1,
                numbers: Vec::new(),
                text: trimmed.to_string(),
            };
        }

        if self.paren_number.is_match(trimmed) {
            return LineKind::Numbered {
                depth: 3,
                numbers: Vec::new(),
                text: trimmed.to_string(),
            };
        }

        if self.circled.is_match(trimmed) {
            return LineKind::CircledItem {
                text: trimmed.to_string(),
            };
        }

        LineKind::Text {
            text: trimmed.to_string(),
        }
    }

    /// Parse a caption line into its kind and text.
    pub fn caption(&self, trimmed: &str) -> Option<(CaptionKind, String)> {
        let caps = self.caption.captures(trimmed)?;
        let label = caps.get(1).or_else(|| caps.get(2))?.as_str();
        let kind = match label.to_lowercase().as_str() {
            "그림" | "figure" => CaptionKind::Figure,
            _ => CaptionKind::Table,
        };
        Some((kind, caps[3].trim().to_string()))
    }

    /// Nesting level of a bullet line, or `None` if the line is no bullet.
    pub fn bullet_level(&self, line: &str) -> Option<u8> {
        let body = line.trim_start();
        let glyph = body.chars().next()?;
        let position = BULLET_GLYPHS.iter().position(|g| *g == glyph)?;

        // "-5%" is text, "- 5%" is a bullet
        if glyph == '-' {
            match body[1..].chars().next() {
                Some(c) if !c.is_whitespace() => return None,
                _ => {}
            }
        }

        let level = match self.bullet_mode {
            BulletMode::Indentation => (indent_width(line) / 2 + 1).min(4),
            BulletMode::Glyph => position + 1,
        };
        Some(level as u8)
    }

    /// Parse a table-of-contents line.
    pub fn toc_entry(&self, line: &str) -> Option<TocEntry> {
        let caps = self.toc.captures(line.trim())?;
        let title = caps[1].trim();
        if title.is_empty() {
            return None;
        }
        let level = (toc_indent_units(line) + 1).min(3) as u8;
        Some(TocEntry {
            level,
            title: title.to_string(),
            page: caps[2].to_string(),
        })
    }

    /// Check whether heading text carries its own numbering
    /// (`Ⅱ.`, `3.`, `2.1`, `1)`).
    pub fn has_own_number(&self, text: &str) -> bool {
        self.own_number.is_match(text.trim_start())
    }

    /// Decimal section number at the start of the text (`3.` gives `[3]`,
    /// `2.1.4` gives `[2, 1, 4]`).
    pub fn section_numbers(&self, text: &str) -> Option<Vec<u32>> {
        let caps = self.numbered.captures(text.trim_start())?;
        let numbers: Vec<u32> = (1..=3)
            .filter_map(|i| caps.get(i))
            .filter_map(|m| m.as_str().parse().ok())
            .collect();
        Some(numbers)
    }

    /// Check whether a numbered line is a bibliography entry.
    pub fn is_reference_item(&self, trimmed: &str) -> bool {
        self.year.is_match(trimmed) || REFERENCE_KEYWORDS.iter().any(|k| trimmed.contains(k))
    }
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new(BulletMode::Indentation, true)
    }
}

/// Check whether a line belongs to a pipe table.
pub fn is_table_line(line: &str) -> bool {
    line.contains('|')
}

/// Check whether a line is a table header separator (`|---|:--:|`).
pub fn is_table_separator(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.contains('-')
        && trimmed.contains('|')
        && trimmed
            .chars()
            .all(|c| matches!(c, '|' | '-' | ':') || c.is_whitespace())
}

fn is_rule(trimmed: &str) -> bool {
    trimmed.len() >= 3
        && (trimmed.chars().all(|c| c == '-')
            || trimmed.chars().all(|c| c == '*')
            || trimmed.chars().all(|c| c == '_'))
}

/// Leading indentation width in columns (tab = 4, full-width space = 2).
pub fn indent_width(line: &str) -> usize {
    line.chars()
        .take_while(|c| c.is_whitespace())
        .map(|c| match c {
            '\t' => 4,
            '\u{3000}' | '\u{2003}' => 2,
            _ => 1,
        })
        .sum()
}

/// Indentation units of a TOC line: one per full-width space, em space or
/// tab, one per two ASCII spaces.
fn toc_indent_units(line: &str) -> usize {
    let mut units = 0;
    let mut spaces = 0;
    for c in line.chars().take_while(|c| c.is_whitespace()) {
        match c {
            '\u{3000}' | '\u{2003}' | '\t' => units += 1,
            _ => spaces += 1,
        }
    }
    units + spaces / 2
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(line: &str) -> LineKind {
        LineClassifier::default().classify(line, None, ScanState::Scanning)
    }

    #[test]
    fn test_blank_and_skip() {
        assert_eq!(classify("   "), LineKind::Blank);
        assert_eq!(classify("---"), LineKind::Skip);
        assert_eq!(classify("**※ 작성 요령 삭제**"), LineKind::Skip);
    }

    #[test]
    fn test_headings() {
        assert_eq!(
            classify("## 사업 개요"),
            LineKind::Heading {
                level: 2,
                text: "사업 개요".into()
            }
        );
        assert_eq!(
            classify("#### 세부"),
            LineKind::Heading {
                level: 4,
                text: "세부".into()
            }
        );
        assert!(matches!(classify("#해시태그"), LineKind::Text { .. }));
    }

    #[test]
    fn test_page_marker() {
        assert_eq!(
            classify("### Page 3. 시장 분석"),
            LineKind::PageMarker {
                title: "시장 분석".into()
            }
        );
        let no_markers = LineClassifier::new(BulletMode::Indentation, false);
        assert!(matches!(
            no_markers.classify("### Page 3. 시장", None, ScanState::Scanning),
            LineKind::Heading { level: 3, .. }
        ));
    }

    #[test]
    fn test_image() {
        assert_eq!(
            classify("![매출 추이](images/sales.png)"),
            LineKind::Image {
                alt: "매출 추이".into(),
                path: "images/sales.png".into()
            }
        );
    }

    #[test]
    fn test_table_start_needs_separator() {
        let c = LineClassifier::default();
        assert_eq!(
            c.classify("| a | b |", Some("|---|:-:|"), ScanState::Scanning),
            LineKind::TableStart
        );
        assert!(matches!(
            c.classify("a | b", Some("plain"), ScanState::Scanning),
            LineKind::Text { .. }
        ));
        assert_eq!(
            c.classify("| 1 | 2 |", None, ScanState::InTable),
            LineKind::TableRow
        );
    }

    #[test]
    fn test_captions() {
        assert_eq!(
            classify("<표 1> 분석 결과"),
            LineKind::Caption {
                kind: CaptionKind::Table,
                text: "분석 결과".into()
            }
        );
        assert_eq!(
            classify("[그림 12] 조직도"),
            LineKind::Caption {
                kind: CaptionKind::Figure,
                text: "조직도".into()
            }
        );
        assert!(matches!(
            classify("Table 3. Market size"),
            LineKind::Caption {
                kind: CaptionKind::Table,
                ..
            }
        ));
        assert!(matches!(classify("Table 3 shows growth"), LineKind::Text { .. }));
        assert!(matches!(
            classify("<Figure 2> Revenue"),
            LineKind::Caption {
                kind: CaptionKind::Figure,
                ..
            }
        ));
    }

    #[test]
    fn test_bullet_levels_by_indentation() {
        let cases = [
            ("□ 항목", 1),
            ("  ○ 항목", 2),
            ("    - 항목", 3),
            ("      • 항목", 4),
            ("          • 항목", 4),
        ];
        for (line, expected) in cases {
            match classify(line) {
                LineKind::Bullet { level, text } => {
                    assert_eq!(level, expected, "{line}");
                    assert_eq!(text, line.trim());
                }
                other => panic!("{line}: {other:?}"),
            }
        }
    }

    #[test]
    fn test_bullet_levels_by_glyph() {
        let c = LineClassifier::new(BulletMode::Glyph, true);
        assert_eq!(c.bullet_level("• 항목"), Some(4));
        assert_eq!(c.bullet_level("      □ 항목"), Some(1));
    }

    #[test]
    fn test_dash_needs_space() {
        assert!(matches!(classify("-5% 감소"), LineKind::Text { .. }));
        assert!(matches!(classify("- 5% 감소"), LineKind::Bullet { .. }));
    }

    #[test]
    fn test_toc_entries() {
        assert_eq!(
            classify("1. 사업 개요 .......... 3"),
            LineKind::TocEntry(TocEntry {
                level: 1,
                title: "1. 사업 개요".into(),
                page: "3".into()
            })
        );
        match classify("\u{3000}1.1 시장 현황……………5") {
            LineKind::TocEntry(entry) => {
                assert_eq!(entry.level, 2);
                assert_eq!(entry.title, "1.1 시장 현황");
                assert_eq!(entry.page, "5");
            }
            other => panic!("{other:?}"),
        }
        match classify("\t\t\t가. 세부 ... 10") {
            LineKind::TocEntry(entry) => assert_eq!(entry.level, 3),
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn test_numbered_depths() {
        assert!(matches!(
            classify("1. 사업 개요"),
            LineKind::Numbered { depth: 1, .. }
        ));
        match classify("2.3 경쟁 분석") {
            LineKind::Numbered { depth, numbers, .. } => {
                assert_eq!(depth, 2);
                assert_eq!(numbers, vec![2, 3]);
            }
            other => panic!("{other:?}"),
        }
        assert!(matches!(
            classify("2.3.1 국내 시장"),
            LineKind::Numbered { depth: 3, .. }
        ));
        assert!(matches!(
            classify("Ⅱ. 시장 분석"),
            LineKind::Numbered { depth: 1, .. }
        ));
        assert!(matches!(
            classify("1) 세부 과제"),
            LineKind::Numbered { depth: 3, .. }
        ));
    }

    #[test]
    fn test_reference_items() {
        assert!(matches!(
            classify("1. 홍길동 (2023). 스마트팜 동향. 농업경제"),
            LineKind::Reference { .. }
        ));
        assert!(matches!(
            classify("2. 저자명, 보고서제목, 기관명"),
            LineKind::Reference { .. }
        ));
    }

    #[test]
    fn test_circled_and_text() {
        assert!(matches!(classify("① 첫째"), LineKind::CircledItem { .. }));
        assert_eq!(
            classify("일반 문단입니다."),
            LineKind::Text {
                text: "일반 문단입니다.".into()
            }
        );
    }

    #[test]
    fn test_own_numbering() {
        let c = LineClassifier::default();
        assert!(c.has_own_number("Ⅱ. 시장 분석"));
        assert!(c.has_own_number("2.1 경쟁사"));
        assert!(c.has_own_number("3. 계획"));
        assert!(c.has_own_number("1) 세부"));
        assert!(!c.has_own_number("시장 분석"));
        assert!(!c.has_own_number("2024년 계획"));
    }

    #[test]
    fn test_section_numbers() {
        let c = LineClassifier::default();
        assert_eq!(c.section_numbers("3. 시장"), Some(vec![3]));
        assert_eq!(c.section_numbers("2.1 경쟁사"), Some(vec![2, 1]));
        assert_eq!(c.section_numbers("1.2.3. 세부"), Some(vec![1, 2, 3]));
        assert_eq!(c.section_numbers("Ⅱ. 시장"), None);
        assert_eq!(c.section_numbers("시장 분석"), None);
    }

    #[test]
    fn test_separator_detection() {
        assert!(is_table_separator("|---|---|"));
        assert!(is_table_separator("| :--- | ---: |"));
        assert!(!is_table_separator("| a | b |"));
        assert!(!is_table_separator("---"));
    }

    #[test]
    fn test_indent_width() {
        assert_eq!(indent_width("  x"), 2);
        assert_eq!(indent_width("\tx"), 4);
        assert_eq!(indent_width("\u{3000}x"), 2);
    }
}
