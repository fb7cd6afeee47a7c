//! Inline formatting: footnote markers, emphasis and simple formulas.

use regex::Regex;

use super::footnote::{FootnoteExtractor, Span};
use crate::model::{FootnoteRegistry, Paragraph, TextRun};

/// LaTeX commands rewritten to plain Unicode, longest names first.
const LATEX_SYMBOLS: &[(&str, &str)] = &[
    (r"\approx", "≈"),
    (r"\times", "×"),
    (r"\infty", "∞"),
    (r"\alpha", "α"),
    (r"\gamma", "γ"),
    (r"\delta", "δ"),
    (r"\Delta", "Δ"),
    (r"\sigma", "σ"),
    (r"\theta", "θ"),
    (r"\lambda", "λ"),
    (r"\beta", "β"),
    (r"\cdot", "·"),
    (r"\leq", "≤"),
    (r"\geq", "≥"),
    (r"\neq", "≠"),
    (r"\sum", "Σ"),
    (r"\div", "÷"),
    (r"\mu", "μ"),
    (r"\pi", "π"),
    (r"\pm", "±"),
    (r"\%", "%"),
    (r"\,", " "),
];

/// Turns raw line text into a [`Paragraph`] of styled runs and footnote
/// references.
#[derive(Debug, Clone)]
pub struct InlineParser {
    footnotes: FootnoteExtractor,
    bold: Regex,
    italic: Regex,
    formula: Regex,
    text_cmd: Regex,
    frac: Regex,
}

impl InlineParser {
    /// Create an inline parser.
    pub fn new() -> Self {
        Self {
            footnotes: FootnoteExtractor::new(),
            bold: Regex::new(r"\*\*(.+?)\*\*").unwrap(),
            italic: Regex::new(r"\*([^*\s](?:[^*]*[^*\s])?)\*").unwrap(),
            formula: Regex::new(r"\\\[(.+?)\\\]|\\\((.+?)\\\)").unwrap(),
            text_cmd: Regex::new(r"\\(?:text|mathrm|textbf)\{([^{}]*)\}").unwrap(),
            frac: Regex::new(r"\\frac\{([^{}]*)\}\{([^{}]*)\}").unwrap(),
        }
    }

    /// Access the footnote extractor.
    pub fn footnotes(&self) -> &FootnoteExtractor {
        &self.footnotes
    }

    /// Parse a line of text, registering footnotes as a side effect.
    pub fn parse(&self, text: &str, registry: &mut FootnoteRegistry) -> Paragraph {
        let text = self.rewrite_formulas(text);
        let mut paragraph = Paragraph::new();

        for span in self.footnotes.extract(&text, registry) {
            match span {
                Span::Text(t) => {
                    for run in self.emphasis_runs(&t) {
                        paragraph.add_run(run);
                    }
                }
                Span::Ref(n) => paragraph.add_footnote_ref(n),
            }
        }
        paragraph
    }

    /// Split text into runs; `**bold**` takes precedence over `*italic*`.
    pub fn emphasis_runs(&self, text: &str) -> Vec<TextRun> {
        let mut runs = Vec::new();
        let mut last = 0;

        for caps in self.bold.captures_iter(text) {
            let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            self.push_italic_runs(&text[last..whole.start()], &mut runs);
            runs.push(TextRun::bold(inner.as_str()));
            last = whole.end();
        }
        self.push_italic_runs(&text[last..], &mut runs);

        runs.retain(|r| !r.is_empty());
        runs
    }

    fn push_italic_runs(&self, text: &str, runs: &mut Vec<TextRun>) {
        let mut last = 0;
        for caps in self.italic.captures_iter(text) {
            let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            runs.push(TextRun::new(&text[last..whole.start()]));
            runs.push(TextRun::italic(inner.as_str()));
            last = whole.end();
        }
        runs.push(TextRun::new(&text[last..]));
    }

    /// Rewrite `\[...\]` and `\(...\)` formulas to readable plain text.
    pub fn rewrite_formulas(&self, text: &str) -> String {
        if !text.contains('\\') {
            return text.to_string();
        }
        self.formula
            .replace_all(text, |caps: &regex::Captures<'_>| {
                let body = caps
                    .get(1)
                    .or_else(|| caps.get(2))
                    .map(|m| m.as_str())
                    .unwrap_or_default();
                self.latex_to_text(body)
            })
            .into_owned()
    }

    /// Convert a LaTeX formula body to plain text.
    pub fn latex_to_text(&self, formula: &str) -> String {
        let mut out = self.text_cmd.replace_all(formula, "$1").into_owned();
        out = self.frac.replace_all(&out, "($1)/($2)").into_owned();
        for (command, symbol) in LATEX_SYMBOLS {
            out = out.replace(command, symbol);
        }
        out.retain(|c| c != '{' && c != '}');
        out.trim().to_string()
    }
}

impl Default for InlineParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::InlineContent;

    #[test]
    fn test_bold_and_italic_runs() {
        let p = InlineParser::new();
        let runs = p.emphasis_runs("가 **굵게** 나 *기울임* 다");
        let texts: Vec<(&str, bool, bool)> = runs
            .iter()
            .map(|r| (r.text.as_str(), r.style.bold, r.style.italic))
            .collect();
        assert_eq!(
            texts,
            vec![
                ("가 ", false, false),
                ("굵게", true, false),
                (" 나 ", false, false),
                ("기울임", false, true),
                (" 다", false, false),
            ]
        );
    }

    #[test]
    fn test_bold_wins_over_italic() {
        let p = InlineParser::new();
        let runs = p.emphasis_runs("**핵심**");
        assert_eq!(runs.len(), 1);
        assert!(runs[0].style.bold);
        assert!(!runs[0].style.italic);
    }

    #[test]
    fn test_lone_asterisk_is_text() {
        let p = InlineParser::new();
        let runs = p.emphasis_runs("5 * 3 = 15");
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "5 * 3 = 15");
    }

    #[test]
    fn test_parse_with_footnotes() {
        let p = InlineParser::new();
        let mut reg = FootnoteRegistry::new();
        let para = p.parse("**매출** 증가^1^[자체 집계]", &mut reg);

        assert_eq!(para.plain_text(), "매출 증가1");
        assert!(matches!(para.content.last(), Some(InlineContent::FootnoteRef(1))));
        assert_eq!(reg.get(1), Some("자체 집계"));
    }

    #[test]
    fn test_latex_rewrite() {
        let p = InlineParser::new();
        assert_eq!(
            p.rewrite_formulas(r"ROI = \[\frac{\text{이익}}{\text{투자}} \times 100\%\]"),
            "ROI = (이익)/(투자) × 100%"
        );
        assert_eq!(p.latex_to_text(r"a \leq b \pm c"), "a ≤ b ± c");
        assert_eq!(p.rewrite_formulas("no formula"), "no formula");
    }
}
