//! Markdown document assembler.
//!
//! Drives a single top-to-bottom scan over the source lines, dispatching
//! each [`LineKind`] to a handler that appends blocks to the document held
//! by the [`ConversionContext`].

use std::io::Read;
use std::path::{Path, PathBuf};

use crate::detect::{decode_source, read_source};
use crate::error::{Error, Result};
use crate::model::{Block, Caption, CaptionKind, Document, Heading, Paragraph, Resource, Warning};

use super::classify::{LineClassifier, LineKind};
use super::context::{ConversionContext, ScanState};
use super::inline::InlineParser;
use super::options::{ErrorMode, ParseOptions};
use super::table::TableBuilder;

/// Lines examined after a table when looking for its caption.
const CAPTION_LOOKAHEAD: usize = 3;

/// Markdown document parser.
pub struct MarkdownParser {
    source: String,
    source_path: Option<PathBuf>,
    options: ParseOptions,
    classifier: LineClassifier,
    inline: InlineParser,
    tables: TableBuilder,
}

impl MarkdownParser {
    /// Open a Markdown file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a Markdown file with custom options.
    ///
    /// Relative image paths resolve against the file's directory unless the
    /// options already name a base directory.
    pub fn open_with_options<P: AsRef<Path>>(path: P, mut options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        let source = read_source(path)?;

        if options.base_dir.is_none() {
            options.base_dir = path.parent().map(Path::to_path_buf);
        }

        let mut parser = Self::from_text_with_options(source, options);
        parser.source_path = Some(path.to_path_buf());
        Ok(parser)
    }

    /// Parse Markdown from a string.
    pub fn from_text(source: impl Into<String>) -> Self {
        Self::from_text_with_options(source, ParseOptions::default())
    }

    /// Parse Markdown from a string with custom options.
    pub fn from_text_with_options(source: impl Into<String>, options: ParseOptions) -> Self {
        let classifier = LineClassifier::new(options.bullet_mode, options.page_markers);
        Self {
            source: source.into(),
            source_path: None,
            options,
            classifier,
            inline: InlineParser::new(),
            tables: TableBuilder::new(),
        }
    }

    /// Parse Markdown from raw bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        let source = decode_source(data)?;
        Ok(Self::from_text_with_options(source, options))
    }

    /// Parse Markdown from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: ParseOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Get the parse options.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Run the scan and build the document.
    pub fn parse(&self) -> Result<Document> {
        let lines: Vec<&str> = self.source.split('\n').collect();
        let mut ctx = ConversionContext::new();

        if let Some(ref path) = self.source_path {
            ctx.document.metadata.source = Some(path.display().to_string());
            log::info!("Converting {}", path.display());
        }

        let mut i = 0;
        while i < lines.len() {
            i = self.handle_line(&lines, i, &mut ctx)?;
        }

        ctx.state = ScanState::Done;
        self.flush_notes(&mut ctx);

        let doc = ctx.finish();
        log::info!(
            "Assembled {} blocks, {} footnotes, {} warnings",
            doc.blocks.len(),
            doc.footnotes.len(),
            doc.warnings.len()
        );
        Ok(doc)
    }

    /// Handle the line at `i` and return the index of the next unhandled line.
    fn handle_line(&self, lines: &[&str], i: usize, ctx: &mut ConversionContext) -> Result<usize> {
        let line = lines[i];
        let next = lines.get(i + 1).copied();
        let kind = self.classifier.classify(line, next, ctx.state);
        log::debug!("line {}: {:?}", i + 1, kind);

        match kind {
            LineKind::Blank | LineKind::Skip => {}

            LineKind::PageMarker { .. } => {
                let after_break = matches!(ctx.document.blocks.last(), None | Some(Block::PageBreak));
                if !after_break {
                    ctx.document.push(Block::PageBreak);
                }
            }

            LineKind::Heading { level, text } => {
                if level > 1 && text.trim() == self.options.notes_title {
                    return Ok(self.read_notes_section(lines, i + 1, ctx));
                }
                self.push_heading(level, &text, ctx);
            }

            LineKind::Image { alt, path } => self.push_image(&alt, &path, i + 1, ctx)?,

            LineKind::TableStart | LineKind::TableRow => return Ok(self.consume_table(lines, i, ctx)),

            LineKind::Caption { kind, text } => self.push_caption(line, kind, text, ctx),

            LineKind::Bullet { level, text } => {
                let content = self.inline.parse(&text, &mut ctx.document.footnotes);
                ctx.document.push(Block::BulletItem { level, content });
            }

            LineKind::TocEntry(entry) => ctx.document.push(Block::TocEntry(entry)),

            LineKind::Numbered {
                depth,
                numbers,
                text,
            } => {
                if numbers.is_empty() {
                    ctx.sections.enter(depth);
                } else {
                    ctx.sections.sync(&numbers);
                }
                let content = self.inline.parse(&text, &mut ctx.document.footnotes);
                ctx.document.push(Block::Heading(Heading::new(depth, content)));
            }

            LineKind::Reference { text } => {
                let content = self.inline.parse(&text, &mut ctx.document.footnotes);
                ctx.document.push(Block::Reference(content));
            }

            LineKind::CircledItem { text } => {
                let content = self.inline.parse(&text, &mut ctx.document.footnotes);
                ctx.document.push(Block::NumberedItem(content));
            }

            LineKind::Text { text } => {
                let content = self.inline.parse(&text, &mut ctx.document.footnotes);
                ctx.document.push(Block::Paragraph(content));
            }
        }

        Ok(i + 1)
    }

    fn push_heading(&self, hashes: u8, text: &str, ctx: &mut ConversionContext) {
        if hashes == 1 && !ctx.title_seen {
            ctx.title_seen = true;
            let title = self.inline.parse(text, &mut ctx.document.footnotes);
            ctx.document.metadata.title = Some(title.text_only());
            ctx.document.push(Block::Title(title));
            return;
        }

        let level = hashes.saturating_sub(1).clamp(1, 3);
        let content = self.inline.parse(text, &mut ctx.document.footnotes);
        let mut heading = Heading::new(level, content);

        match self.classifier.section_numbers(text) {
            Some(numbers) => ctx.sections.align(level, &numbers),
            None => {
                let number = ctx.sections.enter(level);
                if self.options.number_headings && !self.classifier.has_own_number(text) {
                    heading = heading.with_number(number);
                }
            }
        }
        ctx.document.push(Block::Heading(heading));
    }

    fn push_caption(&self, raw: &str, kind: CaptionKind, text: String, ctx: &mut ConversionContext) {
        if !ctx.mark_caption(raw) {
            log::debug!("Skipping duplicate caption: {}", raw.trim());
            return;
        }
        let number = ctx.next_caption_number(kind);
        ctx.document.push(Block::Caption(Caption { kind, number, text }));
    }

    fn push_image(
        &self,
        alt: &str,
        path: &str,
        line: usize,
        ctx: &mut ConversionContext,
    ) -> Result<()> {
        if !self.options.embed_images {
            ctx.document
                .push(Block::Placeholder(format!("[이미지: {} - {}]", alt, path)));
            return Ok(());
        }

        let full = self.resolve_image_path(path);
        if !full.is_file() {
            if self.options.error_mode == ErrorMode::Strict {
                return Err(Error::MissingImage(full));
            }
            ctx.document.warn(Warning::MissingImage {
                path: path.to_string(),
                line,
            });
            ctx.document
                .push(Block::Placeholder(format!("[이미지 없음: {} - {}]", alt, path)));
            return Ok(());
        }

        let loaded = std::fs::read(&full)
            .map_err(Error::from)
            .and_then(Resource::probe);
        let resource = match loaded {
            Ok(resource) => resource,
            Err(e) => {
                if self.options.error_mode == ErrorMode::Strict {
                    return Err(e);
                }
                ctx.document.warn(Warning::ImageUnreadable {
                    path: path.to_string(),
                    line,
                    reason: e.to_string(),
                });
                ctx.document.push(Block::Placeholder(format!("[이미지 오류: {}]", alt)));
                return Ok(());
            }
        };

        let id = ctx.next_image_id();
        let resource = match full.file_name() {
            Some(name) => resource.with_filename(name.to_string_lossy()),
            None => resource,
        };
        log::debug!(
            "Embedding {} as {} ({}x{})",
            full.display(),
            id,
            resource.width,
            resource.height
        );
        ctx.document.add_resource(id.clone(), resource);
        ctx.document.push(Block::Image {
            resource_id: id,
            alt_text: alt.to_string(),
            path: path.to_string(),
        });
        Ok(())
    }

    fn resolve_image_path(&self, path: &str) -> PathBuf {
        let candidate = Path::new(path);
        match self.options.base_dir {
            Some(ref base) if candidate.is_relative() => base.join(candidate),
            _ => candidate.to_path_buf(),
        }
    }

    /// Collect an open table starting at `start`, emit its caption and the
    /// table itself, and return the index of the first line after it.
    fn consume_table(&self, lines: &[&str], start: usize, ctx: &mut ConversionContext) -> usize {
        ctx.state = ScanState::InTable;
        let mut end = start;
        while end < lines.len() {
            let next = lines.get(end + 1).copied();
            match self.classifier.classify(lines[end], next, ctx.state) {
                LineKind::TableRow => end += 1,
                _ => break,
            }
        }
        ctx.state = ScanState::Scanning;

        let mut resume = end;
        if let Some((index, kind, text)) = self.find_trailing_caption(lines, end) {
            self.push_caption(lines[index], kind, text, ctx);
            resume = index + 1;
        }

        match self
            .tables
            .build(&lines[start..end], &self.inline, &mut ctx.document.footnotes)
        {
            Some(table) => {
                log::debug!(
                    "Table at line {}: {} rows x {} columns",
                    start + 1,
                    table.row_count(),
                    table.column_count()
                );
                ctx.document.push(Block::Table(table));
                ctx.document.push(Block::Spacer);
            }
            None => ctx.document.warn(Warning::EmptyTable { line: start + 1 }),
        }

        resume
    }

    /// Look for a table caption within the lines following a table.
    ///
    /// Blank lines are skipped; the first other line ends the search.
    fn find_trailing_caption(
        &self,
        lines: &[&str],
        from: usize,
    ) -> Option<(usize, CaptionKind, String)> {
        for (index, line) in lines.iter().enumerate().skip(from).take(CAPTION_LOOKAHEAD) {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            return match self.classifier.caption(trimmed) {
                Some((CaptionKind::Table, text)) => Some((index, CaptionKind::Table, text)),
                _ => None,
            };
        }
        None
    }

    /// Read a source notes section into the footnote registry.
    ///
    /// The section ends at the next heading line.
    fn read_notes_section(&self, lines: &[&str], start: usize, ctx: &mut ConversionContext) -> usize {
        let extractor = self.inline.footnotes();
        let mut i = start;
        while i < lines.len() {
            let trimmed = lines[i].trim();
            if trimmed.starts_with('#') {
                break;
            }
            i += 1;
            if trimmed.is_empty() {
                continue;
            }

            let (number, text) = extractor.parse_note_line(trimmed);
            if text.is_empty() {
                continue;
            }
            let registry = &mut ctx.document.footnotes;
            match number {
                Some(n) => {
                    if !registry.define_if_absent(n, text) {
                        log::debug!("Footnote {} already defined, keeping inline text", n);
                    }
                }
                None => {
                    registry.add_auto(text);
                }
            }
        }
        i
    }

    /// Append the notes section when any footnote was registered.
    fn flush_notes(&self, ctx: &mut ConversionContext) {
        if ctx.document.footnotes.is_empty() {
            return;
        }

        let notes: Vec<Block> = ctx
            .document
            .footnotes
            .iter()
            .map(|(number, note)| Block::Note {
                number,
                text: note.text.clone(),
            })
            .collect();

        let doc = &mut ctx.document;
        doc.push(Block::PageBreak);
        doc.push(Block::Heading(Heading::new(
            1,
            Paragraph::with_text(self.options.notes_title.as_str()),
        )));
        for note in notes {
            doc.push(note);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Document {
        MarkdownParser::from_text(source).parse().unwrap()
    }

    #[test]
    fn test_title_heading_body() {
        let doc = parse("# Title\n## Intro\nHello");
        assert_eq!(doc.blocks.len(), 3);
        assert_eq!(doc.blocks[0].kind(), "title");
        assert_eq!(doc.blocks[0].plain_text(), "Title");
        match &doc.blocks[1] {
            Block::Heading(h) => {
                assert_eq!(h.level, 1);
                assert_eq!(h.text(), "Intro");
                assert_eq!(h.number.as_deref(), Some("1."));
            }
            other => panic!("{other:?}"),
        }
        assert_eq!(doc.blocks[2].plain_text(), "Hello");
        assert_eq!(doc.title(), Some("Title"));
    }

    #[test]
    fn test_heading_numbering() {
        let doc = parse("# T\n## A\n### A1\n### A2\n## B\n### B1");
        let numbers: Vec<String> = doc
            .blocks
            .iter()
            .filter_map(|b| match b {
                Block::Heading(h) => h.number.clone(),
                _ => None,
            })
            .collect();
        assert_eq!(numbers, vec!["1.", "1.1", "1.2", "2.", "2.1"]);
    }

    #[test]
    fn test_own_numbering_kept() {
        let doc = parse("## Ⅰ. 사업 개요\n## 2. 시장");
        for block in &doc.blocks {
            if let Block::Heading(h) = block {
                assert!(h.number.is_none(), "{:?}", h);
            }
        }
    }

    #[test]
    fn test_title_keeps_footnote_reference() {
        let doc = parse("# 사업계획서^1^[출처]\n본문");
        assert_eq!(doc.title(), Some("사업계획서"));
        match &doc.blocks[0] {
            Block::Title(p) => assert_eq!(p.footnote_refs(), vec![1]),
            other => panic!("{other:?}"),
        }
        assert_eq!(doc.footnotes.get(1), Some("출처"));
    }

    #[test]
    fn test_own_number_resyncs_children() {
        let doc = parse("# T\n## 3. 시장 분석\n### 세부 항목\n## 다음 장");
        let numbers: Vec<Option<String>> = doc
            .blocks
            .iter()
            .filter_map(|b| match b {
                Block::Heading(h) => Some(h.number.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(
            numbers,
            vec![None, Some("3.1".to_string()), Some("4.".to_string())]
        );
    }

    #[test]
    fn test_numbering_disabled() {
        let options = ParseOptions::new().with_heading_numbers(false);
        let doc = MarkdownParser::from_text_with_options("## 개요", options)
            .parse()
            .unwrap();
        match &doc.blocks[0] {
            Block::Heading(h) => assert!(h.number.is_none()),
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn test_second_h1_is_heading() {
        let doc = parse("# 표지\n# 본문");
        assert!(matches!(doc.blocks[1], Block::Heading(ref h) if h.level == 1));
    }

    #[test]
    fn test_table_with_surrounding_captions_dedup() {
        let doc = parse("<표 1> 분석 결과\n| a | b |\n|---|---|\n| 1 | 2 |\n\n<표 1> 분석 결과\n다음 문단");
        let captions: Vec<_> = doc.blocks_of_kind("caption").collect();
        assert_eq!(captions.len(), 1);
        assert_eq!(captions[0].plain_text(), "<표 1> 분석 결과");
        assert_eq!(doc.blocks_of_kind("table").count(), 1);
        assert_eq!(doc.blocks.last().map(|b| b.plain_text()), Some("다음 문단".into()));
    }

    #[test]
    fn test_trailing_caption_emitted_before_table() {
        let doc = parse("| a |\n|---|\n| 1 |\n<표 2> 비용");
        let kinds: Vec<&str> = doc.blocks.iter().map(|b| b.kind()).collect();
        assert_eq!(kinds, vec!["caption", "table", "spacer"]);
        match &doc.blocks[0] {
            Block::Caption(c) => assert_eq!(c.number, 1),
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn test_caption_search_stops_at_text() {
        let doc = parse("| a |\n|---|\n| 1 |\n본문\n<표 1> 나중");
        let kinds: Vec<&str> = doc.blocks.iter().map(|b| b.kind()).collect();
        assert_eq!(kinds, vec!["table", "spacer", "paragraph", "caption"]);
    }

    #[test]
    fn test_empty_table_warns() {
        let doc = parse("| | |\n|---|---|\n| 1 | 2 |");
        assert_eq!(doc.blocks_of_kind("table").count(), 0);
        assert_eq!(doc.warnings, vec![Warning::EmptyTable { line: 1 }]);
    }

    #[test]
    fn test_footnote_definition_survives_reference() {
        let doc = parse("시장^3^[통계청 자료]\n\n다시 언급^3^");
        let notes: Vec<_> = doc.blocks_of_kind("note").collect();
        assert_eq!(notes.len(), 1);
        assert_eq!(
            notes[0],
            &Block::Note {
                number: 3,
                text: "통계청 자료".into()
            }
        );
    }

    #[test]
    fn test_notes_section_appended_after_page_break() {
        let doc = parse("본문^1^[출처]");
        let kinds: Vec<&str> = doc.blocks.iter().map(|b| b.kind()).collect();
        assert_eq!(kinds, vec!["paragraph", "page_break", "heading", "note"]);
        assert_eq!(doc.blocks[2].plain_text(), "주석");
    }

    #[test]
    fn test_source_notes_section() {
        let doc = parse("본문^1^ 그리고^2^[인라인]\n\n## 주석\n1. 노트 섹션 정의\n2. 무시됨\n번호 없는 주석\n## 다음");
        assert_eq!(doc.footnotes.get(1), Some("노트 섹션 정의"));
        assert_eq!(doc.footnotes.get(2), Some("인라인"));
        assert_eq!(doc.footnotes.get(3), Some("번호 없는 주석"));
        assert!(doc
            .blocks
            .iter()
            .any(|b| matches!(b, Block::Heading(h) if h.text() == "다음")));
    }

    #[test]
    fn test_missing_image_placeholder() {
        let doc = parse("![그래프](images/missing.png)");
        assert_eq!(
            doc.blocks,
            vec![Block::Placeholder(
                "[이미지 없음: 그래프 - images/missing.png]".into()
            )]
        );
        assert_eq!(doc.warnings.len(), 1);
    }

    #[test]
    fn test_missing_image_strict() {
        let options = ParseOptions::new().strict();
        let result = MarkdownParser::from_text_with_options("![x](nope.png)", options).parse();
        assert!(matches!(result, Err(Error::MissingImage(_))));
    }

    #[test]
    fn test_page_marker_breaks() {
        let doc = parse("### Page 1. 표지\n제목\n### Page 2. 개요\n본문");
        let kinds: Vec<&str> = doc.blocks.iter().map(|b| b.kind()).collect();
        assert_eq!(kinds, vec!["paragraph", "page_break", "paragraph"]);
    }

    #[test]
    fn test_bullets_keep_glyph() {
        let doc = parse("□ 상위\n  ○ 하위");
        assert_eq!(
            doc.blocks[1],
            Block::BulletItem {
                level: 2,
                content: Paragraph::with_text("○ 하위")
            }
        );
    }
}
