//! DOCX writer.
//!
//! Serializes a [`Document`] into an OOXML package. Every block maps to one
//! or more `w:p`/`w:tbl` elements in `word/document.xml`; paragraph
//! formatting comes from the named styles in `word/styles.xml`.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Cursor, Seek, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::options::RenderOptions;
use super::package::{self, MediaPart};
use super::styles::{half_points, styles_xml, StyleId};
use super::xml::escape;
use crate::error::Result;
use crate::model::{Block, Document, InlineContent, Paragraph, Resource, Table, TextStyle};

/// English Metric Units per inch.
pub const EMU_PER_INCH: u64 = 914_400;

/// Footnote reference size in points.
const FOOTNOTE_REF_PT: f32 = 8.0;

const DOCUMENT_OPEN: &str = concat!(
    r#"<w:document"#,
    r#" xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main""#,
    r#" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships""#,
    r#" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing""#,
    r#" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main""#,
    r#" xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture">"#
);

/// Convert a document to DOCX bytes.
pub fn to_docx(doc: &Document, options: &RenderOptions) -> Result<Vec<u8>> {
    DocxWriter::new(options.clone()).to_bytes(doc)
}

/// Write a document as a DOCX file.
pub fn write_docx<P: AsRef<Path>>(doc: &Document, path: P, options: &RenderOptions) -> Result<()> {
    DocxWriter::new(options.clone()).write_file(doc, path)
}

/// Writes documents as DOCX packages.
#[derive(Debug, Clone, Default)]
pub struct DocxWriter {
    options: RenderOptions,
}

impl DocxWriter {
    /// Create a writer with the given options.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Get the render options.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Serialize to an in-memory buffer.
    pub fn to_bytes(&self, doc: &Document) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        self.write(doc, &mut cursor)?;
        Ok(cursor.into_inner())
    }

    /// Serialize to a file, replacing it if it exists.
    pub fn write_file<P: AsRef<Path>>(&self, doc: &Document, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = BufWriter::new(File::create(path)?);
        self.write(doc, file)
    }

    /// Serialize to any seekable writer.
    pub fn write<W: Write + Seek>(&self, doc: &Document, writer: W) -> Result<()> {
        let media = collect_media(doc);
        let rel_ids: HashMap<&str, &MediaPart> = media
            .iter()
            .map(|(id, part)| (id.as_str(), part))
            .collect();
        let parts: Vec<MediaPart> = media.iter().map(|(_, p)| p.clone()).collect();

        let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

        let mut zip = ZipWriter::new(writer);

        let text_parts = [
            ("[Content_Types].xml", package::content_types_xml(&parts)),
            ("_rels/.rels", package::root_rels_xml()),
            (
                "docProps/core.xml",
                package::core_xml(&doc.metadata, self.options.author.as_deref()),
            ),
            ("docProps/app.xml", package::app_xml()),
            ("word/document.xml", self.document_xml(doc, &rel_ids)),
            ("word/styles.xml", styles_xml(&self.options)),
            ("word/settings.xml", package::settings_xml()),
            ("word/_rels/document.xml.rels", package::document_rels_xml(&parts)),
        ];
        for (name, content) in text_parts {
            zip.start_file(name, deflated)?;
            zip.write_all(content.as_bytes())?;
        }

        for (id, part) in &media {
            if let Some(resource) = doc.get_resource(id) {
                zip.start_file(part.part_name(), stored)?;
                zip.write_all(&resource.data)?;
            }
        }

        zip.finish()?;
        log::debug!(
            "Wrote DOCX package: {} blocks, {} media files",
            doc.blocks.len(),
            media.len()
        );
        Ok(())
    }

    /// Build `word/document.xml`.
    fn document_xml(&self, doc: &Document, media: &HashMap<&str, &MediaPart>) -> String {
        let mut out = String::with_capacity(doc.blocks.len() * 256 + 1024);
        out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        out.push_str(DOCUMENT_OPEN);
        out.push_str("<w:body>");

        let mut drawing_id = 0u32;
        for block in &doc.blocks {
            self.write_block(&mut out, block, doc, media, &mut drawing_id);
        }

        self.write_section(&mut out);
        out.push_str("</w:body></w:document>");
        out
    }

    fn write_block(
        &self,
        out: &mut String,
        block: &Block,
        doc: &Document,
        media: &HashMap<&str, &MediaPart>,
        drawing_id: &mut u32,
    ) {
        let style = StyleId::for_block(block);
        match block {
            Block::Title(content) => {
                open_paragraph(out, StyleId::Title);
                write_inline(out, content);
                out.push_str("</w:p>");
                if self.options.title_page_break {
                    write_page_break(out);
                } else {
                    out.push_str("<w:p/>");
                }
            }

            Block::Heading(heading) => {
                open_paragraph(out, StyleId::heading(heading.level));
                if let Some(ref number) = heading.number {
                    write_run(out, &format!("{} ", number), TextStyle::default());
                }
                write_inline(out, &heading.content);
                out.push_str("</w:p>");
            }

            Block::Paragraph(p)
            | Block::NumberedItem(p)
            | Block::Reference(p)
            | Block::BulletItem { content: p, .. } => {
                if let Some(style) = style {
                    open_paragraph(out, style);
                    write_inline(out, p);
                    out.push_str("</w:p>");
                }
            }

            Block::Table(table) => self.write_table(out, table),

            Block::Image {
                resource_id,
                alt_text,
                ..
            } => {
                let found = doc
                    .get_resource(resource_id)
                    .zip(media.get(resource_id.as_str()));
                match found {
                    Some((resource, part)) => {
                        *drawing_id += 1;
                        self.write_image(out, resource, part, alt_text, *drawing_id);
                    }
                    None => {
                        write_text_paragraph(out, StyleId::Placeholder, &format!("[이미지 오류: {}]", alt_text))
                    }
                }
            }

            Block::Placeholder(text) => write_text_paragraph(out, StyleId::Placeholder, text),

            Block::Caption(caption) => write_text_paragraph(out, StyleId::Caption, &caption.label()),

            Block::TocEntry(entry) => {
                open_paragraph(out, StyleId::toc(entry.level));
                write_run(out, &entry.title, TextStyle::default());
                out.push_str("<w:r><w:tab/></w:r>");
                write_run(out, &entry.page, TextStyle::default());
                out.push_str("</w:p>");
            }

            Block::PageBreak => write_page_break(out),

            Block::Spacer => out.push_str("<w:p/>"),

            Block::Note { number, text } => {
                open_paragraph(out, StyleId::Note);
                write_footnote_ref(out, *number);
                write_run(out, &format!(" {}", text), TextStyle::default());
                out.push_str("</w:p>");
            }
        }
    }

    fn write_table(&self, out: &mut String, table: &Table) {
        let columns = table.column_count().max(1);
        let total = self.options.text_width_twips();
        let col_width = total / columns as u32;

        out.push_str("<w:tbl><w:tblPr>");
        let _ = write!(out, r#"<w:tblW w:w="{}" w:type="dxa"/><w:jc w:val="center"/>"#, total);
        out.push_str("<w:tblBorders>");
        for edge in ["top", "left", "bottom", "right", "insideH", "insideV"] {
            let _ = write!(
                out,
                r#"<w:{} w:val="single" w:sz="4" w:space="0" w:color="auto"/>"#,
                edge
            );
        }
        out.push_str(r#"</w:tblBorders><w:tblLayout w:type="fixed"/>"#);
        out.push_str(r#"<w:tblLook w:val="04A0" w:firstRow="1" w:lastRow="0" w:firstColumn="1" w:lastColumn="0" w:noHBand="0" w:noVBand="1"/>"#);
        out.push_str("</w:tblPr><w:tblGrid>");
        for _ in 0..columns {
            let _ = write!(out, r#"<w:gridCol w:w="{}"/>"#, col_width);
        }
        out.push_str("</w:tblGrid>");

        for row in &table.rows {
            out.push_str("<w:tr>");
            if row.is_header {
                out.push_str("<w:trPr><w:tblHeader/></w:trPr>");
            }
            for index in 0..columns {
                let _ = write!(out, r#"<w:tc><w:tcPr><w:tcW w:w="{}" w:type="dxa"/>"#, col_width);
                if row.is_header {
                    let _ = write!(
                        out,
                        r#"<w:shd w:val="clear" w:color="auto" w:fill="{}"/>"#,
                        escape(&self.options.header_fill)
                    );
                }
                out.push_str(r#"<w:vAlign w:val="center"/></w:tcPr><w:p><w:pPr>"#);
                let _ = write!(out, r#"<w:pStyle w:val="{}"/>"#, StyleId::TableText.as_str());
                if row.is_header {
                    out.push_str(r#"<w:jc w:val="center"/>"#);
                }
                out.push_str("</w:pPr>");
                if let Some(cell) = row.cells.get(index) {
                    if row.is_header {
                        write_inline_with(out, &cell.content, |s| TextStyle { bold: true, ..s });
                    } else {
                        write_inline(out, &cell.content);
                    }
                }
                out.push_str("</w:p></w:tc>");
            }
            out.push_str("</w:tr>");
        }
        out.push_str("</w:tbl>");
    }

    fn write_image(
        &self,
        out: &mut String,
        resource: &Resource,
        part: &MediaPart,
        alt: &str,
        id: u32,
    ) {
        let cx = (self.options.image_width_in as f64 * EMU_PER_INCH as f64).round() as u64;
        let cy = resource.scaled_height(cx);
        let alt = escape(alt);
        let name = escape(&part.file_name);

        out.push_str(r#"<w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:drawing>"#);
        let _ = write!(
            out,
            concat!(
                r#"<wp:inline distT="0" distB="0" distL="0" distR="0">"#,
                r#"<wp:extent cx="{cx}" cy="{cy}"/>"#,
                r#"<wp:docPr id="{id}" name="Picture {id}" descr="{alt}"/>"#,
                r#"<wp:cNvGraphicFramePr><a:graphicFrameLocks noChangeAspect="1"/></wp:cNvGraphicFramePr>"#,
                r#"<a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture">"#,
                r#"<pic:pic><pic:nvPicPr><pic:cNvPr id="{id}" name="{name}"/><pic:cNvPicPr/></pic:nvPicPr>"#,
                r#"<pic:blipFill><a:blip r:embed="{rel}"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill>"#,
                r#"<pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>"#,
                r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr></pic:pic>"#,
                r#"</a:graphicData></a:graphic></wp:inline>"#
            ),
            cx = cx,
            cy = cy,
            id = id,
            alt = alt,
            name = name,
            rel = part.rel_id
        );
        out.push_str("</w:drawing></w:r></w:p>");
    }

    fn write_section(&self, out: &mut String) {
        let (width, height) = self.options.page_size.twips();
        let m = &self.options.margins;
        let twips = super::options::inches_to_twips;
        let _ = write!(
            out,
            concat!(
                r#"<w:sectPr><w:pgSz w:w="{}" w:h="{}"/>"#,
                r#"<w:pgMar w:top="{}" w:right="{}" w:bottom="{}" w:left="{}" w:header="720" w:footer="720" w:gutter="0"/>"#,
                r#"</w:sectPr>"#
            ),
            width,
            height,
            twips(m.top),
            twips(m.right),
            twips(m.bottom),
            twips(m.left)
        );
    }
}

/// Assign relationship IDs and media file names to every resource.
fn collect_media(doc: &Document) -> Vec<(String, MediaPart)> {
    doc.resources
        .iter()
        .enumerate()
        .map(|(index, (id, resource))| {
            let part = MediaPart {
                rel_id: format!("rId{}", index + 3),
                file_name: resource.suggested_filename(id),
                mime_type: resource.mime_type.clone(),
            };
            (id.clone(), part)
        })
        .collect()
}

fn open_paragraph(out: &mut String, style: StyleId) {
    let _ = write!(out, r#"<w:p><w:pPr><w:pStyle w:val="{}"/></w:pPr>"#, style.as_str());
}

fn write_text_paragraph(out: &mut String, style: StyleId, text: &str) {
    open_paragraph(out, style);
    write_run(out, text, TextStyle::default());
    out.push_str("</w:p>");
}

fn write_page_break(out: &mut String) {
    out.push_str(r#"<w:p><w:r><w:br w:type="page"/></w:r></w:p>"#);
}

fn write_inline(out: &mut String, paragraph: &Paragraph) {
    write_inline_with(out, paragraph, |s| s);
}

fn write_inline_with(out: &mut String, paragraph: &Paragraph, adjust: impl Fn(TextStyle) -> TextStyle) {
    for item in &paragraph.content {
        match item {
            InlineContent::Text(run) => write_run(out, &run.text, adjust(run.style)),
            InlineContent::FootnoteRef(n) => write_footnote_ref(out, *n),
        }
    }
}

fn write_footnote_ref(out: &mut String, number: u32) {
    let sz = half_points(FOOTNOTE_REF_PT);
    let _ = write!(
        out,
        r#"<w:r><w:rPr><w:sz w:val="{sz}"/><w:szCs w:val="{sz}"/><w:vertAlign w:val="superscript"/></w:rPr><w:t>{number}</w:t></w:r>"#
    );
}

/// Write one `w:r`; tabs become `w:tab` elements.
fn write_run(out: &mut String, text: &str, style: TextStyle) {
    if text.is_empty() {
        return;
    }
    out.push_str("<w:r>");
    if style.has_styling() {
        out.push_str("<w:rPr>");
        if style.bold {
            out.push_str("<w:b/><w:bCs/>");
        }
        if style.italic {
            out.push_str("<w:i/><w:iCs/>");
        }
        if style.superscript {
            out.push_str(r#"<w:vertAlign w:val="superscript"/>"#);
        }
        out.push_str("</w:rPr>");
    }
    for (i, piece) in text.split('\t').enumerate() {
        if i > 0 {
            out.push_str("<w:tab/>");
        }
        if !piece.is_empty() {
            let _ = write!(out, r#"<w:t xml:space="preserve">{}</w:t>"#, escape(piece));
        }
    }
    out.push_str("</w:r>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Caption, CaptionKind, Heading, TableCell, TableRow, TextRun};

    fn document_xml(doc: &Document) -> String {
        DocxWriter::default().document_xml(doc, &HashMap::new())
    }

    #[test]
    fn test_heading_number_prefix() {
        let mut doc = Document::new();
        doc.push(Block::Heading(
            Heading::new(1, Paragraph::with_text("개요")).with_number("1."),
        ));
        let xml = document_xml(&doc);
        assert!(xml.contains(r#"<w:pStyle w:val="Heading1"/>"#));
        assert!(xml.contains(">1. </w:t>"));
        assert!(xml.contains(">개요</w:t>"));
    }

    #[test]
    fn test_runs_are_styled_and_escaped() {
        let mut p = Paragraph::new();
        p.add_run(TextRun::bold("R&D"));
        p.add_footnote_ref(2);
        let mut doc = Document::new();
        doc.push(Block::Paragraph(p));

        let xml = document_xml(&doc);
        assert!(xml.contains("<w:b/>"));
        assert!(xml.contains("R&amp;D"));
        assert!(xml.contains(r#"<w:vertAlign w:val="superscript"/></w:rPr><w:t>2</w:t>"#));
    }

    #[test]
    fn test_table_pads_short_rows_and_shades_header() {
        let mut table = Table::new(3);
        table.add_row(TableRow::header(vec![
            TableCell::text("a"),
            TableCell::text("b"),
            TableCell::text("c"),
        ]));
        table.add_row(TableRow::from_strings(["1"]));
        let mut doc = Document::new();
        doc.push(Block::Table(table));

        let xml = document_xml(&doc);
        assert_eq!(xml.matches("<w:tc>").count(), 6);
        assert_eq!(xml.matches(r#"w:fill="F2F2F2""#).count(), 3);
        assert!(xml.contains("<w:tblHeader/>"));
    }

    #[test]
    fn test_toc_entry_has_tab() {
        let mut doc = Document::new();
        doc.push(Block::TocEntry(crate::model::TocEntry {
            level: 2,
            title: "시장 분석".into(),
            page: "7".into(),
        }));
        let xml = document_xml(&doc);
        assert!(xml.contains(r#"<w:pStyle w:val="TocEntry2"/>"#));
        assert!(xml.contains("<w:r><w:tab/></w:r>"));
    }

    #[test]
    fn test_caption_and_page_break() {
        let mut doc = Document::new();
        doc.push(Block::Caption(Caption {
            kind: CaptionKind::Figure,
            number: 2,
            text: "조직도".into(),
        }));
        doc.push(Block::PageBreak);
        let xml = document_xml(&doc);
        assert!(xml.contains("&lt;그림 2&gt; 조직도"));
        assert!(xml.contains(r#"<w:br w:type="page"/>"#));
    }

    #[test]
    fn test_image_without_resource_falls_back() {
        let mut doc = Document::new();
        doc.push(Block::Image {
            resource_id: "image9".into(),
            alt_text: "차트".into(),
            path: "chart.png".into(),
        });
        let xml = document_xml(&doc);
        assert!(xml.contains("[이미지 오류: 차트]"));
    }

    #[test]
    fn test_section_properties() {
        let xml = document_xml(&Document::new());
        assert!(xml.contains(r#"<w:pgSz w:w="11906" w:h="16838"/>"#));
        assert!(xml.contains(r#"w:top="1728""#));
        assert!(xml.contains(r#"w:right="1440""#));
    }

    #[test]
    fn test_to_bytes_is_zip() {
        let mut doc = Document::new();
        doc.push(Block::Title(Paragraph::with_text("제목")));
        let bytes = DocxWriter::default().to_bytes(&doc).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_title_renders_footnote_superscript() {
        let mut title = Paragraph::with_text("사업계획서");
        title.add_footnote_ref(1);
        let mut doc = Document::new();
        doc.push(Block::Title(title));

        let xml = document_xml(&doc);
        assert!(xml.contains(r#"<w:pStyle w:val="Title"/>"#));
        assert!(xml.contains(">사업계획서</w:t>"));
        assert!(xml.contains(r#"<w:vertAlign w:val="superscript"/></w:rPr><w:t>1</w:t>"#));
    }

    #[test]
    fn test_oversized_image_width_does_not_overflow() {
        let mut doc = Document::new();
        doc.add_resource(
            "image1".into(),
            Resource::image(vec![0; 8], "image/png", 1, u32::MAX),
        );
        doc.push(Block::Image {
            resource_id: "image1".into(),
            alt_text: "차트".into(),
            path: "chart.png".into(),
        });

        let options = RenderOptions {
            image_width_in: 1.0e12,
            ..RenderOptions::default()
        };
        let bytes = DocxWriter::new(options).to_bytes(&doc).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }
}
