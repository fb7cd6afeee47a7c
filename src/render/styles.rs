//! Paragraph styles and the `word/styles.xml` part.

use std::fmt::Write as _;

use super::options::{inches_to_twips, RenderOptions};
use super::xml::escape;
use crate::model::Block;

/// Named paragraph styles defined in every generated document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleId {
    /// Document title
    Title,
    /// Top-level section heading
    Heading1,
    /// Second-level heading
    Heading2,
    /// Third-level heading
    Heading3,
    /// Body text
    Body,
    /// Bullet item, level 1
    ListLevel1,
    /// Bullet item, level 2
    ListLevel2,
    /// Bullet item, level 3
    ListLevel3,
    /// Bullet item, level 4
    ListLevel4,
    /// Circled-number item
    List,
    /// Figure or table caption
    Caption,
    /// TOC line, level 1
    TocEntry1,
    /// TOC line, level 2
    TocEntry2,
    /// TOC line, level 3
    TocEntry3,
    /// Bibliography entry
    Reference,
    /// Footnote definition in the notes section
    Note,
    /// Missing image text
    Placeholder,
    /// Table cell text
    TableText,
}

impl StyleId {
    /// Every style, in the order written to `styles.xml`.
    pub const ALL: [StyleId; 18] = [
        StyleId::Title,
        StyleId::Heading1,
        StyleId::Heading2,
        StyleId::Heading3,
        StyleId::Body,
        StyleId::ListLevel1,
        StyleId::ListLevel2,
        StyleId::ListLevel3,
        StyleId::ListLevel4,
        StyleId::List,
        StyleId::Caption,
        StyleId::TocEntry1,
        StyleId::TocEntry2,
        StyleId::TocEntry3,
        StyleId::Reference,
        StyleId::Note,
        StyleId::Placeholder,
        StyleId::TableText,
    ];

    /// Style ID as written in `w:pStyle`.
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleId::Title => "Title",
            StyleId::Heading1 => "Heading1",
            StyleId::Heading2 => "Heading2",
            StyleId::Heading3 => "Heading3",
            StyleId::Body => "Body",
            StyleId::ListLevel1 => "ListLevel1",
            StyleId::ListLevel2 => "ListLevel2",
            StyleId::ListLevel3 => "ListLevel3",
            StyleId::ListLevel4 => "ListLevel4",
            StyleId::List => "List",
            StyleId::Caption => "Caption",
            StyleId::TocEntry1 => "TocEntry1",
            StyleId::TocEntry2 => "TocEntry2",
            StyleId::TocEntry3 => "TocEntry3",
            StyleId::Reference => "Reference",
            StyleId::Note => "Note",
            StyleId::Placeholder => "Placeholder",
            StyleId::TableText => "TableText",
        }
    }

    /// Heading style for a level (clamped to 1-3).
    pub fn heading(level: u8) -> Self {
        match level {
            0 | 1 => StyleId::Heading1,
            2 => StyleId::Heading2,
            _ => StyleId::Heading3,
        }
    }

    /// Bullet style for a nesting level (clamped to 1-4).
    pub fn list_level(level: u8) -> Self {
        match level {
            0 | 1 => StyleId::ListLevel1,
            2 => StyleId::ListLevel2,
            3 => StyleId::ListLevel3,
            _ => StyleId::ListLevel4,
        }
    }

    /// TOC style for a nesting level (clamped to 1-3).
    pub fn toc(level: u8) -> Self {
        match level {
            0 | 1 => StyleId::TocEntry1,
            2 => StyleId::TocEntry2,
            _ => StyleId::TocEntry3,
        }
    }

    /// Paragraph style a block is rendered with.
    ///
    /// Tables, images, page breaks and spacers have no paragraph style.
    pub fn for_block(block: &Block) -> Option<Self> {
        let style = match block {
            Block::Title(_) => StyleId::Title,
            Block::Heading(h) => StyleId::heading(h.level),
            Block::Paragraph(_) => StyleId::Body,
            Block::BulletItem { level, .. } => StyleId::list_level(*level),
            Block::NumberedItem(_) => StyleId::List,
            Block::Reference(_) => StyleId::Reference,
            Block::Placeholder(_) => StyleId::Placeholder,
            Block::Caption(_) => StyleId::Caption,
            Block::TocEntry(t) => StyleId::toc(t.level),
            Block::Note { .. } => StyleId::Note,
            Block::Table(_) | Block::Image { .. } | Block::PageBreak | Block::Spacer => {
                return None
            }
        };
        Some(style)
    }

    /// Formatting of this style.
    pub fn definition(&self, body_size_pt: f32) -> StyleDef {
        let base = StyleDef {
            size_pt: body_size_pt,
            after_pt: 6.0,
            ..StyleDef::default()
        };
        match self {
            StyleId::Title => StyleDef {
                name: "Title",
                size_pt: 20.0,
                bold: true,
                align: Some("center"),
                before_pt: 12.0,
                after_pt: 18.0,
                ..base
            },
            StyleId::Heading1 => StyleDef {
                name: "heading 1",
                size_pt: 16.0,
                bold: true,
                before_pt: 18.0,
                after_pt: 12.0,
                outline: Some(0),
                keep_next: true,
                ..base
            },
            StyleId::Heading2 => StyleDef {
                name: "heading 2",
                size_pt: 14.0,
                bold: true,
                before_pt: 12.0,
                after_pt: 8.0,
                left_in: 0.2,
                outline: Some(1),
                keep_next: true,
                ..base
            },
            StyleId::Heading3 => StyleDef {
                name: "heading 3",
                size_pt: 12.0,
                bold: true,
                before_pt: 8.0,
                after_pt: 6.0,
                left_in: 0.4,
                outline: Some(2),
                keep_next: true,
                ..base
            },
            StyleId::Body => StyleDef {
                name: "Body",
                first_line_in: 0.2,
                line: Some(1.15),
                ..base
            },
            StyleId::ListLevel1 => list_def("List Level 1", 0.25, base),
            StyleId::ListLevel2 => list_def("List Level 2", 0.5, base),
            StyleId::ListLevel3 => list_def("List Level 3", 0.75, base),
            StyleId::ListLevel4 => list_def("List Level 4", 1.0, base),
            StyleId::List => StyleDef {
                name: "List",
                left_in: 0.4,
                hanging_in: 0.2,
                after_pt: 3.0,
                ..base
            },
            StyleId::Caption => StyleDef {
                name: "caption",
                size_pt: 10.0,
                bold: true,
                align: Some("center"),
                before_pt: 6.0,
                after_pt: 6.0,
                ..base
            },
            StyleId::TocEntry1 => toc_def("TOC Entry 1", 12.0, 0.0, true, base),
            StyleId::TocEntry2 => toc_def("TOC Entry 2", 11.0, 0.3, false, base),
            StyleId::TocEntry3 => toc_def("TOC Entry 3", 10.0, 0.6, false, base),
            StyleId::Reference => StyleDef {
                name: "Reference",
                size_pt: 10.0,
                left_in: 0.3,
                hanging_in: 0.3,
                after_pt: 3.0,
                line: Some(1.2),
                ..base
            },
            StyleId::Note => StyleDef {
                name: "Note",
                size_pt: 9.0,
                after_pt: 3.0,
                ..base
            },
            StyleId::Placeholder => StyleDef {
                name: "Placeholder",
                size_pt: 10.0,
                italic: true,
                align: Some("center"),
                color: Some("808080"),
                ..base
            },
            StyleId::TableText => StyleDef {
                name: "Table Text",
                size_pt: 10.0,
                after_pt: 0.0,
                ..base
            },
        }
    }
}

fn list_def(name: &'static str, left_in: f32, base: StyleDef) -> StyleDef {
    StyleDef {
        name,
        left_in,
        after_pt: 3.0,
        ..base
    }
}

fn toc_def(name: &'static str, size_pt: f32, left_in: f32, bold: bool, base: StyleDef) -> StyleDef {
    StyleDef {
        name,
        size_pt,
        left_in,
        bold,
        after_pt: 4.0,
        tab_right_in: Some(4.5),
        ..base
    }
}

/// Formatting properties of one paragraph style.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StyleDef {
    /// Display name
    pub name: &'static str,
    /// Font size in points
    pub size_pt: f32,
    /// Bold
    pub bold: bool,
    /// Italic
    pub italic: bool,
    /// Paragraph alignment (`w:jc` value)
    pub align: Option<&'static str>,
    /// Space before in points
    pub before_pt: f32,
    /// Space after in points
    pub after_pt: f32,
    /// Left indent in inches
    pub left_in: f32,
    /// First-line indent in inches
    pub first_line_in: f32,
    /// Hanging indent in inches
    pub hanging_in: f32,
    /// Line spacing multiple
    pub line: Option<f32>,
    /// Right-aligned dot-leader tab stop in inches
    pub tab_right_in: Option<f32>,
    /// Outline level (0-based)
    pub outline: Option<u8>,
    /// Keep with next paragraph
    pub keep_next: bool,
    /// Text colour (hex RGB)
    pub color: Option<&'static str>,
}

/// Build the `word/styles.xml` part.
pub fn styles_xml(options: &RenderOptions) -> String {
    let font = escape(&options.font_name);
    let body_half_points = half_points(options.body_size_pt);

    let mut xml = String::with_capacity(8192);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(
        r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
    );
    let _ = write!(
        xml,
        concat!(
            r#"<w:docDefaults><w:rPrDefault><w:rPr>"#,
            r#"<w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:eastAsia="{font}" w:cs="{font}"/>"#,
            r#"<w:sz w:val="{sz}"/><w:szCs w:val="{sz}"/>"#,
            r#"<w:lang w:val="ko-KR" w:eastAsia="ko-KR"/>"#,
            r#"</w:rPr></w:rPrDefault><w:pPrDefault><w:pPr>"#,
            r#"<w:spacing w:after="0" w:line="240" w:lineRule="auto"/>"#,
            r#"</w:pPr></w:pPrDefault></w:docDefaults>"#
        ),
        font = font,
        sz = body_half_points
    );

    xml.push_str(
        r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style>"#,
    );
    xml.push_str(
        r#"<w:style w:type="table" w:default="1" w:styleId="TableNormal"><w:name w:val="Normal Table"/><w:tblPr><w:tblInd w:w="0" w:type="dxa"/><w:tblCellMar><w:top w:w="0" w:type="dxa"/><w:left w:w="108" w:type="dxa"/><w:bottom w:w="0" w:type="dxa"/><w:right w:w="108" w:type="dxa"/></w:tblCellMar></w:tblPr></w:style>"#,
    );

    for id in StyleId::ALL {
        write_style(&mut xml, id, &id.definition(options.body_size_pt));
    }

    xml.push_str("</w:styles>");
    xml
}

fn write_style(xml: &mut String, id: StyleId, def: &StyleDef) {
    let _ = write!(
        xml,
        r#"<w:style w:type="paragraph" w:customStyle="1" w:styleId="{}"><w:name w:val="{}"/><w:basedOn w:val="Normal"/><w:qFormat/><w:pPr>"#,
        id.as_str(),
        def.name
    );

    if def.keep_next {
        xml.push_str("<w:keepNext/>");
    }
    if let Some(tab) = def.tab_right_in {
        let _ = write!(
            xml,
            r#"<w:tabs><w:tab w:val="right" w:leader="dot" w:pos="{}"/></w:tabs>"#,
            inches_to_twips(tab)
        );
    }

    let _ = write!(
        xml,
        r#"<w:spacing w:before="{}" w:after="{}""#,
        points_to_twips(def.before_pt),
        points_to_twips(def.after_pt)
    );
    if let Some(line) = def.line {
        let _ = write!(xml, r#" w:line="{}" w:lineRule="auto""#, (line * 240.0).round() as u32);
    }
    xml.push_str("/>");

    if def.left_in > 0.0 || def.first_line_in > 0.0 || def.hanging_in > 0.0 {
        let _ = write!(xml, r#"<w:ind w:left="{}""#, inches_to_twips(def.left_in));
        if def.hanging_in > 0.0 {
            let _ = write!(xml, r#" w:hanging="{}""#, inches_to_twips(def.hanging_in));
        } else if def.first_line_in > 0.0 {
            let _ = write!(xml, r#" w:firstLine="{}""#, inches_to_twips(def.first_line_in));
        }
        xml.push_str("/>");
    }
    if let Some(align) = def.align {
        let _ = write!(xml, r#"<w:jc w:val="{}"/>"#, align);
    }
    if let Some(level) = def.outline {
        let _ = write!(xml, r#"<w:outlineLvl w:val="{}"/>"#, level);
    }

    xml.push_str("</w:pPr><w:rPr>");
    if def.bold {
        xml.push_str("<w:b/><w:bCs/>");
    }
    if def.italic {
        xml.push_str("<w:i/><w:iCs/>");
    }
    if let Some(color) = def.color {
        let _ = write!(xml, r#"<w:color w:val="{}"/>"#, color);
    }
    let sz = half_points(def.size_pt);
    let _ = write!(xml, r#"<w:sz w:val="{sz}"/><w:szCs w:val="{sz}"/>"#);
    xml.push_str("</w:rPr></w:style>");
}

/// Points to half-points (`w:sz`).
pub fn half_points(points: f32) -> u32 {
    (points * 2.0).round().max(1.0) as u32
}

fn points_to_twips(points: f32) -> u32 {
    (points * 20.0).round().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Heading, Paragraph, TocEntry};

    #[test]
    fn test_block_mapping() {
        let heading = Block::Heading(Heading::new(2, Paragraph::with_text("x")));
        assert_eq!(StyleId::for_block(&heading), Some(StyleId::Heading2));

        let bullet = Block::BulletItem {
            level: 4,
            content: Paragraph::with_text("• x"),
        };
        assert_eq!(StyleId::for_block(&bullet), Some(StyleId::ListLevel4));

        let toc = Block::TocEntry(TocEntry {
            level: 3,
            title: "x".into(),
            page: "1".into(),
        });
        assert_eq!(StyleId::for_block(&toc), Some(StyleId::TocEntry3));
        assert_eq!(StyleId::for_block(&Block::PageBreak), None);
    }

    #[test]
    fn test_style_sizes() {
        assert_eq!(StyleId::Title.definition(11.0).size_pt, 20.0);
        assert_eq!(StyleId::Heading1.definition(11.0).size_pt, 16.0);
        assert_eq!(StyleId::Body.definition(12.0).size_pt, 12.0);
        assert_eq!(StyleId::ListLevel3.definition(11.0).left_in, 0.75);
        assert_eq!(StyleId::TocEntry2.definition(11.0).tab_right_in, Some(4.5));
    }

    #[test]
    fn test_styles_xml_contains_every_style() {
        let xml = styles_xml(&RenderOptions::default());
        for id in StyleId::ALL {
            assert!(
                xml.contains(&format!(r#"w:styleId="{}""#, id.as_str())),
                "{}",
                id.as_str()
            );
        }
        assert!(xml.contains(r#"w:eastAsia="Malgun Gothic""#));
        assert!(xml.contains(r#"<w:sz w:val="22"/>"#));
    }

    #[test]
    fn test_half_points() {
        assert_eq!(half_points(11.0), 22);
        assert_eq!(half_points(10.5), 21);
    }
}
