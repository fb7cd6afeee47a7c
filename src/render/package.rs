//! Fixed OOXML package parts: content types, relationships and properties.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use chrono::SecondsFormat;

use super::xml::escape;
use crate::model::Metadata;

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const RELS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const OFFICE_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Relationship ID of `styles.xml` in `document.xml.rels`.
pub const STYLES_REL_ID: &str = "rId1";
/// Relationship ID of `settings.xml` in `document.xml.rels`.
pub const SETTINGS_REL_ID: &str = "rId2";

/// An embedded media file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPart {
    /// Relationship ID used by `r:embed`
    pub rel_id: String,
    /// File name under `word/media/`
    pub file_name: String,
    /// MIME type
    pub mime_type: String,
}

impl MediaPart {
    /// Package path of the media file.
    pub fn part_name(&self) -> String {
        format!("word/media/{}", self.file_name)
    }

    fn extension(&self) -> &str {
        self.file_name.rsplit('.').next().unwrap_or("bin")
    }
}

/// `[Content_Types].xml`
pub fn content_types_xml(media: &[MediaPart]) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);

    let extensions: BTreeSet<(&str, &str)> = media
        .iter()
        .map(|m| (m.extension(), m.mime_type.as_str()))
        .collect();
    for (ext, mime) in extensions {
        let _ = write!(xml, r#"<Default Extension="{}" ContentType="{}"/>"#, ext, mime);
    }

    for (part, content_type) in [
        (
            "/word/document.xml",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
        ),
        (
            "/word/styles.xml",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml",
        ),
        (
            "/word/settings.xml",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.settings+xml",
        ),
        (
            "/docProps/core.xml",
            "application/vnd.openxmlformats-package.core-properties+xml",
        ),
        (
            "/docProps/app.xml",
            "application/vnd.openxmlformats-officedocument.extended-properties+xml",
        ),
    ] {
        let _ = write!(xml, r#"<Override PartName="{}" ContentType="{}"/>"#, part, content_type);
    }

    xml.push_str("</Types>");
    xml
}

/// `_rels/.rels`
pub fn root_rels_xml() -> String {
    let mut xml = String::from(XML_DECL);
    let _ = write!(xml, r#"<Relationships xmlns="{}">"#, RELS_NS);
    let _ = write!(
        xml,
        r#"<Relationship Id="rId1" Type="{}/officeDocument" Target="word/document.xml"/>"#,
        OFFICE_REL
    );
    xml.push_str(r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>"#);
    let _ = write!(
        xml,
        r#"<Relationship Id="rId3" Type="{}/extended-properties" Target="docProps/app.xml"/>"#,
        OFFICE_REL
    );
    xml.push_str("</Relationships>");
    xml
}

/// `word/_rels/document.xml.rels`
pub fn document_rels_xml(media: &[MediaPart]) -> String {
    let mut xml = String::from(XML_DECL);
    let _ = write!(xml, r#"<Relationships xmlns="{}">"#, RELS_NS);
    let _ = write!(
        xml,
        r#"<Relationship Id="{}" Type="{}/styles" Target="styles.xml"/>"#,
        STYLES_REL_ID, OFFICE_REL
    );
    let _ = write!(
        xml,
        r#"<Relationship Id="{}" Type="{}/settings" Target="settings.xml"/>"#,
        SETTINGS_REL_ID, OFFICE_REL
    );
    for m in media {
        let _ = write!(
            xml,
            r#"<Relationship Id="{}" Type="{}/image" Target="media/{}"/>"#,
            m.rel_id,
            OFFICE_REL,
            escape(&m.file_name)
        );
    }
    xml.push_str("</Relationships>");
    xml
}

/// `docProps/core.xml`
pub fn core_xml(metadata: &Metadata, author: Option<&str>) -> String {
    let created = metadata.created.to_rfc3339_opts(SecondsFormat::Secs, true);
    let mut xml = String::from(XML_DECL);
    xml.push_str(concat!(
        r#"<cp:coreProperties"#,
        r#" xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties""#,
        r#" xmlns:dc="http://purl.org/dc/elements/1.1/""#,
        r#" xmlns:dcterms="http://purl.org/dc/terms/""#,
        r#" xmlns:dcmitype="http://purl.org/dc/dcmitype/""#,
        r#" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#
    ));
    if let Some(ref title) = metadata.title {
        let _ = write!(xml, "<dc:title>{}</dc:title>", escape(title));
    }
    if let Some(author) = author.or(metadata.author.as_deref()) {
        let _ = write!(xml, "<dc:creator>{}</dc:creator>", escape(author));
    }
    let _ = write!(
        xml,
        r#"<dcterms:created xsi:type="dcterms:W3CDTF">{0}</dcterms:created><dcterms:modified xsi:type="dcterms:W3CDTF">{0}</dcterms:modified>"#,
        created
    );
    xml.push_str("</cp:coreProperties>");
    xml
}

/// `docProps/app.xml`
pub fn app_xml() -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#);
    xml.push_str("<Application>mdocx</Application><DocSecurity>0</DocSecurity>");
    xml.push_str("</Properties>");
    xml
}

/// `word/settings.xml`
pub fn settings_xml() -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(r#"<w:settings xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#);
    xml.push_str(r#"<w:defaultTabStop w:val="720"/><w:characterSpacingControl w:val="doNotCompress"/>"#);
    xml.push_str(r#"<w:compat><w:compatSetting w:name="compatibilityMode" w:uri="http://schemas.microsoft.com/office/word" w:val="15"/></w:compat>"#);
    xml.push_str("</w:settings>");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;

    fn media() -> Vec<MediaPart> {
        vec![
            MediaPart {
                rel_id: "rId3".into(),
                file_name: "image1.png".into(),
                mime_type: "image/png".into(),
            },
            MediaPart {
                rel_id: "rId4".into(),
                file_name: "image2.png".into(),
                mime_type: "image/png".into(),
            },
        ]
    }

    #[test]
    fn test_content_types_dedup_extensions() {
        let xml = content_types_xml(&media());
        assert_eq!(xml.matches(r#"Extension="png""#).count(), 1);
        assert!(xml.contains("/word/document.xml"));
    }

    #[test]
    fn test_document_rels() {
        let xml = document_rels_xml(&media());
        assert!(xml.contains(r#"Id="rId1""#));
        assert!(xml.contains(r#"Target="media/image2.png""#));
    }

    #[test]
    fn test_core_xml_escapes_title() {
        let metadata = Metadata {
            title: Some("R&D 계획".into()),
            ..Metadata::default()
        };
        let xml = core_xml(&metadata, Some("홍길동"));
        assert!(xml.contains("<dc:title>R&amp;D 계획</dc:title>"));
        assert!(xml.contains("<dc:creator>홍길동</dc:creator>"));
    }
}
