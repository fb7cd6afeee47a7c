//! Plain text rendering of the document model.

use crate::model::{Block, Document};

/// Convert a document to plain text.
///
/// Bullet items are indented by nesting level, TOC lines keep their tab
/// before the page number and page breaks become form feeds.
pub fn to_text(doc: &Document) -> String {
    let mut output = String::new();

    for block in &doc.blocks {
        let line = match block {
            Block::BulletItem { level, content } => {
                format!("{}{}", "  ".repeat(level.saturating_sub(1) as usize), content.plain_text())
            }
            Block::PageBreak => "\u{c}".to_string(),
            Block::Spacer => continue,
            other => other.plain_text(),
        };
        if line.is_empty() {
            continue;
        }
        output.push_str(&line);
        output.push('\n');
    }

    output.trim_end().to_string()
}
