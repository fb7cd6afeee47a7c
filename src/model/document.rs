//! Document-level types.

use super::{Block, FootnoteRegistry, Resource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A converted document, ready to be written out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Document metadata (title, source, etc.)
    pub metadata: Metadata,

    /// Content blocks in output order
    pub blocks: Vec<Block>,

    /// Embedded images keyed by resource ID
    pub resources: BTreeMap<String, Resource>,

    /// Footnote definitions gathered during the scan
    pub footnotes: FootnoteRegistry,

    /// Problems recovered from during conversion
    pub warnings: Vec<Warning>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            metadata: Metadata::default(),
            blocks: Vec::new(),
            resources: BTreeMap::new(),
            footnotes: FootnoteRegistry::new(),
            warnings: Vec::new(),
        }
    }

    /// Append a block.
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Add a resource to the document.
    pub fn add_resource(&mut self, id: String, resource: Resource) {
        self.resources.insert(id, resource);
    }

    /// Get a resource by ID.
    pub fn get_resource(&self, id: &str) -> Option<&Resource> {
        self.resources.get(id)
    }

    /// Record a recovered problem.
    pub fn warn(&mut self, warning: Warning) {
        log::warn!("{}", warning);
        self.warnings.push(warning);
    }

    /// Check if the document has any blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Get the document title, if one was found.
    pub fn title(&self) -> Option<&str> {
        self.metadata.title.as_deref()
    }

    /// Iterate blocks of a given kind (see [`Block::kind`]).
    pub fn blocks_of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Block> {
        self.blocks.iter().filter(move |b| b.kind() == kind)
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|block| block.plain_text())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Document metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Document author
    pub author: Option<String>,

    /// Source Markdown file, if converted from a file
    pub source: Option<String>,

    /// Conversion timestamp
    pub created: DateTime<Utc>,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            title: None,
            author: None,
            source: None,
            created: Utc::now(),
        }
    }
}

/// A problem that was recovered from without aborting the conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Warning {
    /// An image file does not exist; a placeholder was inserted.
    MissingImage {
        /// Path as written in the source
        path: String,
        /// 1-indexed source line
        line: usize,
    },

    /// An image file exists but could not be read or decoded.
    ImageUnreadable {
        /// Path as written in the source
        path: String,
        /// 1-indexed source line
        line: usize,
        /// Underlying error
        reason: String,
    },

    /// A table without any recognizable column was skipped.
    EmptyTable {
        /// 1-indexed source line of the first table row
        line: usize,
    },
}

impl Warning {
    /// Source line the warning refers to.
    pub fn line(&self) -> usize {
        match self {
            Warning::MissingImage { line, .. }
            | Warning::ImageUnreadable { line, .. }
            | Warning::EmptyTable { line } => *line,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::MissingImage { path, line } => {
                write!(f, "line {}: image not found: {}", line, path)
            }
            Warning::ImageUnreadable { path, line, reason } => {
                write!(f, "line {}: image unreadable: {} ({})", line, path, reason)
            }
            Warning::EmptyTable { line } => {
                write!(f, "line {}: table has no columns, skipped", line)
            }
        }
    }
}
