//! Rendering module for writing documents to DOCX and inspection formats.

mod docx;
mod json;
mod options;
mod package;
mod result;
mod styles;
mod text;
mod xml;

pub use docx::{to_docx, write_docx, DocxWriter, EMU_PER_INCH};
pub use json::{to_json, JsonFormat};
pub use options::{inches_to_twips, Margins, PageSize, RenderOptions, DEFAULT_FONT};
pub use package::MediaPart;
pub use result::{ConversionResult, ConversionStats};
pub use styles::{styles_xml, StyleDef, StyleId};
pub use text::to_text;
pub use xml::escape;
