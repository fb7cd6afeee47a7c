//! Source detection and decoding.

use crate::error::{Error, Result};
use std::path::Path;
use unicode_normalization::{is_nfc_quick, IsNormalized, UnicodeNormalization};

/// UTF-8 byte order mark.
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// File extensions accepted as Markdown input.
const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown", "mdown", "txt"];

/// Read and decode a Markdown source file.
///
/// # Returns
/// * `Err(Error::InputNotFound)` if the path does not exist
/// * `Err(Error::Encoding)` if the file is not UTF-8
///
/// # Example
/// ```no_run
/// use mdocx::detect::read_source;
///
/// let text = read_source("plan.md").unwrap();
/// println!("{} lines", text.lines().count());
/// ```
pub fn read_source<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::InputNotFound(path.to_path_buf()));
    }
    let data = std::fs::read(path)?;
    decode_source(&data)
}

/// Decode raw bytes into normalized source text.
///
/// Strips a UTF-8 BOM, converts CRLF and lone CR line endings to LF and
/// composes the text to Unicode NFC so decomposed Hangul jamo compare equal
/// to precomposed syllables.
pub fn decode_source(data: &[u8]) -> Result<String> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    let text = std::str::from_utf8(data).map_err(|e| {
        Error::Encoding(format!(
            "input is not valid UTF-8 (invalid byte at offset {})",
            e.valid_up_to()
        ))
    })?;

    let text = if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text.to_string()
    };

    if is_nfc_quick(text.chars()) == IsNormalized::Yes {
        Ok(text)
    } else {
        Ok(text.nfc().collect())
    }
}

/// Check whether a path looks like Markdown input by extension.
pub fn is_markdown_path<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            MARKDOWN_EXTENSIONS.iter().any(|m| *m == ext)
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_strips_bom() {
        let mut data = UTF8_BOM.to_vec();
        data.extend_from_slice("# 제목".as_bytes());
        assert_eq!(decode_source(&data).unwrap(), "# 제목");
    }

    #[test]
    fn test_decode_normalizes_line_endings() {
        let text = decode_source(b"a\r\nb\rc\n").unwrap();
        assert_eq!(text, "a\nb\nc\n");
    }

    #[test]
    fn test_decode_composes_hangul() {
        // "한" as decomposed jamo
        let decomposed = "\u{1112}\u{1161}\u{11AB}";
        let text = decode_source(decomposed.as_bytes()).unwrap();
        assert_eq!(text, "한");
    }

    #[test]
    fn test_decode_invalid_utf8() {
        let result = decode_source(&[0x23, 0x20, 0xFF, 0xFE]);
        assert!(matches!(result, Err(Error::Encoding(_))));
    }

    #[test]
    fn test_read_source_missing() {
        let result = read_source("definitely/not/here.md");
        assert!(matches!(result, Err(Error::InputNotFound(_))));
    }

    #[test]
    fn test_is_markdown_path() {
        assert!(is_markdown_path("plan.md"));
        assert!(is_markdown_path("PLAN.MD"));
        assert!(!is_markdown_path("plan.docx"));
        assert!(!is_markdown_path("README"));
    }
}
