//! XML text helpers.

use std::borrow::Cow;

/// Escape text for use in XML content or attribute values.
///
/// Characters that XML 1.0 cannot represent (most C0 controls) are
/// dropped.
pub fn escape(text: &str) -> Cow<'_, str> {
    if text.chars().any(is_forbidden) {
        let cleaned: String = text.chars().filter(|c| !is_forbidden(*c)).collect();
        Cow::Owned(quick_xml::escape::escape(cleaned.as_str()).into_owned())
    } else {
        quick_xml::escape::escape(text)
    }
}

fn is_forbidden(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_markup() {
        assert_eq!(escape("R&D <핵심>"), "R&amp;D &lt;핵심&gt;");
        assert_eq!(escape(r#"say "hi""#), "say &quot;hi&quot;");
    }

    #[test]
    fn test_escape_drops_control_chars() {
        assert_eq!(escape("a\u{1}b\tc"), "ab\tc");
    }

    #[test]
    fn test_escape_borrows_plain_text() {
        assert!(matches!(escape("사업계획"), Cow::Borrowed(_)));
    }
}
