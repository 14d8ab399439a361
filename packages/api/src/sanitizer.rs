//! HTML sanitization for note content.
//!
//! Notes keep a small formatting subset. Any other tag is stripped while its
//! text survives; `script` and `style` are dropped together with their
//! content, and no attribute is kept on any tag.

use std::collections::HashSet;

/// Tags allowed in note titles and bodies.
pub const ALLOWED_TAGS: &[&str] = &[
    "b", "strong", "i", "em", "u", "p", "br", "ul", "ol", "li",
];

const DROPPED_WITH_CONTENT: &[&str] = &["script", "style"];

/// Reduce user-supplied HTML to the allowed subset.
pub fn sanitize_note_text(raw: &str) -> String {
    ammonia::Builder::empty()
        .tags(ALLOWED_TAGS.iter().copied().collect::<HashSet<_>>())
        .clean_content_tags(DROPPED_WITH_CONTENT.iter().copied().collect::<HashSet<_>>())
        .clean(raw)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_basic_formatting() {
        let html = "<p><b>bold</b> <em>em</em></p><ul><li>one</li></ul>";
        assert_eq!(sanitize_note_text(html), html);
    }

    #[test]
    fn test_strips_script_with_content() {
        assert_eq!(
            sanitize_note_text("<script>alert(1)</script><b>hi</b>"),
            "<b>hi</b>"
        );
    }

    #[test]
    fn test_strips_unknown_tags_keeping_text() {
        assert_eq!(
            sanitize_note_text(r#"<a href="https://example.com">link</a>"#),
            "link"
        );
        assert_eq!(sanitize_note_text("<div>plain</div>"), "plain");
    }

    #[test]
    fn test_strips_attributes() {
        assert_eq!(
            sanitize_note_text(r#"<p onclick="steal()" style="color:red">text</p>"#),
            "<p>text</p>"
        );
    }

    #[test]
    fn test_escapes_bare_text() {
        assert_eq!(sanitize_note_text("1 < 2 & 3"), "1 &lt; 2 &amp; 3");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(sanitize_note_text(""), "");
    }
}
