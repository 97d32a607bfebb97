//! Markup sanitizer.
//!
//! Models occasionally return block-level HTML the channel rejects.
//! Block tags are converted to plain-text equivalents and headers are
//! downgraded to bold, which the channel does accept. The function is
//! idempotent: text without the handled tags passes through unchanged.

pub fn sanitize_html(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut out = text
        .replace("<p>", "")
        .replace("</p>", "\n\n")
        .replace("<br>", "\n")
        .replace("<br/>", "\n")
        .replace("<br />", "\n")
        .replace("<ul>", "")
        .replace("</ul>", "\n")
        .replace("<ol>", "")
        .replace("</ol>", "\n")
        .replace("<li>", "• ")
        .replace("</li>", "\n")
        .replace("<div>", "")
        .replace("</div>", "");

    for level in 1..=6 {
        out = out
            .replace(&format!("<h{level}>"), "<b>")
            .replace(&format!("</h{level}>"), "</b>\n");
    }

    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_tags_become_plain_text() {
        let input = "<p>Intro</p><ul><li>first</li><li>second</li></ul>";
        assert_eq!(sanitize_html(input), "Intro\n\n• first\n• second");
    }

    #[test]
    fn headers_downgrade_to_bold() {
        assert_eq!(sanitize_html("<h2>Title</h2>body"), "<b>Title</b>\nbody");
        assert_eq!(sanitize_html("<h6>Small</h6>"), "<b>Small</b>");
    }

    #[test]
    fn allowed_inline_markup_passes_through() {
        let input = "keep <b>bold</b> and <i>italic</i>";
        assert_eq!(sanitize_html(input), input);
    }

    #[test]
    fn sanitizing_twice_changes_nothing() {
        let once = sanitize_html("<h1>A</h1><p>b<br>c</p>");
        assert_eq!(sanitize_html(&once), once);
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert_eq!(sanitize_html(""), "");
    }
}
