//! Boundary-aware message splitting.
//!
//! The channel caps message length, so long summaries go out as an
//! ordered series of parts. Splits prefer a paragraph break, then a
//! line break, then a word break inside the window, and hard-cut only
//! when a single unbroken run exceeds the limit. Nothing is dropped:
//! concatenating the parts reproduces the input exactly.

/// Split `text` into parts of at most `limit` characters each.
///
/// The limit counts characters, not bytes, and a hard cut always lands
/// on a character boundary.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    assert!(limit > 0, "limit must be positive");

    let mut parts = Vec::new();
    let mut rest = text;

    loop {
        if rest.chars().count() <= limit {
            parts.push(rest.to_string());
            break;
        }

        // Byte offset just past the `limit`-th character.
        let window_end = rest
            .char_indices()
            .nth(limit)
            .map(|(offset, _)| offset)
            .unwrap_or(rest.len());
        let window = &rest[..window_end];

        let cut = window
            .rfind("\n\n")
            .map(|at| at + 2)
            .or_else(|| window.rfind('\n').map(|at| at + 1))
            .or_else(|| window.rfind(' ').map(|at| at + 1))
            .filter(|&at| at > 0 && at < window_end)
            .unwrap_or(window_end);

        parts.push(rest[..cut].to_string());
        rest = &rest[cut..];
    }

    parts
}
