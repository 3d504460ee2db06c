//! Whitespace canonicalisation applied before any pattern runs.

/// Non-breaking, narrow no-break, and thin spaces.
const SPACE_VARIANTS: [char; 3] = ['\u{00A0}', '\u{202F}', '\u{2009}'];

/// Collapse whitespace runs (including the space variants above) to a single
/// ASCII space and trim both ends.
///
/// Idempotent: `clean_text(&clean_text(s)) == clean_text(s)`.
pub fn clean_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for ch in text.chars() {
        if ch.is_whitespace() || SPACE_VARIANTS.contains(&ch) {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(ch);
    }

    out
}

/// Clean optional text; a missing paragraph is empty text, not an error.
pub fn clean_opt(text: Option<&str>) -> String {
    text.map(clean_text).unwrap_or_default()
}
