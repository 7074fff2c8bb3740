//! Display-text helpers for toasts and participant labels

/// Longest participant name shown in a toast before truncation
pub const NAME_DISPLAY_LEN: usize = 15;

/// Longest toast text before it is trimmed
pub const SNACKBAR_DISPLAY_LEN: usize = 52;

const ELLIPSIS: &str = "...";

/// Truncate a display name to at most `max_len` characters.
///
/// Longer names keep `max_len - 3` characters followed by `...`, so the
/// result never exceeds `max_len`. Counts `char`s, not bytes.
pub fn truncate_name(name: &str, max_len: usize) -> String {
    truncate_with_ellipsis(name, max_len)
}

/// Trim a composed toast text to the fixed snackbar length
pub fn trim_snackbar_text(text: &str) -> String {
    truncate_with_ellipsis(text, SNACKBAR_DISPLAY_LEN)
}

fn truncate_with_ellipsis(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let keep = max_len.saturating_sub(ELLIPSIS.len());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}
