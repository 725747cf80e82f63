//! Small text helpers shared by help rendering and error messages.

/// Pad `text` on the right with spaces up to `width` columns.
///
/// Used to line up the description column in `OPTIONS:` and
/// `COMMANDS:` blocks.
pub(crate) fn left_pad(text: &str, width: usize) -> String {
    let mut out = String::with_capacity(width.max(text.len()));
    out.push_str(text);
    while out.len() < width {
        out.push(' ');
    }
    out
}

/// Wrap a raw argument in single quotes, escaping embedded quotes.
pub(crate) fn quoted(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', "\\'"))
}

/// Quote every item and join with `", "`.
pub(crate) fn quoted_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| quoted(item))
        .collect::<Vec<_>>()
        .join(", ")
}
