//! Shell escaping and quoting utilities.

/// Sequence that closes a single-quoted string, emits a double-quoted `'`,
/// and reopens the single quote.
const QUOTE_ESCAPE: &str = r#"'"'"'"#;

/// Escape a value for use inside single quotes.
/// Replaces `'` with `'"'"'`; nothing else is special inside single quotes.
pub fn escape_single_quote_content(value: &str) -> String {
    value.replace('\'', QUOTE_ESCAPE)
}

/// Wrap a value in single quotes (always quotes, empty becomes `''`).
pub fn quote_value(value: &str) -> String {
    format!("'{}'", escape_single_quote_content(value))
}

/// Make text safe to place after `#` on a single comment line.
/// Control characters (newlines included) are written as escapes.
pub fn escape_comment(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_control() {
            out.extend(c.escape_default());
        } else {
            out.push(c);
        }
    }
    out
}
