//! Text-level helpers shared by the syntax tree and the object model:
//! whitespace classification, markup escaping, attribute value
//! normalization and attribute name validation.

/// Check whether a string consists entirely of whitespace.
///
/// The empty string counts as whitespace; gap scanning relies on that.
pub fn is_whitespace(text: &str) -> bool {
    text.chars().all(char::is_whitespace)
}

/// Case-insensitive attribute name comparison.
///
/// Attribute names are ASCII identifiers; non-ASCII code points compare
/// verbatim.
pub fn names_equal(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Escape text for embedding in a markup rendering.
///
/// Used by the generic serializer for both text content and attribute
/// values, so the quote characters are always escaped.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// CDATA attribute value normalization: every whitespace character becomes
/// a plain space.
pub fn normalize_cdata(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .collect()
}

/// NON_CDATA attribute value normalization: CDATA normalization plus
/// collapsing runs of spaces and trimming both ends.
pub fn normalize_non_cdata(value: &str) -> String {
    let cdata = normalize_cdata(value);
    cdata.split(' ').filter(|s| !s.is_empty()).collect::<Vec<_>>().join(" ")
}

/// Check a string against the markup identifier grammar for attribute and
/// element names.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if is_name_start(c) => chars.all(is_name_char),
        _ => false,
    }
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == ':'
}

fn is_name_char(c: char) -> bool {
    is_name_start(c) || c.is_numeric() || c == '-' || c == '.'
}
