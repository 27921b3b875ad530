//! Text sanitization for XMLTV and playlist output

use regex::Regex;
use std::sync::OnceLock;

fn control_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Characters in this range are not legal in XML 1.0 documents
    RE.get_or_init(|| Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F]").unwrap())
}

/// Strip control characters that are illegal in XML text
pub fn strip_control_chars(text: &str) -> String {
    control_chars().replace_all(text, "").into_owned()
}

/// The provider double-escapes quotes in descriptions; turn literal
/// `&quot;` entities back into a quote character before re-escaping.
pub fn unescape_quotes(text: &str) -> String {
    text.replace("&quot;", "\"")
}
