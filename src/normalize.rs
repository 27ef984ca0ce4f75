use regex::Regex;
use std::sync::LazyLock;

/// Marker that replaces long whitespace runs in descriptions.
pub const LINE_BREAK_MARKER: &str = "<br>";

// Unicode White_Space plus the information separators U+001C..U+001F.
static RE_LONG_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\x{1C}-\x{1F}]{3,}").unwrap());

/// Diacritics that the legacy export stores as DOS code page bytes. After a
/// Latin-1 decode they show up as the code point of the same value.
const BYTE_REPAIRS: [(char, char); 4] = [
    ('\u{81}', 'ü'),
    ('\u{84}', 'ä'),
    ('\u{94}', 'ö'),
    ('\u{E1}', 'ß'),
];

pub fn is_legacy_whitespace(c: char) -> bool {
    c.is_whitespace() || ('\u{1C}'..='\u{1F}').contains(&c)
}

pub fn trim_legacy(text: &str) -> &str {
    text.trim_matches(is_legacy_whitespace)
}

fn repair_char(c: char) -> char {
    BYTE_REPAIRS
        .iter()
        .find(|(from, _)| *from == c)
        .map_or(c, |(_, to)| *to)
}

pub fn repair_bytes(text: &str) -> String {
    text.chars().map(repair_char).collect()
}

/// Replaces every run of three or more whitespace characters with
/// [`LINE_BREAK_MARKER`]. Shorter runs and the string ends are left alone.
pub fn collapse_whitespace(text: &str) -> String {
    RE_LONG_WHITESPACE
        .replace_all(text, LINE_BREAK_MARKER)
        .into_owned()
}

/// Byte-repair first, then whitespace collapsing.
pub fn normalize_description(text: &str) -> String {
    collapse_whitespace(&repair_bytes(text))
}
