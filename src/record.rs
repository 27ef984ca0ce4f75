//! Field extraction for fixed-width IMP lines.
//!
//! The export is ISO-8859-1: every byte decodes to the code point with the
//! same value, so character offsets and byte offsets coincide.

use crate::keys::canonical_key;
use crate::normalize::trim_legacy;
use std::ops::Range;

/// Language code column.
pub const LANGUAGE_FIELD: Range<usize> = 1..4;
/// Product number column.
pub const PRODUCT_KEY_FIELD: Range<usize> = 5..22;
/// Description column.
pub const DESCRIPTION_FIELD: Range<usize> = 22..3745;

/// Only records in this language are exported.
pub const LANGUAGE_FILTER: &str = "1";

pub fn decode_legacy(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Characters `range` of `line`, clamped to the line length.
fn char_slice(line: &str, range: Range<usize>) -> &str {
    let byte_at = |n: usize| {
        line.char_indices()
            .nth(n)
            .map_or(line.len(), |(offset, _)| offset)
    };
    let start = byte_at(range.start);
    let end = byte_at(range.end).max(start);
    &line[start..end]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyRecord {
    pub language: String,
    pub product_key: String,
    pub description: String,
}

impl LegacyRecord {
    /// Never fails. Fields past the end of a short line come back empty.
    pub fn extract(line: &str) -> Self {
        let language = canonical_key(trim_legacy(char_slice(line, LANGUAGE_FIELD)));
        let product_key = canonical_key(trim_legacy(char_slice(line, PRODUCT_KEY_FIELD)));
        let description = trim_legacy(char_slice(line, DESCRIPTION_FIELD));
        LegacyRecord {
            language: language.to_string(),
            product_key: product_key.to_string(),
            description: description.to_string(),
        }
    }

    pub fn in_export_language(&self) -> bool {
        self.language == LANGUAGE_FILTER
    }
}

#[cfg(test)]
pub(crate) fn build_line(language: &str, key: &str, description: &str) -> String {
    format!(" {:<3} {:<17}{}", language, key, description)
}
