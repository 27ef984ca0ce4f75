use crate::error::{Result, Stage, XrefError};
use indexmap::IndexSet;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, warn};

const UTF8_BOM: &str = "\u{FEFF}";

/// Strips leading `'0'` characters. Nothing else is touched.
pub fn canonical_key(raw: &str) -> &str {
    raw.trim_start_matches('0')
}

/// Deduplicated product keys in canonical form, kept in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeySet {
    keys: IndexSet<String>,
}

impl KeySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the canonical form of `raw`. Keys that are empty after
    /// canonicalization are refused.
    pub fn insert(&mut self, raw: &str) -> bool {
        let key = canonical_key(raw);
        if key.is_empty() {
            return false;
        }
        self.keys.insert(key.to_string())
    }

    /// `key` must already be canonical.
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}

impl<'a> FromIterator<&'a str> for KeySet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = KeySet::new();
        for raw in iter {
            set.insert(raw);
        }
        set
    }
}

/// Reads column 0 of every row of a UTF-8 delimited source.
///
/// Rows whose first field is not UTF-8, or whose key is empty once leading
/// zeros are gone, are skipped with a warning. Only I/O failures abort.
pub fn read_keys<R: Read>(reader: R, skip_header: bool) -> io::Result<KeySet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut keys = KeySet::new();
    for (i, row) in rdr.byte_records().enumerate() {
        let row_no = i + 1;
        if i == 0 && skip_header {
            debug!(row = row_no, "skipping key header row");
            continue;
        }
        let record = match row {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                warn!(row = row_no, error = %e, "skipping unreadable key row");
                continue;
            }
        };
        let Some(field) = record.get(0) else {
            warn!(row = row_no, "skipping key row without columns");
            continue;
        };
        let Ok(field) = std::str::from_utf8(field) else {
            warn!(row = row_no, "skipping key row that is not valid UTF-8");
            continue;
        };
        let field = if i == 0 {
            field.strip_prefix(UTF8_BOM).unwrap_or(field)
        } else {
            field
        };
        if !keys.insert(field) && canonical_key(field).is_empty() {
            warn!(row = row_no, value = field, "skipping key row with empty product number");
        }
    }
    Ok(keys)
}

pub fn load_keys(path: &Path, skip_header: bool) -> Result<KeySet> {
    let file = File::open(path).map_err(|source| XrefError::SourceUnavailable {
        stage: Stage::KeyLoading,
        path: path.to_path_buf(),
        source,
    })?;
    let keys = read_keys(file, skip_header).map_err(|source| XrefError::SourceRead {
        stage: Stage::KeyLoading,
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), count = keys.len(), "loaded product keys");
    Ok(keys)
}
