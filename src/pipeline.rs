use crate::error::{Result, Stage, XrefError};
use crate::keys::KeySet;
use crate::normalize::normalize_description;
use crate::record::{LegacyRecord, DESCRIPTION_FIELD};
use crate::source::LegacyLines;
use crate::writer::ResultWriter;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    pub key: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub lines_read: usize,
    pub matched: usize,
    /// Lines that end before the description column starts.
    pub short_lines: usize,
}

/// Match predicate: export language and a known product number.
pub fn match_record(record: LegacyRecord, keys: &KeySet) -> Option<OutputRow> {
    if !record.in_export_language() || !keys.contains(&record.product_key) {
        return None;
    }
    Some(OutputRow {
        key: record.product_key,
        description: normalize_description(&record.description),
    })
}

/// Runs one legacy source against a key set into a result sink.
pub struct MatchFilterPipeline<'k, R, W: Write> {
    keys: &'k KeySet,
    lines: LegacyLines<R>,
    sink: ResultWriter<W>,
    source_path: PathBuf,
    output_path: PathBuf,
}

impl<'k, R: BufRead, W: Write> MatchFilterPipeline<'k, R, W> {
    pub fn new(keys: &'k KeySet, source: R, sink: ResultWriter<W>) -> Self {
        Self {
            keys,
            lines: LegacyLines::new(source),
            sink,
            source_path: PathBuf::from("-"),
            output_path: PathBuf::from("-"),
        }
    }

    /// Paths reported in errors.
    pub fn with_paths(mut self, source: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        self.source_path = source.into();
        self.output_path = output.into();
        self
    }

    pub fn run(mut self) -> Result<(RunSummary, W)> {
        let mut summary = RunSummary::default();

        for line in self.lines.by_ref() {
            let line = line.map_err(|source| XrefError::SourceRead {
                stage: Stage::DataProcessing,
                path: self.source_path.clone(),
                source,
            })?;
            summary.lines_read += 1;
            if line.chars().count() < DESCRIPTION_FIELD.start {
                summary.short_lines += 1;
                debug!(line = summary.lines_read, "short legacy line");
            }

            let Some(row) = match_record(LegacyRecord::extract(&line), self.keys) else {
                continue;
            };
            self.sink
                .write_row(&row.key, &row.description)
                .map_err(|source| XrefError::OutputWrite {
                    path: self.output_path.clone(),
                    source,
                })?;
            summary.matched += 1;
        }

        let sink = self.sink.finish().map_err(|source| XrefError::OutputWrite {
            path: self.output_path.clone(),
            source,
        })?;
        info!(
            lines = summary.lines_read,
            matched = summary.matched,
            short = summary.short_lines,
            "processed legacy source"
        );
        Ok((summary, sink))
    }
}
