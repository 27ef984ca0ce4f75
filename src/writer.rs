use crate::error::{Result, XrefError};
use serde::Deserialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const HEADER: [&str; 2] = ["Product Number", "Description"];

const UTF16LE_BOM: [u8; 2] = [0xFF, 0xFE];

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputEncoding {
    /// UTF-16 little-endian with a byte order mark.
    #[default]
    Utf16,
    Utf8,
}

/// Re-encodes the UTF-8 produced by the CSV writer. A multi-byte sequence
/// split across two writes is held back until it is complete.
struct Transcoder<W> {
    inner: W,
    encoding: OutputEncoding,
    pending: Vec<u8>,
}

impl<W: Write> Transcoder<W> {
    fn new(mut inner: W, encoding: OutputEncoding) -> io::Result<Self> {
        if encoding == OutputEncoding::Utf16 {
            inner.write_all(&UTF16LE_BOM)?;
        }
        Ok(Self {
            inner,
            encoding,
            pending: Vec::new(),
        })
    }

    fn write_utf16(&mut self) -> io::Result<()> {
        let valid = match std::str::from_utf8(&self.pending) {
            Ok(s) => s.len(),
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            Err(e) => return Err(io::Error::new(io::ErrorKind::InvalidData, e)),
        };
        let text = std::str::from_utf8(&self.pending[..valid])
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let encoded: Vec<u8> = text.encode_utf16().flat_map(u16::to_le_bytes).collect();
        self.inner.write_all(&encoded)?;
        self.pending.drain(..valid);
        Ok(())
    }

    fn into_inner(self) -> io::Result<W> {
        if !self.pending.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "incomplete UTF-8 sequence at end of output",
            ));
        }
        Ok(self.inner)
    }
}

impl<W: Write> Write for Transcoder<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.encoding {
            OutputEncoding::Utf8 => self.inner.write_all(buf)?,
            OutputEncoding::Utf16 => {
                self.pending.extend_from_slice(buf);
                self.write_utf16()?;
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Streams `(product number, description)` rows as CSV under a fixed header.
pub struct ResultWriter<W: Write> {
    csv: csv::Writer<Transcoder<W>>,
    rows: usize,
}

impl<W: Write> ResultWriter<W> {
    pub fn new(sink: W, encoding: OutputEncoding) -> io::Result<Self> {
        let mut csv = csv::WriterBuilder::new()
            .terminator(csv::Terminator::CRLF)
            .from_writer(Transcoder::new(sink, encoding)?);
        csv.write_record(HEADER)?;
        Ok(Self { csv, rows: 0 })
    }

    pub fn write_row(&mut self, key: &str, description: &str) -> io::Result<()> {
        self.csv.write_record([key, description])?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flushes everything and hands back the sink.
    pub fn finish(self) -> io::Result<W> {
        let transcoder = self
            .csv
            .into_inner()
            .map_err(|e| io::Error::new(e.error().kind(), e.error().to_string()))?;
        let mut inner = transcoder.into_inner()?;
        inner.flush()?;
        Ok(inner)
    }
}

/// Output that only appears under its final name once [`commit`](Self::commit)
/// succeeds. Dropping it removes the temporary file.
pub struct PendingOutput {
    path: PathBuf,
    temp: NamedTempFile,
}

impl PendingOutput {
    pub fn create(path: &Path) -> Result<Self> {
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let temp = NamedTempFile::new_in(dir).map_err(|source| XrefError::OutputWrite {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            temp,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file(&self) -> &File {
        self.temp.as_file()
    }

    pub fn commit(self) -> Result<()> {
        let path = self.path;
        self.temp
            .persist(&path)
            .map_err(|e| XrefError::OutputWrite {
                path: path.clone(),
                source: e.error,
            })?;
        Ok(())
    }
}
