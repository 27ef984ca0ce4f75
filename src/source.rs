use crate::record::decode_legacy;
use std::collections::VecDeque;
use std::io::{self, BufRead};

/// Decoded lines of a legacy source. Accepts `\n`, `\r\n` and lone `\r` as
/// terminators; terminators are not part of the yielded line.
pub struct LegacyLines<R> {
    reader: R,
    buf: Vec<u8>,
    pending: VecDeque<String>,
    done: bool,
}

impl<R: BufRead> LegacyLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            pending: VecDeque::new(),
            done: false,
        }
    }

    fn fill(&mut self) -> io::Result<()> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            self.done = true;
            return Ok(());
        }
        let mut chunk = self.buf.as_slice();
        if let Some(rest) = chunk.strip_suffix(b"\n") {
            chunk = rest;
        }
        if let Some(rest) = chunk.strip_suffix(b"\r") {
            chunk = rest;
        }
        self.pending
            .extend(chunk.split(|&b| b == b'\r').map(decode_legacy));
        Ok(())
    }
}

impl<R: BufRead> Iterator for LegacyLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pending.is_empty() && !self.done {
            if let Err(e) = self.fill() {
                self.done = true;
                return Some(Err(e));
            }
        }
        self.pending.pop_front().map(Ok)
    }
}
