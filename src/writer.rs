//! Fixed-width record writer.
//!
//! [`Writer`] mirrors the read path: each record is encoded as `skip_start`
//! spaces, the fields padded to their column widths on the configured side,
//! `skip_end` spaces, and the configured line ending. A field wider than its
//! column fails with [`ErrorKind::InvalidFieldWidth`] unless `trim_fields`
//! is set, in which case it is truncated.

use std::io::{self, BufWriter, Write};

use crate::Record;
use crate::error::{Error, ErrorKind, Result};
use crate::layout::{Align, Layout, LineEnding};

const SPACES: [u8; 32] = [b' '; 32];

/// Writes fixed-width records to an underlying byte stream.
///
/// The stream is wrapped in a [`BufWriter`]; call [`Writer::flush`] (or
/// [`Writer::write_all`], which flushes on success) before dropping the
/// writer if flush errors matter. `layout` is public and may be changed
/// between records.
///
/// Not safe for concurrent use: the writer owns a mutable line counter.
pub struct Writer<W: Write> {
    /// The column layout applied to each record.
    pub layout: Layout,
    inner: BufWriter<W>,
    line: usize,
}

impl<W: Write> Writer<W> {
    /// A writer over `wtr` with a default (not yet usable) layout. Set
    /// `layout.field_lengths` before the first write.
    pub fn new(wtr: W) -> Self {
        Self::with_layout(Layout::default(), wtr)
    }

    /// A writer over `wtr` using the given layout.
    pub fn with_layout(layout: Layout, wtr: W) -> Self {
        Self {
            layout,
            inner: BufWriter::new(wtr),
            line: 0,
        }
    }

    /// Encode and write one record.
    ///
    /// The record must have exactly one field per column. Field errors carry
    /// the index of the offending column; nothing further is written for the
    /// record after a failure.
    pub fn write<S: AsRef<str>>(&mut self, record: &[S]) -> Result<()> {
        self.line += 1;
        let line = self.line;
        let at = move |column: usize, kind: ErrorKind| Error::new(line, column, kind);

        self.layout.line_width().map_err(|k| at(0, k))?;
        self.write_spaces(self.layout.skip_start)
            .map_err(|e| at(0, e.into()))?;
        if record.len() != self.layout.field_lengths.len() {
            return Err(at(0, ErrorKind::FieldCountMismatch));
        }
        for (i, field) in record.iter().enumerate() {
            let buf = field.as_ref().as_bytes();
            let width = self.layout.field_lengths[i];
            if buf.len() > width {
                if !self.layout.trim_fields {
                    return Err(at(i, ErrorKind::InvalidFieldWidth));
                }
                self.inner
                    .write_all(&buf[..width])
                    .map_err(|e| at(i, e.into()))?;
            } else {
                let pad = width - buf.len();
                if self.layout.align(i) == Align::Right {
                    self.write_spaces(pad).map_err(|e| at(i, e.into()))?;
                }
                self.inner.write_all(buf).map_err(|e| at(i, e.into()))?;
                if self.layout.align(i) == Align::Left {
                    self.write_spaces(pad).map_err(|e| at(i, e.into()))?;
                }
            }
        }
        self.write_spaces(self.layout.skip_end)
            .map_err(|e| at(0, e.into()))?;
        self.write_line_ending().map_err(|e| at(0, e.into()))?;
        Ok(())
    }

    /// Write every record in sequence, stopping at the first failure. On
    /// full success the underlying stream is flushed.
    pub fn write_all(&mut self, records: &[Record]) -> Result<()> {
        for record in records {
            self.write(record.as_slice())?;
        }
        self.flush()
            .map_err(|e| Error::new(self.line, 0, e.into()))?;
        Ok(())
    }

    /// Write a comment line: the marker byte, then `text` truncated or
    /// space-padded to fill the line width, then the line ending.
    ///
    /// A no-op returning success when no comment marker is configured.
    pub fn write_comment(&mut self, text: &str) -> Result<()> {
        let Some(marker) = self.layout.comment else {
            return Ok(());
        };
        self.line += 1;
        let line = self.line;
        let at = move |kind: ErrorKind| Error::new(line, 0, kind);

        let width = self.layout.line_width().map_err(|k| at(k))?;
        self.inner.write_all(&[marker]).map_err(|e| at(e.into()))?;
        // The marker takes one byte of the line.
        let room = width - 1;
        let body = text.as_bytes();
        if body.len() > room {
            self.inner
                .write_all(&body[..room])
                .map_err(|e| at(e.into()))?;
        } else {
            self.inner.write_all(body).map_err(|e| at(e.into()))?;
            self.write_spaces(room - body.len())
                .map_err(|e| at(e.into()))?;
        }
        self.write_line_ending().map_err(|e| at(e.into()))?;
        Ok(())
    }

    /// Flush buffered bytes to the underlying stream. Idempotent.
    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    /// Flush and return the underlying stream.
    pub fn into_inner(self) -> io::Result<W> {
        self.inner.into_inner().map_err(|e| e.into_error())
    }

    fn write_spaces(&mut self, n: usize) -> io::Result<()> {
        let mut left = n;
        while left > 0 {
            let take = left.min(SPACES.len());
            self.inner.write_all(&SPACES[..take])?;
            left -= take;
        }
        Ok(())
    }

    fn write_line_ending(&mut self) -> io::Result<()> {
        let bytes: &[u8] = match self.layout.line_ending {
            LineEnding::None => b"",
            LineEnding::Cr => b"\r",
            LineEnding::Lf => b"\n",
            LineEnding::CrLf => b"\r\n",
        };
        self.inner.write_all(bytes)
    }
}
