//! Fixed-width record reader.
//!
//! [`Reader`] decodes a line-structured byte stream into records (ordered
//! field strings) according to a [`Layout`]. Per logical line it:
//!
//! 1. discards `skip_lines` raw lines (first record operation only),
//! 2. validates the layout and derives the expected line width,
//! 3. reads one raw line per the line-ending mode,
//! 4. skips comment-marked lines,
//! 5. checks the raw line is exactly the derived width with no embedded
//!    CR/LF bytes,
//! 6. slices the line into fields, trimming each if configured.
//!
//! Errors carry the 1-based logical line number at which they occurred.

use std::io::{self, BufRead, BufReader, Read};

use crate::Record;
use crate::error::{Error, ErrorKind, Result};
use crate::layout::{Layout, LineEnding};

/// Reads fixed-width records from an underlying byte stream.
///
/// The stream is wrapped in a [`BufReader`]; the reader itself performs no
/// other I/O. `layout` is public and may be changed between calls when the
/// input mixes line layouts - the derived width is recomputed per record.
///
/// Not safe for concurrent use: the reader owns a mutable line counter and
/// the skip-lines latch.
pub struct Reader<R> {
    /// The column layout applied to each line.
    pub layout: Layout,
    inner: BufReader<R>,
    /// Raw lines fully consumed so far; errors about the line being read
    /// report `line + 1`.
    line: usize,
    initial_skip_done: bool,
}

impl<R: Read> Reader<R> {
    /// A reader over `rdr` with a default (not yet usable) layout. Set
    /// `layout.field_lengths` before the first read.
    pub fn new(rdr: R) -> Self {
        Self::with_layout(Layout::default(), rdr)
    }

    /// A reader over `rdr` using the given layout.
    pub fn with_layout(layout: Layout, rdr: R) -> Self {
        Self {
            layout,
            inner: BufReader::new(rdr),
            line: 0,
            initial_skip_done: false,
        }
    }

    /// Read and decode the next record.
    pub fn read(&mut self) -> Result<Record> {
        self.ensure_initial_skip()?;
        self.parse_record()
    }

    /// Read up to `n` records.
    ///
    /// On a mid-sequence failure the records parsed so far are returned
    /// alongside the error.
    pub fn read_rows(&mut self, n: usize) -> (Vec<Record>, Option<Error>) {
        if let Err(err) = self.ensure_initial_skip() {
            return (Vec::new(), Some(err));
        }
        let mut records = Vec::with_capacity(n);
        for _ in 0..n {
            match self.parse_record() {
                Ok(record) => records.push(record),
                Err(err) => return (records, Some(err)),
            }
        }
        (records, None)
    }

    /// Read records until end-of-stream.
    ///
    /// Reaching end-of-stream terminates the loop successfully with the
    /// records gathered so far; any other failure propagates immediately.
    pub fn read_all(&mut self) -> Result<Vec<Record>> {
        self.ensure_initial_skip()?;
        let mut records = Vec::new();
        loop {
            match self.parse_record() {
                Ok(record) => records.push(record),
                Err(err) if err.is_eof() => return Ok(records),
                Err(err) => return Err(err),
            }
        }
    }

    /// Discard `skip_lines` raw lines ahead of the first record. Runs once
    /// per reader; failures here are I/O errors, not parse errors.
    fn ensure_initial_skip(&mut self) -> Result<()> {
        if self.initial_skip_done {
            return Ok(());
        }
        let width = self.layout.line_width().map_err(|k| self.err_next(k))?;
        for _ in 0..self.layout.skip_lines {
            self.read_line(width).map_err(|k| self.err_next(k))?;
        }
        self.initial_skip_done = true;
        Ok(())
    }

    /// Decode one record: validate the layout, read past comment lines,
    /// check the raw line, slice it into fields.
    fn parse_record(&mut self) -> Result<Record> {
        let width = self.layout.line_width().map_err(|k| self.err_next(k))?;
        let mut raw = self.read_line(width).map_err(|k| self.err_next(k))?;
        if let Some(marker) = self.layout.comment {
            while raw.first() == Some(&marker) {
                raw = self.read_line(width).map_err(|k| self.err_next(k))?;
            }
        }
        if raw.len() != width {
            return Err(self.err_here(ErrorKind::IncorrectLineWidth));
        }
        // A fixed-width line must not contain stray delimiter bytes.
        if raw.iter().any(|&b| b == b'\r' || b == b'\n') {
            return Err(self.err_here(ErrorKind::IncorrectLineWidth));
        }

        let mut fields = Vec::with_capacity(self.layout.field_lengths.len());
        let mut pos = self.layout.skip_start;
        for &len in &self.layout.field_lengths {
            let mut slice = &raw[pos..pos + len];
            if self.layout.trim_fields {
                slice = trim_bytes(slice);
            }
            fields.push(String::from_utf8_lossy(slice).into_owned());
            pos += len;
        }
        // Any skip_end bytes remain in `raw`, discarded with it.
        Ok(fields)
    }

    /// Read one raw line (without its delimiter) per the line-ending mode.
    /// Increments the consumed-line counter on success.
    fn read_line(&mut self, width: usize) -> std::result::Result<Vec<u8>, ErrorKind> {
        let raw = match self.layout.line_ending {
            LineEnding::None => {
                let mut buf = vec![0u8; width];
                self.inner.read_exact(&mut buf).map_err(ErrorKind::Io)?;
                buf
            }
            LineEnding::Cr => self.read_until(b'\r')?,
            LineEnding::Lf => self.read_until(b'\n')?,
            LineEnding::CrLf => {
                let buf = self.read_until(b'\r')?;
                let mut next = [0u8; 1];
                self.inner.read_exact(&mut next).map_err(ErrorKind::Io)?;
                if next[0] != b'\n' {
                    return Err(ErrorKind::MalformedLineEnding);
                }
                buf
            }
        };
        self.line += 1;
        Ok(raw)
    }

    /// Read bytes up to and excluding `delim`. End-of-stream before the
    /// delimiter is reported as an `UnexpectedEof` I/O error.
    fn read_until(&mut self, delim: u8) -> std::result::Result<Vec<u8>, ErrorKind> {
        let mut buf = Vec::new();
        self.inner.read_until(delim, &mut buf).map_err(ErrorKind::Io)?;
        if buf.last() != Some(&delim) {
            return Err(ErrorKind::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "end of input before line ending",
            )));
        }
        buf.pop();
        Ok(buf)
    }

    /// Position an error on the line currently being read.
    fn err_next(&self, kind: ErrorKind) -> Error {
        Error::new(self.line + 1, 0, kind)
    }

    /// Position an error on the line just consumed.
    fn err_here(&self, kind: ErrorKind) -> Error {
        Error::new(self.line, 0, kind)
    }
}

/// Strip leading and trailing spaces and tabs.
fn trim_bytes(mut s: &[u8]) -> &[u8] {
    while let Some((&b, rest)) = s.split_first() {
        if b == b' ' || b == b'\t' {
            s = rest;
        } else {
            break;
        }
    }
    while let Some((&b, rest)) = s.split_last() {
        if b == b' ' || b == b'\t' {
            s = rest;
        } else {
            break;
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Align;

    /// Helper: a reader over in-memory bytes.
    fn reader(layout: Layout, input: &str) -> Reader<&[u8]> {
        Reader::with_layout(layout, input.as_bytes())
    }

    #[test]
    fn test_header_comment_and_trim() {
        // Skip one header line, skip the comment line, trim the fields.
        let layout = Layout {
            field_lengths: vec![7, 4],
            skip_start: 2,
            skip_lines: 1,
            comment: Some(b'#'),
            line_ending: LineEnding::Lf,
            trim_fields: true,
            ..Layout::default()
        };
        let input = "header\n# comment\n  John   1245\n";
        let mut r = reader(layout, input);
        assert_eq!(r.read().unwrap(), vec!["John", "1245"]);
    }

    #[test]
    fn test_read_all_stops_cleanly_at_eof() {
        let layout = Layout {
            field_lengths: vec![3, 2],
            line_ending: LineEnding::Lf,
            ..Layout::default()
        };
        let mut r = reader(layout, "abcde\nfghij\n");
        let records = r.read_all().unwrap();
        assert_eq!(records, vec![vec!["abc", "de"], vec!["fgh", "ij"]]);
    }

    #[test]
    fn test_consecutive_comment_lines_skipped() {
        let layout = Layout {
            field_lengths: vec![4],
            comment: Some(b'#'),
            line_ending: LineEnding::Lf,
            ..Layout::default()
        };
        let input = "# one\n# two\n# three\ndata\n";
        let mut r = reader(layout, input);
        assert_eq!(r.read().unwrap(), vec!["data"]);
    }

    #[test]
    fn test_untrimmed_fields_keep_padding() {
        let layout = Layout {
            field_lengths: vec![4, 4],
            line_ending: LineEnding::Lf,
            ..Layout::default()
        };
        let mut r = reader(layout, "ab  cd  \n");
        assert_eq!(r.read().unwrap(), vec!["ab  ", "cd  "]);
    }

    #[test]
    fn test_trim_strips_tabs_too() {
        let layout = Layout {
            field_lengths: vec![4],
            line_ending: LineEnding::Lf,
            trim_fields: true,
            ..Layout::default()
        };
        let mut r = reader(layout, "\tab \n");
        assert_eq!(r.read().unwrap(), vec!["ab"]);
    }

    #[test]
    fn test_wrong_line_width_fails() {
        let layout = Layout {
            field_lengths: vec![4],
            line_ending: LineEnding::Lf,
            ..Layout::default()
        };
        let mut r = reader(layout, "toolong\n");
        let err = r.read().unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::IncorrectLineWidth));
        assert_eq!(err.line(), 1);
    }

    #[test]
    fn test_error_carries_line_number() {
        let layout = Layout {
            field_lengths: vec![4],
            line_ending: LineEnding::Lf,
            ..Layout::default()
        };
        let mut r = reader(layout, "aaaa\nbbbb\nbad\n");
        assert!(r.read().is_ok());
        assert!(r.read().is_ok());
        let err = r.read().unwrap_err();
        assert_eq!(err.line(), 3);
    }

    #[test]
    fn test_none_mode_reads_exact_width() {
        // No delimiters at all: records are consecutive width-sized chunks.
        let layout = Layout {
            field_lengths: vec![3, 2],
            line_ending: LineEnding::None,
            ..Layout::default()
        };
        let mut r = reader(layout, "abcdeFGHIJ");
        assert_eq!(r.read().unwrap(), vec!["abc", "de"]);
        assert_eq!(r.read().unwrap(), vec!["FGH", "IJ"]);
        assert!(r.read().unwrap_err().is_eof());
    }

    #[test]
    fn test_embedded_delimiter_fails() {
        let layout = Layout {
            field_lengths: vec![4],
            line_ending: LineEnding::None,
            ..Layout::default()
        };
        let mut r = reader(layout, "ab\ncdef");
        let err = r.read().unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::IncorrectLineWidth));
    }

    #[test]
    fn test_cr_mode() {
        let layout = Layout {
            field_lengths: vec![2],
            line_ending: LineEnding::Cr,
            ..Layout::default()
        };
        let mut r = reader(layout, "ab\rcd\r");
        assert_eq!(r.read().unwrap(), vec!["ab"]);
        assert_eq!(r.read().unwrap(), vec!["cd"]);
    }

    #[test]
    fn test_crlf_mode_requires_lf_after_cr() {
        let layout = Layout {
            field_lengths: vec![4],
            ..Layout::default()
        };
        let mut r = reader(layout.clone(), "abcd\r\nefgh\r\n");
        assert_eq!(r.read().unwrap(), vec!["abcd"]);
        assert_eq!(r.read().unwrap(), vec!["efgh"]);

        let mut r = reader(layout, "abcd\rXefgh\r\n");
        let err = r.read().unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::MalformedLineEnding));
    }

    #[test]
    fn test_empty_layout_fails_before_touching_stream() {
        let mut r = reader(Layout::default(), "anything\n");
        let err = r.read().unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::NoFieldsConfigured));

        let (records, err) = r.read_rows(3);
        assert!(records.is_empty());
        assert!(matches!(
            err.unwrap().kind(),
            ErrorKind::NoFieldsConfigured
        ));
    }

    #[test]
    fn test_read_rows_returns_partial_on_failure() {
        let layout = Layout {
            field_lengths: vec![4],
            line_ending: LineEnding::Lf,
            ..Layout::default()
        };
        let mut r = reader(layout, "aaaa\nbbbb\n");
        let (records, err) = r.read_rows(5);
        assert_eq!(records, vec![vec!["aaaa"], vec!["bbbb"]]);
        assert!(err.unwrap().is_eof());
    }

    #[test]
    fn test_read_rows_exact() {
        let layout = Layout {
            field_lengths: vec![4],
            line_ending: LineEnding::Lf,
            ..Layout::default()
        };
        let mut r = reader(layout, "aaaa\nbbbb\ncccc\n");
        let (records, err) = r.read_rows(2);
        assert!(err.is_none());
        assert_eq!(records, vec![vec!["aaaa"], vec!["bbbb"]]);
        // The third line is still there for the next call.
        assert_eq!(r.read().unwrap(), vec!["cccc"]);
    }

    #[test]
    fn test_skip_lines_hitting_eof_is_an_io_error() {
        let layout = Layout {
            field_lengths: vec![4],
            skip_lines: 3,
            line_ending: LineEnding::Lf,
            ..Layout::default()
        };
        let mut r = reader(layout, "only one\n");
        let err = r.read().unwrap_err();
        assert!(err.is_eof());
        assert_eq!(err.line(), 2);
    }

    #[test]
    fn test_read_all_propagates_parse_errors() {
        let layout = Layout {
            field_lengths: vec![4],
            line_ending: LineEnding::Lf,
            ..Layout::default()
        };
        let mut r = reader(layout, "aaaa\nbad\ncccc\n");
        let err = r.read_all().unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::IncorrectLineWidth));
        assert_eq!(err.line(), 2);
    }

    #[test]
    fn test_layout_may_change_between_calls() {
        let layout = Layout {
            field_lengths: vec![4],
            line_ending: LineEnding::Lf,
            ..Layout::default()
        };
        let mut r = reader(layout, "aaaa\nbbbbbb\n");
        assert_eq!(r.read().unwrap(), vec!["aaaa"]);
        r.layout.field_lengths = vec![3, 3];
        assert_eq!(r.read().unwrap(), vec!["bbb", "bbb"]);
    }

    #[test]
    fn test_alignment_is_irrelevant_on_read() {
        let layout = Layout {
            field_lengths: vec![4, 4],
            field_align: vec![Align::Right, Align::Left],
            line_ending: LineEnding::Lf,
            trim_fields: true,
            ..Layout::default()
        };
        let mut r = reader(layout, "  ab  cd\n");
        assert_eq!(r.read().unwrap(), vec!["ab", "cd"]);
    }
}
