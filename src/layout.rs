//! Column layout shared by [`Reader`](crate::Reader) and
//! [`Writer`](crate::Writer).
//!
//! A [`Layout`] is a plain configuration value: column widths, per-column
//! alignment, skip regions around the field area, line-ending mode, an
//! optional comment marker, and trim behavior. All fields are public so a
//! layout can be adjusted between record operations; the derived line width
//! is recomputed from scratch on every read or write, so heterogeneous line
//! layouts within one stream are legal.

use crate::error::ErrorKind;

/// Padding side for a field shorter than its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    /// Field bytes first, then padding spaces.
    #[default]
    Left,
    /// Padding spaces first, then field bytes.
    Right,
}

/// How the end of a raw line is detected on read and emitted on write.
///
/// The default is `CrLf` for both reading and writing. (The historical
/// implementation defaulted readers to CRLF but writers to CR only; that
/// asymmetry looked unintentional, so both sides share one default here.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// No delimiter: a line is exactly the layout width of bytes.
    None,
    /// Lines end with a lone carriage return.
    Cr,
    /// Lines end with a lone line feed.
    Lf,
    /// Lines end with a carriage return followed by a line feed.
    #[default]
    CrLf,
}

/// The fixed-column description of one line.
///
/// `field_lengths` is the only required piece: it defines the column count
/// and the byte width of each column. Everything else defaults to the most
/// permissive setting (no skip regions, no comment marker, all columns
/// left-aligned, CRLF line endings, no trimming).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Layout {
    /// Byte width of each column, in column order. Must be non-empty, with
    /// every width greater than zero.
    pub field_lengths: Vec<usize>,
    /// Per-column alignment. Empty means all columns left-aligned; when
    /// non-empty it must have one entry per column.
    pub field_align: Vec<Align>,
    /// Bytes ignored (read) or space-padded (write) before the field region.
    pub skip_start: usize,
    /// Bytes ignored (read) or space-padded (write) after the field region.
    pub skip_end: usize,
    /// Line-ending mode for both detection and emission.
    pub line_ending: LineEnding,
    /// Comment marker byte. A raw line starting with this byte is skipped on
    /// read and can be emitted via
    /// [`Writer::write_comment`](crate::Writer::write_comment).
    pub comment: Option<u8>,
    /// Leading lines discarded before the first record is parsed. Read side
    /// only.
    pub skip_lines: usize,
    /// On read, strip leading/trailing spaces and tabs from each field. On
    /// write, truncate oversized fields instead of failing.
    pub trim_fields: bool,
}

impl Layout {
    /// A layout with the given column widths and all other settings at their
    /// defaults.
    pub fn new(field_lengths: Vec<usize>) -> Self {
        Self {
            field_lengths,
            ..Self::default()
        }
    }

    /// The total byte width of one line:
    /// `skip_start + skip_end + sum(field_lengths)`.
    ///
    /// Validates the layout: `field_lengths` must be non-empty with every
    /// width positive, and `field_align`, when non-empty, must have one
    /// entry per column.
    pub fn line_width(&self) -> Result<usize, ErrorKind> {
        if self.field_lengths.is_empty() {
            return Err(ErrorKind::NoFieldsConfigured);
        }
        if self.field_lengths.iter().any(|&w| w == 0) {
            return Err(ErrorKind::InvalidFieldWidth);
        }
        if !self.field_align.is_empty() && self.field_align.len() != self.field_lengths.len() {
            return Err(ErrorKind::FieldCountMismatch);
        }
        Ok(self.skip_start + self.skip_end + self.field_lengths.iter().sum::<usize>())
    }

    /// The alignment of the given column, defaulting to [`Align::Left`] when
    /// `field_align` is empty.
    pub fn align(&self, column: usize) -> Align {
        self.field_align.get(column).copied().unwrap_or_default()
    }
}
