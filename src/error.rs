//! Error types for fixed-width reading and writing.
//!
//! Every failure is reported as an [`Error`]: an [`ErrorKind`] positioned at
//! the 1-based logical line (and, for write-side field failures, the column
//! index) where it was detected. I/O failures from the underlying stream pass
//! through as [`ErrorKind::Io`].

use std::io;
use thiserror::Error;

/// A convenient alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The specific failure detected while reading or writing a record.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// The layout has no columns defined.
    #[error("no fields defined")]
    NoFieldsConfigured,

    /// A column width is zero, or a field is wider than its column and
    /// truncation is disabled.
    #[error("field width incorrect")]
    InvalidFieldWidth,

    /// A raw line's byte length does not match the layout width, or a
    /// fixed-width line contains stray CR/LF bytes.
    #[error("incorrect line width")]
    IncorrectLineWidth,

    /// A CR was not followed by LF while reading in CRLF mode.
    #[error("CRLF not found at end of line")]
    MalformedLineEnding,

    /// A record's field count does not match the layout's column count.
    #[error("wrong number of fields in record")]
    FieldCountMismatch,

    /// An I/O failure from the underlying byte stream, including
    /// end-of-stream.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// An [`ErrorKind`] positioned at the logical line and column where it
/// occurred.
#[derive(Debug, Error)]
#[error("line {line}, column {column}: {kind}")]
pub struct Error {
    line: usize,
    column: usize,
    kind: ErrorKind,
}

impl Error {
    pub(crate) fn new(line: usize, column: usize, kind: ErrorKind) -> Self {
        Self { line, column, kind }
    }

    /// The 1-based logical line at which the failure occurred.
    pub fn line(&self) -> usize {
        self.line
    }

    /// The column index at which the failure occurred (0 when not
    /// applicable).
    pub fn column(&self) -> usize {
        self.column
    }

    /// The underlying failure.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Discard the position and return the underlying failure.
    pub fn into_kind(self) -> ErrorKind {
        self.kind
    }

    /// Whether this failure was caused by reaching end-of-stream.
    ///
    /// [`Reader::read_all`](crate::Reader::read_all) uses this to terminate
    /// successfully; callers driving [`Reader::read`](crate::Reader::read) in
    /// a loop can do the same.
    pub fn is_eof(&self) -> bool {
        matches!(&self.kind, ErrorKind::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof)
    }
}
