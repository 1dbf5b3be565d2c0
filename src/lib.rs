//! # fixedwidth-rs
//!
//! A fixed-width record reader/writer library.
//!
//! This is the fixed-width analogue of a CSV codec: instead of splitting on
//! a separator character, columns occupy predetermined byte offsets and
//! lengths. Think mainframe data files, punch-card layouts, and bank batch
//! formats, where every line is sliced by position.
//!
//! ## Overview
//!
//! Both sides share one [`Layout`] value describing the line:
//! - **Column widths**: byte width per column (`field_lengths`)
//! - **Alignment**: left or right padding per column on write
//! - **Skip regions**: bytes ignored/padded before and after the fields
//! - **Line endings**: none, CR, LF, or CRLF
//! - **Comments**: lines starting with a marker byte are skipped
//!
//! ## Example
//!
//! ```
//! use fixedwidth_rs::{Layout, LineEnding, Reader};
//!
//! // Record layout: Last(8) First(10)
//! let layout = Layout {
//!     field_lengths: vec![8, 10],
//!     line_ending: LineEnding::Lf,
//!     trim_fields: true,
//!     ..Layout::default()
//! };
//!
//! let data = "SMITH   JOHN      \nJONES   MARY      \n";
//! let mut reader = Reader::with_layout(layout, data.as_bytes());
//! let records = reader.read_all().unwrap();
//!
//! assert_eq!(records[0], vec!["SMITH", "JOHN"]);
//! assert_eq!(records[1], vec!["JONES", "MARY"]);
//! ```

pub mod error;
pub mod layout;
pub mod reader;
pub mod writer;

pub use error::{Error, ErrorKind, Result};
pub use layout::{Align, Layout, LineEnding};
pub use reader::Reader;
pub use writer::Writer;

/// One decoded line: field strings in column order.
pub type Record = Vec<String>;
