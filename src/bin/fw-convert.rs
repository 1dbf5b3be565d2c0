//! CLI tool to re-format fixed-width data files between column layouts.
//!
//! Reads records from the input file using one layout and writes them back
//! out with another (by default the same widths), realigning columns,
//! trimming fields, or changing line endings along the way.

use clap::Parser;
use fixedwidth_rs::{Align, Layout, LineEnding, Reader, Record, Writer};
use std::fs::File;
use std::io::{self, Write};
use std::process;

/// Re-format a fixed-width data file.
///
/// Example: realign a LF-terminated file's last column to the right:
///
///   fw-convert input.data --widths 8,10,8 --align l,l,r --in-eol lf
#[derive(Parser)]
#[command(name = "fw-convert")]
struct Cli {
    /// Input data file
    input: String,

    /// Comma-separated column widths of the input, e.g. 8,10,8
    #[arg(long)]
    widths: String,

    /// Column widths of the output (default: same as input)
    #[arg(long)]
    out_widths: Option<String>,

    /// Per-column output alignment, e.g. l,l,r (default: all left)
    #[arg(long)]
    align: Option<String>,

    /// Bytes to ignore at the start of each input line (space-padded on output)
    #[arg(long, default_value_t = 0)]
    skip_start: usize,

    /// Bytes to ignore at the end of each input line (space-padded on output)
    #[arg(long, default_value_t = 0)]
    skip_end: usize,

    /// Leading input lines to discard before the first record
    #[arg(long, default_value_t = 0)]
    skip_lines: usize,

    /// Comment marker; marked input lines are skipped
    #[arg(long)]
    comment: Option<char>,

    /// Input line ending: none, cr, lf, or crlf
    #[arg(long, default_value = "crlf")]
    in_eol: String,

    /// Output line ending: none, cr, lf, or crlf
    #[arg(long, default_value = "crlf")]
    out_eol: String,

    /// Trim fields on read and truncate oversized fields on write
    #[arg(long)]
    trim: bool,

    /// Write output to file instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Show record counts on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn parse_widths(s: &str) -> Result<Vec<usize>, String> {
    s.split(',')
        .map(|part| {
            part.trim()
                .parse::<usize>()
                .map_err(|_| format!("invalid column width '{}'", part.trim()))
        })
        .collect()
}

fn parse_align(s: &str) -> Result<Vec<Align>, String> {
    s.split(',')
        .map(|part| match part.trim() {
            "l" | "left" => Ok(Align::Left),
            "r" | "right" => Ok(Align::Right),
            other => Err(format!("invalid alignment '{other}' (use l or r)")),
        })
        .collect()
}

fn parse_eol(s: &str) -> Result<LineEnding, String> {
    match s {
        "none" => Ok(LineEnding::None),
        "cr" => Ok(LineEnding::Cr),
        "lf" => Ok(LineEnding::Lf),
        "crlf" => Ok(LineEnding::CrLf),
        other => Err(format!(
            "invalid line ending '{other}' (use none, cr, lf, or crlf)"
        )),
    }
}

fn comment_byte(c: char) -> Result<u8, String> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(format!("comment marker '{c}' must be an ASCII character"))
    }
}

fn write_records<W: Write>(out: W, layout: Layout, records: &[Record]) -> fixedwidth_rs::Result<()> {
    let mut writer = Writer::with_layout(layout, out);
    writer.write_all(records)
}

fn main() {
    let cli = Cli::parse();

    let widths = parse_widths(&cli.widths).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    });
    let out_widths = match &cli.out_widths {
        Some(s) => parse_widths(s).unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            process::exit(1);
        }),
        None => widths.clone(),
    };
    let align = match &cli.align {
        Some(s) => parse_align(s).unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            process::exit(1);
        }),
        None => Vec::new(),
    };
    let in_eol = parse_eol(&cli.in_eol).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    });
    let out_eol = parse_eol(&cli.out_eol).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    });
    let comment = cli.comment.map(|c| {
        comment_byte(c).unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            process::exit(1);
        })
    });

    let in_layout = Layout {
        field_lengths: widths,
        skip_start: cli.skip_start,
        skip_end: cli.skip_end,
        skip_lines: cli.skip_lines,
        comment,
        line_ending: in_eol,
        trim_fields: cli.trim,
        ..Layout::default()
    };
    let out_layout = Layout {
        field_lengths: out_widths,
        field_align: align,
        line_ending: out_eol,
        trim_fields: cli.trim,
        ..Layout::default()
    };

    let file = match File::open(&cli.input) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error opening input file '{}': {e}", cli.input);
            process::exit(1);
        }
    };

    let mut reader = Reader::with_layout(in_layout, file);
    let records = match reader.read_all() {
        Ok(records) => records,
        Err(e) => {
            eprintln!("Error reading '{}': {e}", cli.input);
            process::exit(1);
        }
    };

    let result = match &cli.output {
        Some(out_path) => match File::create(out_path) {
            Ok(f) => write_records(f, out_layout, &records),
            Err(e) => {
                eprintln!("Error creating output file '{out_path}': {e}");
                process::exit(1);
            }
        },
        None => write_records(io::stdout().lock(), out_layout, &records),
    };
    if let Err(e) = result {
        eprintln!("Error writing output: {e}");
        process::exit(1);
    }

    if cli.verbose {
        eprintln!("Records:  {} converted", records.len());
    }
}
