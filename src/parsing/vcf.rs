//! Line-level VCF reader.
//!
//! Lines starting with `#` are passed through untouched as headers. Every
//! other non-empty line is split on tabs into a [`Record`]. Nothing beyond
//! the field count is validated: records are opaque tab-separated strings.

use std::io::BufRead;

use thiserror::Error;

use crate::core::record::{Record, MIN_FIELDS};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid archive: {0}")]
    Archive(String),

    #[error("Line {line}: expected at least {MIN_FIELDS} tab-separated fields, found {found}")]
    TooFewFields { line: usize, found: usize },
}

/// A single line of a VCF file
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    /// Meta-information or column header line, including the leading `#`
    Header(String),
    /// A variant record
    Record(Record),
}

/// Lazy iterator over the lines of a VCF stream
pub struct VcfLines<R> {
    reader: R,
    buf: String,
    line_number: usize,
}

impl<R: BufRead> VcfLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            line_number: 0,
        }
    }
}

impl<R: BufRead> Iterator for VcfLines<R> {
    type Item = Result<Line, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }
            self.line_number += 1;

            let line = self.buf.trim_end_matches(['\n', '\r']);
            if line.is_empty() {
                continue;
            }
            if line.starts_with('#') {
                return Some(Ok(Line::Header(line.to_string())));
            }
            return Some(parse_record(line, self.line_number).map(Line::Record));
        }
    }
}

/// Split a data line into a [`Record`]
///
/// # Errors
///
/// Returns `ParseError::TooFewFields` if the line has fewer than eight fields.
pub fn parse_record(line: &str, line_number: usize) -> Result<Record, ParseError> {
    let fields: Vec<String> = line.split('\t').map(str::to_string).collect();
    if fields.len() < MIN_FIELDS {
        return Err(ParseError::TooFewFields {
            line: line_number,
            found: fields.len(),
        });
    }
    Ok(Record::new(line_number, fields))
}
