//! Reading VCF text from plain or compressed sources.
//!
//! - [`input`]: open plain, gzip, bzip2 and zip files (or stdin) as buffered readers
//! - [`vcf`]: split a stream into header lines and tab-separated [`Record`](crate::core::record::Record)s
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use vcf_callset::parsing::input::open_input;
//! use vcf_callset::parsing::vcf::{Line, VcfLines};
//!
//! let reader = open_input(Path::new("calls.vcf.gz")).unwrap();
//! for line in VcfLines::new(reader) {
//!     if let Line::Record(record) = line.unwrap() {
//!         println!("{}:{}", record.chrom(), record.pos());
//!     }
//! }
//! ```

pub mod input;
pub mod vcf;

use std::path::Path;

use crate::parsing::input::open_input;
use crate::parsing::vcf::{Line, ParseError, VcfLines};

/// Open a VCF file and iterate its lines
///
/// # Errors
///
/// Returns an error if the file cannot be opened.
pub fn read_vcf(path: &Path) -> Result<impl Iterator<Item = Result<Line, ParseError>>, ParseError> {
    Ok(VcfLines::new(open_input(path)?))
}
