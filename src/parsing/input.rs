//! Opening (possibly compressed) VCF inputs and outputs.
//!
//! The decoder is chosen from the file extension:
//! - `.gz`, `.bgz` (gzip / bgzip, multi-member aware)
//! - `.bz2` (bzip2)
//! - `.zip` (the first entry of the archive)
//! - anything else is read as plain text
//!
//! `-` and `stdin` read from standard input.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Cursor, Read, Write};
use std::path::Path;

use bzip2::read::MultiBzDecoder;
use bzip2::write::BzEncoder;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use tracing::debug;

use crate::parsing::vcf::ParseError;

/// Compression scheme inferred from a file name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
    Bzip2,
    Zip,
}

impl Compression {
    /// Infer the compression from the extension of `path`
    #[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
    pub fn from_path(path: &Path) -> Self {
        let path_str = path.to_string_lossy().to_lowercase();
        if path_str.ends_with(".gz") || path_str.ends_with(".bgz") {
            Self::Gzip
        } else if path_str.ends_with(".bz2") {
            Self::Bzip2
        } else if path_str.ends_with(".zip") {
            Self::Zip
        } else {
            Self::None
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Gzip => "gzip",
            Self::Bzip2 => "bzip2",
            Self::Zip => "zip",
        }
    }
}

/// Returns true if `path` names standard input
pub fn is_stdin(path: &Path) -> bool {
    matches!(path.to_str(), Some("-" | "stdin"))
}

/// Open `path` for buffered reading, decompressing as needed.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be opened, or
/// `ParseError::Archive` if a zip archive is corrupt or empty.
pub fn open_input(path: &Path) -> Result<Box<dyn BufRead>, ParseError> {
    if is_stdin(path) {
        debug!("Reading from standard input");
        return Ok(Box::new(BufReader::new(io::stdin())));
    }

    let compression = Compression::from_path(path);
    debug!(
        "Opening {} (compression: {})",
        path.display(),
        compression.name()
    );

    let file = File::open(path)?;
    let reader: Box<dyn BufRead> = match compression {
        Compression::None => Box::new(BufReader::new(file)),
        Compression::Gzip => Box::new(BufReader::new(MultiGzDecoder::new(file))),
        Compression::Bzip2 => Box::new(BufReader::new(MultiBzDecoder::new(file))),
        Compression::Zip => Box::new(Cursor::new(read_first_zip_entry(file)?)),
    };
    Ok(reader)
}

/// Zip entries borrow their archive, so the first entry is read into memory.
fn read_first_zip_entry(file: File) -> Result<Vec<u8>, ParseError> {
    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| ParseError::Archive(e.to_string()))?;
    if archive.is_empty() {
        return Err(ParseError::Archive("zip archive has no entries".to_string()));
    }
    let mut entry = archive
        .by_index(0)
        .map_err(|e| ParseError::Archive(e.to_string()))?;
    debug!("Reading zip entry {}", entry.name());

    let mut buf = Vec::new();
    entry.read_to_end(&mut buf)?;
    Ok(buf)
}

/// Writer returned by [`create_output`]
///
/// Compressed streams are only complete after [`OutputWriter::finish`];
/// dropping the writer finishes them too but loses any error.
pub enum OutputWriter {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
    Bzip2(BzEncoder<BufWriter<File>>),
}

impl OutputWriter {
    /// Write any compression trailer and flush the file
    ///
    /// # Errors
    ///
    /// Returns any error from the encoder or the file.
    pub fn finish(self) -> io::Result<()> {
        match self {
            Self::Plain(mut out) => out.flush(),
            Self::Gzip(encoder) => encoder.finish()?.flush(),
            Self::Bzip2(encoder) => encoder.finish()?.flush(),
        }
    }
}

impl Write for OutputWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Plain(out) => out.write(buf),
            Self::Gzip(out) => out.write(buf),
            Self::Bzip2(out) => out.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Plain(out) => out.flush(),
            Self::Gzip(out) => out.flush(),
            Self::Bzip2(out) => out.flush(),
        }
    }
}

/// Create `path` for writing, compressing with gzip or bzip2 by extension.
///
/// Zip output is not supported and is written as plain text.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be created.
pub fn create_output(path: &Path) -> Result<OutputWriter, ParseError> {
    let file = BufWriter::new(File::create(path)?);
    let writer = match Compression::from_path(path) {
        Compression::Gzip => {
            OutputWriter::Gzip(GzEncoder::new(file, flate2::Compression::default()))
        }
        Compression::Bzip2 => {
            OutputWriter::Bzip2(BzEncoder::new(file, bzip2::Compression::default()))
        }
        Compression::None | Compression::Zip => OutputWriter::Plain(file),
    };
    Ok(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_compression_from_path() {
        assert_eq!(
            Compression::from_path(Path::new("calls.vcf.gz")),
            Compression::Gzip
        );
        assert_eq!(
            Compression::from_path(Path::new("calls.VCF.BGZ")),
            Compression::Gzip
        );
        assert_eq!(
            Compression::from_path(Path::new("calls.vcf.bz2")),
            Compression::Bzip2
        );
        assert_eq!(
            Compression::from_path(Path::new("calls.zip")),
            Compression::Zip
        );
        assert_eq!(
            Compression::from_path(Path::new("calls.vcf")),
            Compression::None
        );
    }

    #[test]
    fn test_is_stdin() {
        assert!(is_stdin(Path::new("-")));
        assert!(is_stdin(Path::new("stdin")));
        assert!(!is_stdin(&PathBuf::from("stdin.vcf")));
    }

    fn read_back(path: &Path) -> String {
        let mut text = String::new();
        open_input(path).unwrap().read_to_string(&mut text).unwrap();
        text
    }

    #[test]
    fn test_gzip_output_is_complete_after_finish() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.vcf.gz");
        let mut out = create_output(&path).unwrap();
        assert!(matches!(out, OutputWriter::Gzip(_)));
        out.write_all(b"#CHROM\nchr1\t1\n").unwrap();
        out.finish().unwrap();

        assert_eq!(read_back(&path), "#CHROM\nchr1\t1\n");
    }

    #[test]
    fn test_bzip2_output_is_complete_after_finish() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.vcf.bz2");
        let mut out = create_output(&path).unwrap();
        assert!(matches!(out, OutputWriter::Bzip2(_)));
        out.write_all(b"#CHROM\nchr2\t5\n").unwrap();
        out.finish().unwrap();

        assert_eq!(read_back(&path), "#CHROM\nchr2\t5\n");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_finish_reports_write_failure() {
        let Ok(file) = File::options().write(true).open("/dev/full") else {
            return;
        };
        let mut out = OutputWriter::Gzip(GzEncoder::new(
            BufWriter::new(file),
            flate2::Compression::default(),
        ));
        out.write_all(b"chr1\t1\n").unwrap();
        assert!(out.finish().is_err());
    }

    #[test]
    fn test_zip_reads_first_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calls.zip");
        let mut writer = zip::ZipWriter::new(File::create(&path).unwrap());
        writer
            .start_file("calls.vcf", zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"#h\nchr1\t1\n").unwrap();
        writer
            .start_file("other.vcf", zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"#other\n").unwrap();
        writer.finish().unwrap();

        assert_eq!(read_back(&path), "#h\nchr1\t1\n");
    }

    #[test]
    fn test_empty_zip_is_archive_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.zip");
        zip::ZipWriter::new(File::create(&path).unwrap())
            .finish()
            .unwrap();

        let result = open_input(&path);
        assert!(matches!(result, Err(ParseError::Archive(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = open_input(Path::new("/nonexistent/calls.vcf"));
        assert!(matches!(result, Err(ParseError::Io(_))));
    }
}
