//! Cross-file variant table.
//!
//! Collects the distinct variants (CHROM, POS, ID, REF, ALT) of several VCF
//! files and reports, per file, the QD annotation (or the raw QUAL) of each
//! variant. Files are columns named by their basename; a repeated basename
//! shares its column with the earlier file.
//!
//! Rows are ordered by the number of files containing the variant, most
//! shared first; ties keep first-seen order.

use std::collections::HashMap;
use std::io::{self, Write};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::effect::gene_summary;
use crate::core::record::{Record, VariantKey};
use crate::parsing::vcf::{Line, ParseError};

/// Printed for absent values
pub const ABSENT: &str = "-";

/// INFO key read unless QUAL is requested
pub const QD_KEY: &str = "QD";

/// Minimum number of input files
pub const MIN_FILES: usize = 2;

#[derive(Error, Debug)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Expected at least {MIN_FILES} files, got {0}")]
    TooFewFiles(usize),

    #[error("{file}: could not extract QD from line {line}")]
    MissingQd { file: String, line: usize },

    #[error("{file}: could not extract genes from line {line}. Was the file annotated with SnpEff?\n{record}")]
    MissingEffects {
        file: String,
        line: usize,
        record: String,
    },
}

/// Which per-file value fills the table cells
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValueSource {
    /// INFO `QD`
    #[default]
    Qd,
    /// QUAL column
    Qual,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileConfig {
    pub value: ValueSource,
    /// Extract SnpEff `GENE:SEVERITY` labels; every record must carry one
    pub snpeff: bool,
}

#[derive(Debug, Clone)]
struct Entry {
    key: VariantKey,
    genes: Option<String>,
    values: Vec<Option<String>>,
}

/// Incrementally builds a [`CompileTable`], one file at a time
#[derive(Debug, Default)]
pub struct Compiler {
    config: CompileConfig,
    columns: Vec<String>,
    entries: Vec<Entry>,
    index: HashMap<VariantKey, usize>,
}

/// One output row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledRow {
    #[serde(flatten)]
    pub key: VariantKey,
    pub genes: String,
    /// Number of files containing the variant
    pub files: usize,
    /// One cell per column, `-` when the file lacks the variant
    pub values: Vec<String>,
}

/// Finished table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompileTable {
    pub columns: Vec<String>,
    pub rows: Vec<CompiledRow>,
}

impl Compiler {
    #[must_use]
    pub fn new(config: CompileConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    fn column(&mut self, name: &str) -> usize {
        if let Some(i) = self.columns.iter().position(|c| c == name) {
            warn!("Input name {name} was seen before; its values share one column");
            return i;
        }
        self.columns.push(name.to_string());
        self.columns.len() - 1
    }

    /// Add the records of one file under column `name`.
    ///
    /// Returns the number of distinct variants in the file.
    ///
    /// # Errors
    ///
    /// Returns `CompileError::MissingQd` if a record has no QD (unless QUAL
    /// is used), `CompileError::MissingEffects` if SnpEff extraction is on
    /// and a record has no effect, or any parse error from `lines`.
    pub fn add_file<I>(&mut self, name: &str, lines: I) -> Result<usize, CompileError>
    where
        I: IntoIterator<Item = Result<Line, ParseError>>,
    {
        let column = self.column(name);
        let mut seen = 0;

        for line in lines {
            let record = match line? {
                Line::Header(_) => continue,
                Line::Record(record) => record,
            };

            let value = self.value(name, &record)?;
            let genes = if self.config.snpeff {
                Some(gene_summary(record.info()).ok_or_else(|| {
                    CompileError::MissingEffects {
                        file: name.to_string(),
                        line: record.line_number(),
                        record: record.to_line(),
                    }
                })?)
            } else {
                None
            };

            let key = record.variant_key();
            let slot = match self.index.get(&key) {
                Some(&i) => i,
                None => {
                    self.index.insert(key.clone(), self.entries.len());
                    self.entries.push(Entry {
                        key,
                        genes: None,
                        values: Vec::new(),
                    });
                    self.entries.len() - 1
                }
            };

            let entry = &mut self.entries[slot];
            if entry.values.len() <= column {
                entry.values.resize(column + 1, None);
            }
            if entry.values[column].is_none() {
                seen += 1;
            }
            entry.values[column] = Some(value);
            if entry.genes.is_none() {
                entry.genes = genes;
            }
        }

        debug!("{name}: {seen} variants");
        Ok(seen)
    }

    fn value(&self, name: &str, record: &Record) -> Result<String, CompileError> {
        match self.config.value {
            ValueSource::Qual => Ok(record.qual().to_string()),
            ValueSource::Qd => record
                .info_field()
                .get(QD_KEY)
                .map(str::to_string)
                .ok_or_else(|| CompileError::MissingQd {
                    file: name.to_string(),
                    line: record.line_number(),
                }),
        }
    }

    /// Number of distinct variants across all files added so far
    pub fn unique_variants(&self) -> usize {
        self.entries.len()
    }

    /// Order the rows and fill absent cells
    #[must_use]
    pub fn finish(self) -> CompileTable {
        let width = self.columns.len();
        let mut rows: Vec<CompiledRow> = self
            .entries
            .into_iter()
            .map(|entry| {
                let files = entry.values.iter().filter(|v| v.is_some()).count();
                let mut values: Vec<String> = entry
                    .values
                    .into_iter()
                    .map(|v| v.unwrap_or_else(|| ABSENT.to_string()))
                    .collect();
                values.resize(width, ABSENT.to_string());
                CompiledRow {
                    key: entry.key,
                    genes: entry.genes.unwrap_or_else(|| ABSENT.to_string()),
                    files,
                    values,
                }
            })
            .collect();

        // Stable sort keeps first-seen order on ties
        rows.sort_by(|a, b| b.files.cmp(&a.files));

        info!("Number of unique variants: {}", rows.len());
        CompileTable {
            columns: self.columns,
            rows,
        }
    }
}

impl CompileTable {
    /// Write the table as TSV with a header line
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn write_tsv<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(
            out,
            "CHROM\tPOS\tID\tREF\tALT\tGENES\t{}",
            self.columns.join("\t")
        )?;
        for row in &self.rows {
            writeln!(
                out,
                "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                row.key.chrom,
                row.key.pos,
                row.key.id,
                row.key.reference,
                row.key.alternate,
                row.genes,
                row.values.join("\t")
            )?;
        }
        out.flush()
    }

    /// Write the table as pretty JSON
    ///
    /// # Errors
    ///
    /// Returns any error from serialization or the underlying writer.
    pub fn write_json<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        writeln!(out, "{text}")?;
        out.flush()
    }
}
