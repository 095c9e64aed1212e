use serde::Serialize;

use crate::core::info::InfoField;

/// Marker used by VCF for a missing value (ID, QUAL, ...)
pub const MISSING: &str = ".";

/// Minimum number of columns a data line must have (CHROM through INFO)
pub const MIN_FIELDS: usize = 8;

const CHROM: usize = 0;
const POS: usize = 1;
const ID: usize = 2;
const REF: usize = 3;
const ALT: usize = 4;
const QUAL: usize = 5;
const INFO: usize = 7;

/// One tab-separated VCF data line
///
/// Construction goes through [`crate::parsing::vcf::parse_record`], which
/// guarantees at least [`MIN_FIELDS`] fields, so the positional accessors
/// never go out of bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    line_number: usize,
    fields: Vec<String>,
}

/// Identity of a variant across files: CHROM, POS, ID, REF and ALT
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct VariantKey {
    pub chrom: String,
    pub pos: String,
    pub id: String,
    pub reference: String,
    pub alternate: String,
}

impl Record {
    pub(crate) fn new(line_number: usize, fields: Vec<String>) -> Self {
        debug_assert!(fields.len() >= MIN_FIELDS);
        Self {
            line_number,
            fields,
        }
    }

    /// 1-based line number in the source stream
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn chrom(&self) -> &str {
        &self.fields[CHROM]
    }

    pub fn pos(&self) -> &str {
        &self.fields[POS]
    }

    pub fn id(&self) -> &str {
        &self.fields[ID]
    }

    pub fn reference(&self) -> &str {
        &self.fields[REF]
    }

    pub fn alternate(&self) -> &str {
        &self.fields[ALT]
    }

    /// Raw QUAL column, possibly [`MISSING`]
    pub fn qual(&self) -> &str {
        &self.fields[QUAL]
    }

    /// Raw INFO column
    pub fn info(&self) -> &str {
        &self.fields[INFO]
    }

    pub fn info_field(&self) -> InfoField<'_> {
        InfoField::new(self.info())
    }

    /// True if the ID column carries an identifier (e.g. a dbSNP rs number)
    pub fn has_id(&self) -> bool {
        self.id() != MISSING
    }

    pub fn variant_key(&self) -> VariantKey {
        VariantKey {
            chrom: self.chrom().to_string(),
            pos: self.pos().to_string(),
            id: self.id().to_string(),
            reference: self.reference().to_string(),
            alternate: self.alternate().to_string(),
        }
    }

    /// The record as it appeared in the input, without the line terminator
    pub fn to_line(&self) -> String {
        self.fields.join("\t")
    }
}
