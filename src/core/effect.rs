//! SnpEff effect annotations.
//!
//! SnpEff writes `ANN`/`EFF` entries as `|`-separated fields in which a
//! putative impact is directly followed by the gene name:
//!
//! ```text
//! ANN=T|missense_variant|MODERATE|BRCA2|ENSG00000139618|...
//! ```
//!
//! A token `|SEVERITY|GENE|` anywhere in the INFO string counts as an effect.
//! Matches do not overlap: the `|` closing one match cannot open the next.
//! The gene must be a single non-empty field: `|HIGH||x|` is not an effect,
//! and the empty slot never absorbs the fields after it as a gene name.

use serde::{Deserialize, Serialize};

const EFFECT_DELIMITER: char = '|';

/// Putative impact of a variant as classified by SnpEff
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "UPPERCASE")]
#[value(rename_all = "UPPER")]
pub enum Severity {
    High,
    Moderate,
    Low,
    Modifier,
}

impl Severity {
    /// Parse the literal SnpEff spelling (`HIGH`, `MODERATE`, `LOW`, `MODIFIER`)
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "HIGH" => Some(Self::High),
            "MODERATE" => Some(Self::Moderate),
            "LOW" => Some(Self::Low),
            "MODIFIER" => Some(Self::Modifier),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Moderate => "MODERATE",
            Self::Low => "LOW",
            Self::Modifier => "MODIFIER",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One `|SEVERITY|GENE|` token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Effect<'a> {
    pub severity: Severity,
    pub gene: &'a str,
}

/// Iterate the effect tokens of an INFO string in order of appearance
pub fn effects(info: &str) -> impl Iterator<Item = Effect<'_>> {
    let parts: Vec<&str> = info.split(EFFECT_DELIMITER).collect();
    let mut found = Vec::new();

    // parts[i] is preceded by a '|' for i >= 1; the gene part must be
    // followed by one as well, so i + 2 must still be a part.
    let mut i = 1;
    while i + 2 < parts.len() {
        match Severity::parse(parts[i]) {
            Some(severity) if !parts[i + 1].is_empty() => {
                found.push(Effect {
                    severity,
                    gene: parts[i + 1],
                });
                // The closing '|' is consumed by this match
                i += 3;
            }
            _ => i += 1,
        }
    }

    found.into_iter()
}

/// True if `info` carries at least one effect of the given severity
pub fn has_effect(info: &str, severity: Severity) -> bool {
    effects(info).any(|e| e.severity == severity)
}

/// Distinct `GENE:SEVERITY` labels, sorted and joined with `;`
///
/// Returns `None` if the INFO string has no effect tokens.
pub fn gene_summary(info: &str) -> Option<String> {
    let mut labels: Vec<String> = effects(info)
        .map(|e| format!("{}:{}", e.gene, e.severity))
        .collect();
    if labels.is_empty() {
        return None;
    }
    labels.sort_unstable();
    labels.dedup();
    Some(labels.join(";"))
}
