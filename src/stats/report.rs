//! Rendering of caller-set tallies as TSV, aligned text or JSON.

use std::io::{self, Write};

use serde::Serialize;

use crate::stats::aggregate::{Counters, SetStats};
use crate::stats::inference::Inference;

/// Placeholder printed for the caller count of the full intersection
pub const NA: &str = "-";

/// Row order of the report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortBy {
    /// Occurrences descending, label ascending on ties
    #[default]
    Count,
    /// Label ascending
    Name,
}

/// One line of the report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub set: String,
    /// `None` for the full intersection
    pub num_callers: Option<usize>,
    pub num_variants: u64,
    /// Percentage of considered variants
    pub pct_variants: f64,
    pub num_annotated: u64,
    /// Percentage of this set's variants with an ID
    pub pct_annotated: f64,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: &'a Counters,
    #[serde(skip_serializing_if = "Option::is_none")]
    inference: Option<&'a Inference>,
    sets: &'a [ReportRow],
}

/// Sort the tally and compute percentages
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn build_rows(stats: &SetStats, sort_by: SortBy) -> Vec<ReportRow> {
    let considered = stats.counters.considered;
    let mut rows: Vec<ReportRow> = stats
        .tally
        .iter()
        .map(|(key, count)| ReportRow {
            set: key.label(),
            num_callers: key.caller_count(),
            num_variants: count.occurrences,
            pct_variants: if considered == 0 {
                0.0
            } else {
                count.occurrences as f64 * 100.0 / considered as f64
            },
            num_annotated: count.annotated,
            pct_annotated: count.annotated_pct(),
        })
        .collect();

    match sort_by {
        SortBy::Name => rows.sort_by(|a, b| a.set.cmp(&b.set)),
        SortBy::Count => rows.sort_by(|a, b| {
            b.num_variants
                .cmp(&a.num_variants)
                .then_with(|| a.set.cmp(&b.set))
        }),
    }
    rows
}

fn callers_cell(row: &ReportRow) -> String {
    row.num_callers
        .map_or_else(|| NA.to_string(), |n| n.to_string())
}

/// Write the report as tab-separated values with a header line
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_tsv<W: Write>(out: &mut W, rows: &[ReportRow]) -> io::Result<()> {
    writeln!(
        out,
        "Set\tNumCallers\tNumVars\tPctVars\tNumAnnotated\tPctAnnotated"
    )?;
    for row in rows {
        writeln!(
            out,
            "{}\t{}\t{}\t{:.2}\t{}\t{:.2}",
            row.set,
            callers_cell(row),
            row.num_variants,
            row.pct_variants,
            row.num_annotated,
            row.pct_annotated,
        )?;
    }
    out.flush()
}

/// Write a human-readable summary followed by an aligned table
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_text<W: Write>(
    out: &mut W,
    counters: &Counters,
    inference: Option<&Inference>,
    rows: &[ReportRow],
) -> io::Result<()> {
    writeln!(out, "Caller Set Statistics")?;
    writeln!(out, "{}", "=".repeat(60))?;
    writeln!(out, "  Variants in file:        {}", counters.variants)?;
    writeln!(out, "  Dropped (QUAL):          {}", counters.dropped_quality)?;
    writeln!(out, "  Dropped (effect):        {}", counters.dropped_effect)?;
    if counters.skipped_malformed > 0 {
        writeln!(out, "  Skipped (malformed):     {}", counters.skipped_malformed)?;
    }
    writeln!(out, "  Considered:              {}", counters.considered)?;
    writeln!(out, "  With ID:                 {}", counters.annotated)?;

    match inference {
        Some(Inference::Completed(summary)) => {
            writeln!(
                out,
                "  Inferred combinations:   {} expected, {} added",
                summary.expected, summary.missing
            )?;
        }
        Some(Inference::Skipped { reason }) => {
            writeln!(out, "  Inference skipped:       {reason}")?;
        }
        None => {}
    }

    let width = rows
        .iter()
        .map(|r| r.set.len())
        .max()
        .unwrap_or(0)
        .max("Set".len());

    writeln!(out)?;
    writeln!(
        out,
        "{:<width$}  {:>7}  {:>10}  {:>7}  {:>10}  {:>7}",
        "Set", "Callers", "Variants", "Pct", "With ID", "Pct"
    )?;
    writeln!(out, "{}", "-".repeat(width + 53))?;
    for row in rows {
        writeln!(
            out,
            "{:<width$}  {:>7}  {:>10}  {:>6.2}%  {:>10}  {:>6.2}%",
            row.set,
            callers_cell(row),
            row.num_variants,
            row.pct_variants,
            row.num_annotated,
            row.pct_annotated,
        )?;
    }
    out.flush()
}

/// Write summary counters, inference diagnostics and rows as pretty JSON
///
/// # Errors
///
/// Returns any error from serialization or the underlying writer.
pub fn write_json<W: Write>(
    out: &mut W,
    counters: &Counters,
    inference: Option<&Inference>,
    rows: &[ReportRow],
) -> io::Result<()> {
    let report = JsonReport {
        summary: counters,
        inference,
        sets: rows,
    };
    let text = serde_json::to_string_pretty(&report)?;
    writeln!(out, "{text}")?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::callerset::CallerSetKey;
    use crate::stats::tally::CallerSetTally;

    fn stats() -> SetStats {
        let mut tally = CallerSetTally::new();
        tally.record(CallerSetKey::canonicalize("varscan"), true);
        tally.record(CallerSetKey::canonicalize("gatk"), false);
        tally.record(CallerSetKey::canonicalize("gatk"), true);
        tally.record(CallerSetKey::FullIntersection, false);
        tally.ensure(CallerSetKey::canonicalize("freebayes"));
        SetStats {
            tally,
            counters: Counters {
                variants: 5,
                dropped_quality: 1,
                considered: 4,
                annotated: 2,
                ..Counters::default()
            },
        }
    }

    #[test]
    fn test_sort_by_count() {
        let rows = build_rows(&stats(), SortBy::Count);
        let sets: Vec<&str> = rows.iter().map(|r| r.set.as_str()).collect();
        assert_eq!(sets, vec!["gatk", "Intersection", "varscan", "freebayes"]);
    }

    #[test]
    fn test_sort_by_name() {
        let rows = build_rows(&stats(), SortBy::Name);
        let sets: Vec<&str> = rows.iter().map(|r| r.set.as_str()).collect();
        assert_eq!(sets, vec!["Intersection", "freebayes", "gatk", "varscan"]);
    }

    #[test]
    fn test_percentages() {
        let rows = build_rows(&stats(), SortBy::Count);
        let gatk = &rows[0];
        assert_eq!(gatk.num_callers, Some(1));
        assert!((gatk.pct_variants - 50.0).abs() < 1e-9);
        assert!((gatk.pct_annotated - 50.0).abs() < 1e-9);

        let intersection = &rows[1];
        assert_eq!(intersection.num_callers, None);

        let freebayes = &rows[3];
        assert_eq!(freebayes.num_variants, 0);
        assert!(freebayes.pct_annotated.abs() < f64::EPSILON);
    }

    #[test]
    fn test_write_tsv() {
        let rows = build_rows(&stats(), SortBy::Count);
        let mut out = Vec::new();
        write_tsv(&mut out, &rows).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "Set\tNumCallers\tNumVars\tPctVars\tNumAnnotated\tPctAnnotated"
        );
        assert_eq!(lines[1], "gatk\t1\t2\t50.00\t1\t50.00");
        assert_eq!(lines[2], "Intersection\t-\t1\t25.00\t0\t0.00");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_write_json() {
        let stats = stats();
        let rows = build_rows(&stats, SortBy::Name);
        let mut out = Vec::new();
        write_json(&mut out, &stats.counters, None, &rows).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["summary"]["considered"], 4);
        assert!(value.get("inference").is_none());
        assert_eq!(value["sets"][0]["set"], "Intersection");
        assert!(value["sets"][0]["num_callers"].is_null());
        assert_eq!(value["sets"][2]["num_variants"], 2);
    }

    #[test]
    fn test_write_text() {
        let stats = stats();
        let rows = build_rows(&stats, SortBy::Count);
        let mut out = Vec::new();
        write_text(&mut out, &stats.counters, None, &rows).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Variants in file:        5"));
        assert!(text.contains("Intersection"));
        assert!(!text.contains("Skipped (malformed)"));
    }
}
