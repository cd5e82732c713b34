use metrics_core::models::{DemographicEntry, MAX_DEMOGRAPHICS};

use crate::workbook::{Cell, Sheet};

/// Category value selecting the job-title rows.
pub const JOB_TITLES: &str = "Job titles";

/// Keep the first [`MAX_DEMOGRAPHICS`] job-title rows that carry both a label
/// and a parseable percentage, in source order.
pub fn extract_demographics(sheet: &Sheet) -> Vec<DemographicEntry> {
    sheet
        .records()
        .iter()
        .filter(|record| {
            record
                .get("Top Demographics")
                .is_some_and(|c| c.is_text(JOB_TITLES))
        })
        .filter_map(|record| {
            let label = record.get("Value").and_then(Cell::as_text)?;
            let percentage = record.get("Percentage").and_then(parse_percentage)?;
            Some(DemographicEntry { label, percentage })
        })
        .take(MAX_DEMOGRAPHICS)
        .collect()
}

/// Numeric percentage from a cell, stripping one trailing `%` from text.
pub fn parse_percentage(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Number(n) => Some(*n).filter(|n| n.is_finite()),
        Cell::Text(s) => {
            let s = s.trim();
            let s = s.strip_suffix('%').unwrap_or(s).trim();
            s.parse::<f64>().ok().filter(|n| n.is_finite())
        }
        _ => None,
    }
}
