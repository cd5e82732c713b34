use std::collections::BTreeMap;

use metrics_core::models::DiscoveryValue;

use crate::workbook::{Cell, Sheet};

/// Header of the label column in the DISCOVERY export.
pub const LABEL_HEADER: &str = "Overall Performance";

/// Read the two-column "label → value" table.
///
/// The label comes from the `Overall Performance` column when the sheet has
/// one, otherwise from the first column. The value is the first other
/// non-blank cell of the row. Rows missing either side are skipped.
pub fn extract_discovery(sheet: &Sheet) -> BTreeMap<String, DiscoveryValue> {
    let headers = sheet.headers();
    let label_header = if headers.iter().any(|h| h == LABEL_HEADER) {
        LABEL_HEADER.to_string()
    } else {
        match headers.first() {
            Some(first) => first.clone(),
            None => return BTreeMap::new(),
        }
    };

    let mut table = BTreeMap::new();
    for record in sheet.records() {
        let Some(label) = record.get(&label_header).and_then(Cell::as_text) else {
            continue;
        };
        let value = record
            .iter()
            .find(|(header, _)| *header != label_header)
            .and_then(|(_, cell)| to_discovery_value(cell));
        if let Some(value) = value {
            table.insert(label.trim().to_string(), value);
        }
    }
    table
}

fn to_discovery_value(cell: &Cell) -> Option<DiscoveryValue> {
    match cell {
        Cell::Number(n) | Cell::Date(n) => Some(DiscoveryValue::Number(*n)),
        Cell::Text(s) if !s.trim().is_empty() => Some(DiscoveryValue::Text(s.trim().to_string())),
        Cell::Bool(b) => Some(DiscoveryValue::Text(b.to_string())),
        _ => None,
    }
}
