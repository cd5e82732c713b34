//! Workbook reader.
//!
//! Opens an exported `.xlsx` workbook from raw bytes with [`calamine`] and
//! exposes each sheet either as positional rows (anchored at cell A1) or as
//! header-mapped records, the two shapes the sheet extractors consume.

use std::collections::HashSet;
use std::fmt;
use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::NaiveDate;
use metrics_core::error::{MetricsError, Result};
use metrics_core::time_utils::{excel_serial_to_date, parse_date_str};
use tracing::debug;

// ── Cell ──────────────────────────────────────────────────────────────────────

/// A single spreadsheet cell value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// A date-formatted cell, held as its spreadsheet serial.
    Date(f64),
}

impl Cell {
    /// `true` for empty cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// `true` when this is a text cell exactly equal to `literal`.
    pub fn is_text(&self, literal: &str) -> bool {
        matches!(self, Cell::Text(s) if s == literal)
    }

    /// Display text of the cell; `None` for empty cells.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => Some(s.clone()),
            Cell::Number(n) | Cell::Date(n) => Some(format_plain_number(*n)),
            Cell::Bool(b) => Some(b.to_string()),
        }
    }

    /// Numeric value; text is parsed after dropping thousands separators.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) | Cell::Date(n) => Some(*n).filter(|n| n.is_finite()),
            Cell::Text(s) => s
                .trim()
                .replace(',', "")
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite()),
            Cell::Empty | Cell::Bool(_) => None,
        }
    }

    /// Non-negative whole count; anything non-numeric is 0.
    pub fn as_count(&self) -> u64 {
        self.as_number()
            .filter(|n| *n > 0.0)
            .map(|n| n.round() as u64)
            .unwrap_or(0)
    }

    /// Integer prefix of the cell, clamped at 0.
    ///
    /// Numbers are truncated; text yields its leading run of digits after
    /// optional whitespace and sign (`"1,234"` → 1, `"12 likes"` → 12). Text
    /// without a leading digit is 0.
    pub fn as_int_prefix(&self) -> u64 {
        match self {
            Cell::Number(n) | Cell::Date(n) if n.is_finite() && *n > 0.0 => n.trunc() as u64,
            Cell::Text(s) => {
                let s = s.trim_start();
                let (negative, digits) = match s.as_bytes().first() {
                    Some(b'-') => (true, &s[1..]),
                    Some(b'+') => (false, &s[1..]),
                    _ => (false, s),
                };
                let end = digits
                    .find(|c: char| !c.is_ascii_digit())
                    .unwrap_or(digits.len());
                if negative {
                    return 0;
                }
                digits[..end].parse::<u64>().unwrap_or(0)
            }
            _ => 0,
        }
    }

    /// Coerce the cell to a calendar date.
    ///
    /// Date cells and numbers are read as spreadsheet serials, text is parsed
    /// as a generic date string. Anything else is "no date".
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::Date(serial) | Cell::Number(serial) => excel_serial_to_date(*serial),
            Cell::Text(s) => parse_date_str(s),
            Cell::Empty | Cell::Bool(_) => None,
        }
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty | Data::Error(_) => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::Float(f) => Cell::Number(*f),
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Bool(b) => Cell::Bool(*b),
            Data::DateTime(dt) => Cell::Date(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text().unwrap_or_default())
    }
}

/// Integers print without a fractional part, like a spreadsheet would.
fn format_plain_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

// ── Record ────────────────────────────────────────────────────────────────────

/// One data row keyed by the sheet's header row.
///
/// Only non-blank cells are kept, in column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    cells: Vec<(String, Cell)>,
}

impl Record {
    /// Cell under `header`, if present in this row.
    pub fn get(&self, header: &str) -> Option<&Cell> {
        self.cells
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, cell)| cell)
    }

    /// Present cells in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.cells.iter().map(|(h, c)| (h.as_str(), c))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

// ── Sheet ─────────────────────────────────────────────────────────────────────

/// A named sheet held as a dense grid anchored at A1.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    name: String,
    rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw positional rows; row 0 is spreadsheet row 1.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Cell at `(row, col)`, `Empty` when outside the grid.
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        const EMPTY: &Cell = &Cell::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(EMPTY)
    }

    /// Column headers taken from the first non-blank row.
    ///
    /// Blank header cells are named `__EMPTY`, `__EMPTY_1`, …; repeated names
    /// get a `_1`, `_2`, … suffix.
    pub fn headers(&self) -> Vec<String> {
        self.header_row_index()
            .map(|idx| dedupe_headers(&self.rows[idx]))
            .unwrap_or_default()
    }

    /// Rows below the header row as header-keyed records.
    ///
    /// Rows with no non-blank cell are skipped.
    pub fn records(&self) -> Vec<Record> {
        let Some(header_idx) = self.header_row_index() else {
            return Vec::new();
        };
        let headers = dedupe_headers(&self.rows[header_idx]);

        self.rows[header_idx + 1..]
            .iter()
            .filter_map(|row| {
                let cells: Vec<(String, Cell)> = row
                    .iter()
                    .enumerate()
                    .filter(|(_, cell)| !cell.is_blank())
                    .filter_map(|(col, cell)| {
                        headers.get(col).map(|h| (h.clone(), cell.clone()))
                    })
                    .collect();
                (!cells.is_empty()).then_some(Record { cells })
            })
            .collect()
    }

    fn header_row_index(&self) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| row.iter().any(|cell| !cell.is_blank()))
    }
}

fn dedupe_headers(row: &[Cell]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    row.iter()
        .map(|cell| {
            let base = if cell.is_blank() {
                "__EMPTY".to_string()
            } else {
                cell.to_string()
            };
            let mut name = base.clone();
            let mut n = 1;
            while seen.contains(&name) {
                name = format!("{}_{}", base, n);
                n += 1;
            }
            seen.insert(name.clone());
            name
        })
        .collect()
}

// ── Workbook ──────────────────────────────────────────────────────────────────

/// All sheets of one uploaded workbook.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    /// Build a workbook from already-materialised sheets.
    pub fn from_sheets(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    /// Open a workbook from raw file bytes (xlsx, xls, ods, …).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
            .map_err(|e| MetricsError::Workbook(e.to_string()))?;

        let mut sheets = Vec::new();
        for name in reader.sheet_names() {
            let range = reader
                .worksheet_range(&name)
                .map_err(|e| MetricsError::Workbook(format!("sheet {}: {}", name, e)))?;

            // calamine ranges start at the first used cell; pad back to A1.
            let (start_row, start_col) = range.start().unwrap_or((0, 0));
            let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); start_row as usize];
            for data_row in range.rows() {
                let mut row = vec![Cell::Empty; start_col as usize];
                row.extend(data_row.iter().map(Cell::from));
                rows.push(row);
            }

            debug!("sheet {}: {} rows", name, rows.len());
            sheets.push(Sheet::new(name, rows));
        }

        Ok(Self { sheets })
    }

    /// Names of all sheets, in workbook order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(Sheet::name).collect()
    }

    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheets.iter().any(|s| s.name == name)
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Fail with [`MetricsError::MissingSheets`] naming every absent sheet.
    pub fn require_sheets(&self, required: &[&str]) -> Result<()> {
        let missing: Vec<String> = required
            .iter()
            .filter(|name| !self.has_sheet(name))
            .map(|name| name.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(MetricsError::MissingSheets(missing))
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
