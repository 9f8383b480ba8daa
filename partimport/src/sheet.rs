//! Spreadsheet source: a rectangular grid of cell texts.
//!
//! Workbooks (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`) are read with
//! calamine; `.csv` files with the csv crate. Only cell *text* matters to the
//! import, so every cell is converted to the string a user would see.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Worksheet not found: {0}")]
    MissingWorksheet(String),

    #[error("Workbook has no worksheets")]
    Empty,
}

const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Open a spreadsheet file. `worksheet` selects a sheet by name; the
    /// first sheet is used otherwise. CSV files have a single sheet and
    /// ignore the name.
    pub fn open(path: &Path, worksheet: Option<&str>) -> Result<Self, SheetError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        if ext == "csv" {
            return Self::open_csv(path);
        }
        if WORKBOOK_EXTENSIONS.contains(&ext.as_str()) {
            return Self::open_workbook(path, worksheet);
        }
        Err(SheetError::UnsupportedFormat(format!(
            "{} (expected .csv or one of {})",
            path.display(),
            WORKBOOK_EXTENSIONS.join(", ")
        )))
    }

    fn open_workbook(path: &Path, worksheet: Option<&str>) -> Result<Self, SheetError> {
        let mut workbook = open_workbook_auto(path)?;

        let name = match worksheet {
            Some(name) => {
                if !workbook.sheet_names().iter().any(|n| n == name) {
                    return Err(SheetError::MissingWorksheet(name.to_string()));
                }
                name.to_string()
            }
            None => workbook
                .sheet_names()
                .first()
                .cloned()
                .ok_or(SheetError::Empty)?,
        };

        let range = workbook.worksheet_range(&name)?;
        let rows = range
            .rows()
            .map(|row| row.iter().map(cell_text).collect())
            .collect();
        let rows = anchor_at_origin(rows, range.start().unwrap_or((0, 0)));

        tracing::debug!("Read worksheet '{}' from {}", name, path.display());
        Ok(Self { rows })
    }

    fn open_csv(path: &Path) -> Result<Self, SheetError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(Self { rows })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Text of a cell; cells outside the used range read as empty.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Pad a used range that starts at `(row, col)` back out to A1 so column
/// positions stay absolute.
fn anchor_at_origin(rows: Vec<Vec<String>>, start: (u32, u32)) -> Vec<Vec<String>> {
    let (first_row, first_col) = (start.0 as usize, start.1 as usize);
    let mut anchored = vec![Vec::new(); first_row];
    anchored.extend(rows.into_iter().map(|row| {
        let mut padded = vec![String::new(); first_col];
        padded.extend(row);
        padded
    }));
    anchored
}

/// Convert a workbook cell to its displayed text.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            // Whole numbers display without a fractional part
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Bool(true) => "TRUE".to_string(),
        Data::Bool(false) => "FALSE".to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#{:?}", e),
    }
}
