//! Spreadsheet row to [`Entry`] mapping.

use serde::{Deserialize, Serialize};

use crate::parser::location::{self, Point};
use crate::sheet::Sheet;

/// Fixed column positions of a parts list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnIndex {
    PartNumber = 0,
    Manufacturer,
    Assembly,
    Symbol,
    Location,
    Description1,
    Description2,
    Description3,
}

impl ColumnIndex {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// One validated parts-list row, ready to be placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub part_number: String,
    pub manufacturer: String,
    pub assembly: String,
    pub symbol: String,
    pub description1: String,
    pub description2: String,
    pub description3: String,
    pub location: Point,
}

impl Entry {
    pub fn x(&self) -> f64 {
        self.location.x
    }

    pub fn y(&self) -> f64 {
        self.location.y
    }
}

/// Map one row of cell texts to an entry.
///
/// Missing cells read as empty. Returns `None` unless the symbol is
/// non-blank and the location cell holds a coordinate pair.
pub fn parse_row<S: AsRef<str>>(row: &[S]) -> Option<Entry> {
    let cell = |col: ColumnIndex| row.get(col.index()).map(|s| s.as_ref());
    let text = |col: ColumnIndex| cell(col).unwrap_or("").trim().to_string();

    let symbol = text(ColumnIndex::Symbol);
    if symbol.is_empty() {
        return None;
    }
    let location = location::extract(cell(ColumnIndex::Location))?;

    Some(Entry {
        part_number: text(ColumnIndex::PartNumber),
        manufacturer: text(ColumnIndex::Manufacturer),
        assembly: text(ColumnIndex::Assembly),
        symbol,
        description1: text(ColumnIndex::Description1),
        description2: text(ColumnIndex::Description2),
        description3: text(ColumnIndex::Description3),
        location,
    })
}

/// Entries parsed from a sheet plus how many data rows were discarded.
#[derive(Debug, Clone, Default)]
pub struct ParsedSheet {
    pub entries: Vec<Entry>,
    pub rows_read: usize,
    pub rows_skipped: usize,
}

/// Parse every data row of a sheet. Row 0 is the header and is skipped.
pub fn parse_sheet(sheet: &Sheet) -> ParsedSheet {
    let mut parsed = ParsedSheet::default();
    for row in sheet.rows().skip(1) {
        parsed.rows_read += 1;
        match parse_row(row) {
            Some(entry) => parsed.entries.push(entry),
            None => parsed.rows_skipped += 1,
        }
    }
    parsed
}
