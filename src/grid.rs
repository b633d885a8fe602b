//! Decoding raw payload bytes into a uniform 2-D grid of cells.
//!
//! This is the tabular import boundary: workbook bytes go through calamine
//! (first sheet only), delimited text goes through the csv reader, and both
//! come out as the same `Grid` shape for the importer to consume.

use crate::error::{Error, Result};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;

/// The declared source format of a payload. Only date decoding differs
/// between the two: spreadsheet cells can carry date serials, delimited
/// text carries date strings.
#[derive(Debug, Clone, Copy, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Spreadsheet,
    Delimited,
}

serde_plain::derive_display_from_serialize!(SourceKind);
serde_plain::derive_fromstr_from_deserialize!(SourceKind);

/// One cell of the grid, as close to the source value as possible. Numeric
/// cells stay numeric so the importer can tell a date serial from text.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// The cell rendered as text; numbers use their shortest display form.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
        }
    }

    /// The cell as a number, parsing text cells leniently.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Empty => None,
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().trim_start_matches('$').replace(',', "").parse().ok(),
        }
    }

    fn from_text(s: &str) -> Self {
        if s.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Empty,
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Float(f) => Cell::Number(*f),
            Data::DateTime(dt) => Cell::Number(dt.as_f64()),
            Data::String(s) => Cell::from_text(s),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::from_text(s),
            Data::Bool(b) => Cell::Text(b.to_string()),
            Data::Error(e) => Cell::Text(format!("{e:?}")),
        }
    }
}

/// A raw 2-D grid: first row headers, remaining rows data.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub rows: Vec<Vec<Cell>>,
    pub kind: SourceKind,
}

impl Grid {
    pub fn new(rows: Vec<Vec<Cell>>, kind: SourceKind) -> Self {
        Self { rows, kind }
    }

    /// Decode workbook bytes (xlsx/xls/ods) into a grid from the first
    /// sheet. An unreadable workbook or one with no sheets is a payload
    /// error; nothing row-level is judged here.
    pub fn from_workbook_bytes(bytes: Vec<u8>) -> Result<Self> {
        let cursor = Cursor::new(bytes);
        let mut workbook = open_workbook_auto_from_rs(cursor)
            .map_err(|e| Error::MalformedPayload(format!("failed to open workbook: {e}")))?;

        let sheet_names = workbook.sheet_names().to_vec();
        let first = sheet_names
            .first()
            .ok_or_else(|| Error::MalformedPayload("workbook contains no sheets".to_string()))?
            .clone();

        let range = workbook
            .worksheet_range(&first)
            .map_err(|e| Error::MalformedPayload(format!("failed to read sheet '{first}': {e}")))?;

        let rows = range
            .rows()
            .map(|row| row.iter().map(Cell::from).collect())
            .collect();

        Ok(Self::new(rows, SourceKind::Spreadsheet))
    }

    /// Decode delimited text bytes into a grid. Every cell is text; the
    /// reader is flexible about ragged row lengths.
    pub fn from_delimited_bytes(bytes: Vec<u8>) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes.as_slice());

        let mut rows = Vec::new();
        for result in reader.records() {
            let record =
                result.map_err(|e| Error::MalformedPayload(format!("unreadable csv: {e}")))?;
            rows.push(record.iter().map(Cell::from_text).collect());
        }

        Ok(Self::new(rows, SourceKind::Delimited))
    }

    /// The header row rendered as text, empty when the grid has no rows.
    pub fn headers(&self) -> Vec<String> {
        self.rows
            .first()
            .map(|row| row.iter().map(Cell::as_text).collect())
            .unwrap_or_default()
    }

    /// The data rows (everything after the header row).
    pub fn data_rows(&self) -> &[Vec<Cell>] {
        if self.rows.is_empty() {
            &[]
        } else {
            &self.rows[1..]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delimited_decode() {
        let bytes = b"Date,Collected,Sold\n2024-01-01,10,8\n".to_vec();
        let grid = Grid::from_delimited_bytes(bytes).unwrap();
        assert_eq!(grid.kind, SourceKind::Delimited);
        assert_eq!(grid.headers(), vec!["Date", "Collected", "Sold"]);
        assert_eq!(grid.data_rows().len(), 1);
        assert_eq!(grid.data_rows()[0][1], Cell::Text("10".to_string()));
    }

    #[test]
    fn test_delimited_ragged_rows_are_kept() {
        let bytes = b"a,b,c\n1,2\n1,2,3,4\n".to_vec();
        let grid = Grid::from_delimited_bytes(bytes).unwrap();
        assert_eq!(grid.data_rows()[0].len(), 2);
        assert_eq!(grid.data_rows()[1].len(), 4);
    }

    #[test]
    fn test_blank_cells_are_empty() {
        let bytes = b"a,b\n,  \n".to_vec();
        let grid = Grid::from_delimited_bytes(bytes).unwrap();
        assert!(grid.data_rows()[0][0].is_empty());
        assert!(grid.data_rows()[0][1].is_empty());
    }

    #[test]
    fn test_workbook_garbage_is_malformed_payload() {
        let err = Grid::from_workbook_bytes(b"this is not a workbook".to_vec()).unwrap_err();
        assert!(matches!(err, crate::error::Error::MalformedPayload(_)));
    }

    #[test]
    fn test_cell_as_number() {
        assert_eq!(Cell::Number(12.5).as_number(), Some(12.5));
        assert_eq!(Cell::Text("$1,250.50".to_string()).as_number(), Some(1250.5));
        assert_eq!(Cell::Text("n/a".to_string()).as_number(), None);
        assert_eq!(Cell::Empty.as_number(), None);
    }

    #[test]
    fn test_cell_as_text_renders_whole_numbers_plainly() {
        assert_eq!(Cell::Number(44927.0).as_text(), "44927");
        assert_eq!(Cell::Number(2.5).as_text(), "2.5");
    }

    #[test]
    fn test_source_kind_round_trip() {
        use std::str::FromStr;
        assert_eq!(SourceKind::from_str("delimited").unwrap(), SourceKind::Delimited);
        assert_eq!(SourceKind::Spreadsheet.to_string(), "spreadsheet");
    }
}
