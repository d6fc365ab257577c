//! Spreadsheet reader (XLSX/XLS) backed by calamine
//!
//! Reads the first worksheet. The first used row holds the column names;
//! every following row is a record.

use crate::reader::{IoError, IoResult, TableReader};
use crate::schema::DataColumn;
use crate::table::Table;
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

/// Spreadsheet file reader
pub struct ExcelReader {
    path: String,
}

impl ExcelReader {
    /// Open a spreadsheet file
    pub fn open(path: &str) -> IoResult<Self> {
        if !Path::new(path).exists() {
            return Err(IoError::FileNotFound(path.to_string()));
        }

        Ok(Self {
            path: path.to_string(),
        })
    }
}

impl TableReader for ExcelReader {
    fn read_table(&self) -> IoResult<Table> {
        let mut workbook =
            open_workbook_auto(&self.path).map_err(|e| IoError::OpenFailed(e.to_string()))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| IoError::InvalidFormat("workbook has no worksheets".to_string()))?
            .map_err(|e| IoError::InvalidFormat(e.to_string()))?;

        let mut rows = range.rows();
        let headers: Vec<String> = match rows.next() {
            Some(header) => header
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    let name = cell.to_string().trim().to_string();
                    if name.is_empty() {
                        format!("Unnamed: {}", i)
                    } else {
                        name
                    }
                })
                .collect(),
            None => return Err(IoError::InvalidFormat("no columns".to_string())),
        };

        let mut cells: Vec<Vec<Cell>> = vec![Vec::new(); headers.len()];
        for row in rows {
            for (i, column) in cells.iter_mut().enumerate() {
                column.push(row.get(i).map(Cell::from_data).unwrap_or(Cell::Missing));
            }
        }

        let columns = headers
            .into_iter()
            .zip(cells)
            .map(|(name, column)| (name, build_column(&column)));
        Ok(Table::from_columns(columns)?)
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn format_name(&self) -> &'static str {
        "Excel"
    }
}

/// A worksheet cell reduced to the shapes a table column can hold
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Missing,
    Number(f64),
    Bool(bool),
    Text(String),
}

impl Cell {
    fn from_data(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Missing,
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Float(f) => Cell::Number(*f),
            Data::Bool(b) => Cell::Bool(*b),
            Data::String(s) if s.trim().is_empty() => Cell::Missing,
            Data::String(s) => Cell::Text(s.trim().to_string()),
            other => Cell::Text(other.to_string()),
        }
    }

    fn as_text(&self) -> String {
        match self {
            Cell::Missing => String::new(),
            Cell::Number(n) => n.to_string(),
            Cell::Bool(b) => b.to_string(),
            Cell::Text(s) => s.clone(),
        }
    }
}

/// Choose the narrowest column type that holds every cell.
///
/// Whole-number columns become `Int64` unless a cell is missing, numeric
/// columns with gaps become `Float64` with NaN gaps.
fn build_column(cells: &[Cell]) -> DataColumn {
    let present: Vec<&Cell> = cells.iter().filter(|c| **c != Cell::Missing).collect();
    let has_missing = present.len() < cells.len();

    if !present.is_empty() && present.iter().all(|c| matches!(c, Cell::Number(_))) {
        let numbers: Vec<f64> = cells
            .iter()
            .map(|c| match c {
                Cell::Number(n) => *n,
                _ => f64::NAN,
            })
            .collect();
        let integral = numbers
            .iter()
            .all(|n| n.fract() == 0.0 && n.abs() < i64::MAX as f64);
        if !has_missing && integral {
            return DataColumn::Int64(numbers.iter().map(|&n| n as i64).collect());
        }
        return DataColumn::Float64(numbers);
    }

    if !present.is_empty() && !has_missing && present.iter().all(|c| matches!(c, Cell::Bool(_)))
    {
        return DataColumn::Bool(cells.iter().map(|c| *c == Cell::Bool(true)).collect());
    }

    DataColumn::String(cells.iter().map(Cell::as_text).collect())
}
