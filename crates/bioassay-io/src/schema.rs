//! Column model for bioassay tables
//!
//! Counts (`total`, `dead`) usually arrive as `Int64`, concentrations as
//! `Float64` and grouping attributes as `String`. Missing numeric cells
//! are NaN, which only a `Float64` column can hold.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Element type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    Float64,
    Int64,
    Bool,
    String,
}

impl ColumnType {
    /// Whether analyzers can read this column as numbers
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Float64 | ColumnType::Int64)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ColumnType::Float64 => "float64",
            ColumnType::Int64 => "int64",
            ColumnType::Bool => "bool",
            ColumnType::String => "string",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Typed column storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataColumn {
    Float64(Vec<f64>),
    Int64(Vec<i64>),
    Bool(Vec<bool>),
    String(Vec<String>),
}

/// Apply the same expression to whichever vector a column holds
macro_rules! with_values {
    ($column:expr, $values:ident => $body:expr) => {
        match $column {
            DataColumn::Float64($values) => $body,
            DataColumn::Int64($values) => $body,
            DataColumn::Bool($values) => $body,
            DataColumn::String($values) => $body,
        }
    };
}

impl DataColumn {
    pub fn dtype(&self) -> ColumnType {
        match self {
            DataColumn::Float64(_) => ColumnType::Float64,
            DataColumn::Int64(_) => ColumnType::Int64,
            DataColumn::Bool(_) => ColumnType::Bool,
            DataColumn::String(_) => ColumnType::String,
        }
    }

    pub fn len(&self) -> usize {
        with_values!(self, values => values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numeric view of the column; `None` for bool and text columns
    pub fn to_f64(&self) -> Option<Vec<f64>> {
        match self {
            DataColumn::Float64(values) => Some(values.clone()),
            DataColumn::Int64(values) => Some(values.iter().map(|&n| n as f64).collect()),
            DataColumn::Bool(_) | DataColumn::String(_) => None,
        }
    }

    /// Whether the cell at `row` is a gap (NaN or empty text)
    pub fn is_missing(&self, row: usize) -> bool {
        match self {
            DataColumn::Float64(values) => values.get(row).map_or(true, |v| v.is_nan()),
            DataColumn::String(values) => values.get(row).map_or(true, |s| s.is_empty()),
            other => row >= other.len(),
        }
    }

    /// Text form of the value at `row`, used as a grouping key and legend name
    pub fn label(&self, row: usize) -> Option<String> {
        match self {
            DataColumn::String(values) => values.get(row).cloned(),
            other => with_values!(other, values => values.get(row).map(|v| v.to_string())),
        }
    }

    /// Text form of every value
    pub fn labels(&self) -> Vec<String> {
        (0..self.len()).filter_map(|row| self.label(row)).collect()
    }

    /// Gather the given rows into a new column of the same type.
    ///
    /// Indices past the end are skipped.
    pub fn take(&self, rows: &[usize]) -> DataColumn {
        fn gather<T: Clone>(values: &[T], rows: &[usize]) -> Vec<T> {
            rows.iter().filter_map(|&i| values.get(i).cloned()).collect()
        }

        match self {
            DataColumn::Float64(values) => DataColumn::Float64(gather(values, rows)),
            DataColumn::Int64(values) => DataColumn::Int64(gather(values, rows)),
            DataColumn::Bool(values) => DataColumn::Bool(gather(values, rows)),
            DataColumn::String(values) => DataColumn::String(gather(values, rows)),
        }
    }
}

impl From<Vec<f64>> for DataColumn {
    fn from(values: Vec<f64>) -> Self {
        DataColumn::Float64(values)
    }
}

impl From<Vec<i64>> for DataColumn {
    fn from(values: Vec<i64>) -> Self {
        DataColumn::Int64(values)
    }
}

impl From<Vec<bool>> for DataColumn {
    fn from(values: Vec<bool>) -> Self {
        DataColumn::Bool(values)
    }
}

impl From<Vec<String>> for DataColumn {
    fn from(values: Vec<String>) -> Self {
        DataColumn::String(values)
    }
}

impl From<Vec<&str>> for DataColumn {
    fn from(values: Vec<&str>) -> Self {
        DataColumn::String(values.into_iter().map(String::from).collect())
    }
}

/// Name and type of one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub dtype: ColumnType,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, dtype: ColumnType) -> Self {
        Self {
            name: name.into(),
            dtype,
        }
    }
}

/// Shape of a loaded table: its columns in file order and its row count
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSchema {
    pub columns: Vec<ColumnDescriptor>,
    pub num_records: usize,
}

impl DataSchema {
    pub fn new(columns: Vec<ColumnDescriptor>, num_records: usize) -> Self {
        Self {
            columns,
            num_records,
        }
    }

    /// Descriptor of the named column
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Names of the columns an analyzer can read as numbers
    pub fn numeric_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.dtype.is_numeric())
            .map(|c| c.name.as_str())
            .collect()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }
}
