//! In-memory table of named, typed columns
//!
//! A `Table` is what every reader produces and what the analyzers consume.
//! It is immutable from the outside: deriving a column yields a new table,
//! so callers never see their data change underneath them.

use crate::schema::{ColumnDescriptor, ColumnType, DataColumn, DataSchema};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by column access and table construction
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TableError {
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Type mismatch for column '{column}': expected {expected}, got {actual}")]
    TypeMismatch {
        column: String,
        expected: String,
        actual: String,
    },

    #[error("Column '{column}' has {actual} rows, table has {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),
}

/// Result type for table operations
pub type TableResult<T> = Result<T, TableError>;

/// A column-oriented table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<DataColumn>,
    num_rows: usize,
}

impl Table {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(name, column)` pairs, in order
    pub fn from_columns<S: Into<String>>(
        columns: impl IntoIterator<Item = (S, DataColumn)>,
    ) -> TableResult<Self> {
        let mut table = Self::new();
        for (name, data) in columns {
            table.push_column(name.into(), data)?;
        }
        Ok(table)
    }

    fn push_column(&mut self, name: String, data: DataColumn) -> TableResult<()> {
        if self.names.iter().any(|n| *n == name) {
            return Err(TableError::DuplicateColumn(name));
        }
        if self.names.is_empty() {
            self.num_rows = data.len();
        } else if data.len() != self.num_rows {
            return Err(TableError::LengthMismatch {
                column: name,
                expected: self.num_rows,
                actual: data.len(),
            });
        }
        self.names.push(name);
        self.columns.push(data);
        Ok(())
    }

    /// Return a copy of this table with `name` added, or replaced if it
    /// already exists.
    pub fn with_column(&self, name: impl Into<String>, data: DataColumn) -> TableResult<Self> {
        let name = name.into();
        let mut table = self.clone();
        if let Some(idx) = table.names.iter().position(|n| *n == name) {
            if data.len() != table.num_rows {
                return Err(TableError::LengthMismatch {
                    column: name,
                    expected: table.num_rows,
                    actual: data.len(),
                });
            }
            table.columns[idx] = data;
        } else {
            table.push_column(name, data)?;
        }
        Ok(table)
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Number of columns
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.num_rows == 0
    }

    /// Column names, in order
    pub fn column_names(&self) -> Vec<&str> {
        self.names.iter().map(|s| s.as_str()).collect()
    }

    /// Check whether a column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Get a column by name
    pub fn column(&self, name: &str) -> TableResult<&DataColumn> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|idx| &self.columns[idx])
            .ok_or_else(|| TableError::ColumnNotFound(name.to_string()))
    }

    /// Get a numeric column as f64 values
    pub fn numeric_column(&self, name: &str) -> TableResult<Vec<f64>> {
        let column = self.column(name)?;
        column.to_f64().ok_or_else(|| TableError::TypeMismatch {
            column: name.to_string(),
            expected: "numeric".to_string(),
            actual: column.dtype().name().to_string(),
        })
    }

    /// Distinct values of a column as text, in first-seen order
    pub fn unique_labels(&self, name: &str) -> TableResult<Vec<String>> {
        let mut seen = Vec::new();
        for label in self.column(name)?.labels() {
            if !seen.contains(&label) {
                seen.push(label);
            }
        }
        Ok(seen)
    }

    /// Row indices where column `name` reads as `label`
    pub fn rows_matching(&self, name: &str, label: &str) -> TableResult<Vec<usize>> {
        let column = self.column(name)?;
        Ok((0..self.num_rows)
            .filter(|&i| column.label(i).as_deref() == Some(label))
            .collect())
    }

    /// Select the given rows into a new table, keeping every column
    pub fn take_rows(&self, rows: &[usize]) -> Self {
        let columns: Vec<DataColumn> = self.columns.iter().map(|c| c.take(rows)).collect();
        let num_rows = columns.first().map(|c| c.len()).unwrap_or(0);
        Self {
            names: self.names.clone(),
            columns,
            num_rows,
        }
    }

    /// Schema view of the table
    pub fn schema(&self) -> DataSchema {
        let columns = self
            .names
            .iter()
            .zip(&self.columns)
            .map(|(name, data)| ColumnDescriptor::new(name.clone(), data.dtype()))
            .collect();
        DataSchema::new(columns, self.num_rows)
    }

    /// Type of a column, if present
    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.column(name).ok().map(|c| c.dtype())
    }
}
