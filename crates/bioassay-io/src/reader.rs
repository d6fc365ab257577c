//! Table reader trait and extension-based format dispatch
//!
//! The `TableReader` trait provides a uniform interface over the
//! supported bioassay file formats.

use crate::table::{Table, TableError};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during I/O operations
#[derive(Debug, Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to open file: {0}")]
    OpenFailed(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Table(#[from] TableError),
}

/// Result type for I/O operations
pub type IoResult<T> = Result<T, IoError>;

/// Trait for reading a whole file into a [`Table`]
pub trait TableReader: Send + Sync {
    /// Read every record of the file
    fn read_table(&self) -> IoResult<Table>;

    /// Get the file path
    fn path(&self) -> &str;

    /// Get the format name
    fn format_name(&self) -> &'static str;
}

/// A boxed reader for dynamic dispatch
pub type BoxedReader = Box<dyn TableReader>;

/// File formats recognised by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// `.xlsx` / `.xls`
    Excel,
    /// `.csv`
    Csv,
    /// `.tsv`
    Tsv,
}

impl FileFormat {
    /// Detect the format from a path's extension, ignoring case
    pub fn from_path(path: &str) -> IoResult<Self> {
        let extension = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "xlsx" | "xls" => Ok(FileFormat::Excel),
            "csv" => Ok(FileFormat::Csv),
            "tsv" => Ok(FileFormat::Tsv),
            "" => Err(IoError::UnsupportedFormat(format!(
                "no file extension in {}",
                path
            ))),
            other => Err(IoError::UnsupportedFormat(format!(".{}", other))),
        }
    }
}

/// Open a file and return an appropriate reader
///
/// The format is auto-detected from the file extension.
pub fn open_file(path: &str) -> IoResult<BoxedReader> {
    match FileFormat::from_path(path)? {
        #[cfg(feature = "excel")]
        FileFormat::Excel => {
            use crate::excel_reader::ExcelReader;
            Ok(Box::new(ExcelReader::open(path)?))
        }

        #[cfg(feature = "csv")]
        FileFormat::Csv => {
            use crate::csv_reader::CsvReader;
            Ok(Box::new(CsvReader::open(path)?))
        }

        #[cfg(feature = "csv")]
        FileFormat::Tsv => {
            use crate::csv_reader::CsvReader;
            Ok(Box::new(CsvReader::open_tsv(path)?))
        }

        #[allow(unreachable_patterns)]
        format => Err(IoError::UnsupportedFormat(format!(
            "{:?} support is not compiled in",
            format
        ))),
    }
}

/// Read a file into a table, propagating any failure
pub fn read_table(path: &str) -> IoResult<Table> {
    let reader = open_file(path)?;
    let table = reader.read_table()?;
    tracing::debug!(
        "Loaded {} rows x {} columns from {} ({})",
        table.num_rows(),
        table.num_columns(),
        reader.path(),
        reader.format_name()
    );
    Ok(table)
}

/// Load bioassay data from an Excel, CSV or TSV file.
///
/// Any failure is logged and reported as `None`; callers must check for it.
pub fn load_bioassay_data(path: &str) -> Option<Table> {
    match read_table(path) {
        Ok(table) => Some(table),
        Err(e) => {
            tracing::error!("Error loading file: {}", e);
            None
        }
    }
}

/// List supported file extensions
pub fn supported_extensions() -> Vec<&'static str> {
    let mut extensions = Vec::new();

    #[cfg(feature = "excel")]
    {
        extensions.push("xlsx");
        extensions.push("xls");
    }

    #[cfg(feature = "csv")]
    {
        extensions.push("csv");
        extensions.push("tsv");
    }

    extensions
}
