//! CSV/TSV file reader with type inference

use crate::reader::{IoError, IoResult, TableReader};
use crate::schema::DataColumn;
use crate::table::Table;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Options for delimited text files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvOptions {
    /// Field delimiter
    pub delimiter: u8,

    /// Whether the first record holds column names
    pub has_header: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_header: true,
        }
    }
}

impl CsvOptions {
    /// Tab-delimited options
    pub fn tsv() -> Self {
        Self {
            delimiter: b'\t',
            ..Default::default()
        }
    }

    /// Set the delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set whether the file has a header row
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }
}

/// Delimited text reader
pub struct CsvReader {
    path: String,
    options: CsvOptions,
}

impl CsvReader {
    /// Open a comma-delimited file
    pub fn open(path: &str) -> IoResult<Self> {
        Self::open_with_options(path, CsvOptions::default())
    }

    /// Open a tab-delimited file
    pub fn open_tsv(path: &str) -> IoResult<Self> {
        Self::open_with_options(path, CsvOptions::tsv())
    }

    /// Open a delimited file with options
    pub fn open_with_options(path: &str, options: CsvOptions) -> IoResult<Self> {
        if !Path::new(path).exists() {
            return Err(IoError::FileNotFound(path.to_string()));
        }

        Ok(Self {
            path: path.to_string(),
            options,
        })
    }

    /// The options this reader was opened with
    pub fn options(&self) -> CsvOptions {
        self.options
    }
}

impl TableReader for CsvReader {
    fn read_table(&self) -> IoResult<Table> {
        let file = File::open(&self.path).map_err(|e| IoError::OpenFailed(e.to_string()))?;
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.options.delimiter)
            .has_headers(self.options.has_header)
            .trim(csv::Trim::All)
            .from_reader(BufReader::new(file));

        let mut headers: Vec<String> = if self.options.has_header {
            reader
                .headers()
                .map_err(|e| IoError::InvalidFormat(e.to_string()))?
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    if name.is_empty() {
                        format!("Unnamed: {}", i)
                    } else {
                        name.to_string()
                    }
                })
                .collect()
        } else {
            Vec::new()
        };

        let mut values: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        for result in reader.records() {
            let record = result.map_err(|e| IoError::InvalidFormat(e.to_string()))?;
            if headers.is_empty() {
                // Generate column names from the first record's width
                headers = (0..record.len()).map(|i| format!("col_{}", i)).collect();
                values = vec![Vec::new(); headers.len()];
            }
            for (i, value) in record.iter().enumerate() {
                if i < values.len() {
                    values[i].push(value.to_string());
                }
            }
        }

        if headers.is_empty() {
            return Err(IoError::InvalidFormat("no columns".to_string()));
        }

        let columns = headers
            .into_iter()
            .zip(values)
            .map(|(name, raw)| (name, build_column(raw)));
        Ok(Table::from_columns(columns)?)
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn format_name(&self) -> &'static str {
        if self.options.delimiter == b'\t' {
            "TSV"
        } else {
            "CSV"
        }
    }
}

/// Type a column of raw cells, narrowest type first.
///
/// Whole numbers become `Int64` unless a cell is blank, in which case the
/// column becomes `Float64` with NaN gaps. `true`/`false` (any case) with
/// no blanks become `Bool`. Anything else stays text.
fn build_column(raw: Vec<String>) -> DataColumn {
    let present = raw.iter().filter(|s| !s.is_empty()).count();
    if present == 0 {
        return DataColumn::String(raw);
    }
    let complete = present == raw.len();

    if complete {
        if let Ok(ints) = raw.iter().map(|s| s.parse::<i64>()).collect::<Result<Vec<_>, _>>() {
            return DataColumn::Int64(ints);
        }
    }

    let floats: Option<Vec<f64>> = raw
        .iter()
        .map(|s| {
            if s.is_empty() {
                Some(f64::NAN)
            } else {
                s.parse::<f64>().ok()
            }
        })
        .collect();
    if let Some(floats) = floats {
        return DataColumn::Float64(floats);
    }

    if complete {
        let bools: Option<Vec<bool>> = raw
            .iter()
            .map(|s| match s.to_ascii_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            })
            .collect();
        if let Some(bools) = bools {
            return DataColumn::Bool(bools);
        }
    }

    DataColumn::String(raw)
}
