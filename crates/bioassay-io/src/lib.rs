//! bioassay-io - Tabular data I/O for bioassay records
//!
//! This crate loads bioassay count tables from the formats labs export:
//!
//! - **CSV / TSV**: delimited text with column type inference
//! - **XLSX / XLS**: spreadsheets (first worksheet, header row first)
//!
//! # Design
//!
//! All readers implement the `TableReader` trait and produce an in-memory
//! [`Table`] of typed columns. `load_bioassay_data` is the forgiving entry
//! point: it logs read failures and returns `None` instead of an error.

pub mod reader;
pub mod schema;
pub mod table;

#[cfg(feature = "csv")]
pub mod csv_reader;

#[cfg(feature = "excel")]
pub mod excel_reader;

pub use reader::*;
pub use schema::*;
pub use table::*;

#[cfg(feature = "csv")]
pub use csv_reader::{CsvOptions, CsvReader};

#[cfg(feature = "excel")]
pub use excel_reader::ExcelReader;
