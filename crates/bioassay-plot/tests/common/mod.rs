//! Shared helpers for chart integration tests

#![allow(dead_code)]

use bioassay_io::{read_table, Table};
use std::path::PathBuf;

/// Get the path to a fixture file
pub fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_fixtures")
        .join(name)
        .to_string_lossy()
        .into_owned()
}

/// Load a fixture table
pub fn load(name: &str) -> Table {
    read_table(&fixture(name)).unwrap()
}

/// Absolute closeness check for float slices
pub fn assert_all_close(actual: &[f64], expected: &[f64], tol: f64) {
    assert_eq!(actual.len(), expected.len(), "length mismatch");
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < tol, "expected {expected:?}, got {actual:?}");
    }
}
