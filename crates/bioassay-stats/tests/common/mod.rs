//! Shared helpers for analysis integration tests

#![allow(dead_code)]

use bioassay_io::{DataColumn, Table};
use std::path::PathBuf;

/// Get the path to a fixture file
pub fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_fixtures")
        .join(name)
        .to_string_lossy()
        .into_owned()
}

/// Single-strain dose-response table with one shared total
pub fn dose_response(strain: &str, concentration: &[f64], total: i64, dead: &[i64]) -> Table {
    Table::from_columns([
        (
            "strain",
            DataColumn::String(vec![strain.to_string(); concentration.len()]),
        ),
        ("concentration", DataColumn::Float64(concentration.to_vec())),
        ("total", DataColumn::Int64(vec![total; concentration.len()])),
        ("dead", DataColumn::Int64(dead.to_vec())),
    ])
    .unwrap()
}

/// Relative closeness check
pub fn assert_close(actual: f64, expected: f64, rel: f64) {
    let err = ((actual - expected) / expected).abs();
    assert!(
        err < rel,
        "expected {expected}, got {actual} (relative error {err})"
    );
}
