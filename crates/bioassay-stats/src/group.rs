//! Row partitioning by key columns
//!
//! Groups are reported in the order their key is first seen, and rows
//! within a group keep their table order.

use crate::error::{AnalysisError, AnalysisResult};
use bioassay_io::Table;
use std::collections::HashMap;

/// One group of rows sharing the same key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Key values, one per grouping column
    pub key: Vec<String>,

    /// Row indices belonging to this group
    pub rows: Vec<usize>,
}

impl Group {
    /// Display name of the group (key values joined by ", ")
    pub fn name(&self) -> String {
        self.key.join(", ")
    }

    /// First row of the group
    pub fn first_row(&self) -> usize {
        self.rows[0]
    }

    /// Last row of the group
    pub fn last_row(&self) -> usize {
        self.rows[self.rows.len() - 1]
    }
}

/// Partition table rows by the distinct combinations of `by` columns
pub fn partition(table: &Table, by: &[&str]) -> AnalysisResult<Vec<Group>> {
    if by.is_empty() {
        return Err(AnalysisError::NoGroupColumns);
    }

    let columns = by
        .iter()
        .map(|name| table.column(name))
        .collect::<Result<Vec<_>, _>>()?;

    let mut groups: Vec<Group> = Vec::new();
    let mut index: HashMap<Vec<String>, usize> = HashMap::new();

    let mut skipped = 0usize;
    for row in 0..table.num_rows() {
        // Rows with a blank key cell belong to no group
        if columns.iter().any(|c| c.is_missing(row)) {
            skipped += 1;
            continue;
        }

        let key: Vec<String> = columns
            .iter()
            .map(|c| c.label(row).unwrap_or_default())
            .collect();

        match index.get(&key) {
            Some(&g) => groups[g].rows.push(row),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(Group {
                    key,
                    rows: vec![row],
                });
            }
        }
    }

    if skipped > 0 {
        tracing::debug!("Dropped {} rows with a missing group key", skipped);
    }

    Ok(groups)
}
