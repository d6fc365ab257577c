//! Diagnostic-dose analysis
//!
//! Each group is one population exposed to a single discriminating
//! concentration. Mortality `p = dead / total` gets a two-sided Student-t
//! interval with `total - 1` degrees of freedom and standard error
//! `sqrt(p(1 - p) / total)`. All three outputs are percentages.
//!
//! Degenerate inputs are not special-cased: `total = 0` gives a NaN or
//! infinite mean and NaN bounds, and `p` of exactly 0 or 1 (zero standard
//! error) gives NaN bounds.

use crate::distribution::t_interval;
use crate::error::AnalysisResult;
use crate::group::partition;
use bioassay_io::{DataColumn, Table};
use serde::{Deserialize, Serialize};

/// Output column: mortality percentage
pub const MEAN_MORTALITY: &str = "mean_mortality";
/// Output column: lower interval bound (percent)
pub const CI_LOWER: &str = "ci_lower";
/// Output column: upper interval bound (percent)
pub const CI_UPPER: &str = "ci_upper";

/// Column names and confidence level for the diagnostic-dose analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticOptions {
    /// Column holding the number of insects tested
    pub total_column: String,

    /// Column holding the number of insects killed
    pub dead_column: String,

    /// Two-sided confidence level
    pub confidence: f64,
}

impl Default for DiagnosticOptions {
    fn default() -> Self {
        Self {
            total_column: "total".to_string(),
            dead_column: "dead".to_string(),
            confidence: 0.95,
        }
    }
}

impl DiagnosticOptions {
    /// Set the count column names
    pub fn with_columns(mut self, total: impl Into<String>, dead: impl Into<String>) -> Self {
        self.total_column = total.into();
        self.dead_column = dead.into();
        self
    }

    /// Set the confidence level
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }
}

/// Mortality and its confidence interval, all in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MortalityInterval {
    pub mean_mortality: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
}

/// Mortality interval for a single count pair
pub fn mortality_interval(total: f64, dead: f64, confidence: f64) -> MortalityInterval {
    let p = dead / total;
    let se = (p * (1.0 - p) / total).sqrt();
    let (lower, upper) = t_interval(confidence, total - 1.0, p, se);

    MortalityInterval {
        mean_mortality: p * 100.0,
        ci_lower: lower * 100.0,
        ci_upper: upper * 100.0,
    }
}

/// Analyze diagnostic-dose data grouped by `groupby_columns`.
///
/// Returns one row per group (first-seen order) holding the grouping
/// columns followed by `mean_mortality`, `ci_lower` and `ci_upper`.
pub fn analyze_diagnostic_dose(
    table: &Table,
    groupby_columns: &[&str],
    total_column: &str,
    dead_column: &str,
) -> AnalysisResult<Table> {
    let options = DiagnosticOptions::default().with_columns(total_column, dead_column);
    analyze_diagnostic_dose_with(table, groupby_columns, &options)
}

/// Analyze diagnostic-dose data with explicit options
pub fn analyze_diagnostic_dose_with(
    table: &Table,
    groupby_columns: &[&str],
    options: &DiagnosticOptions,
) -> AnalysisResult<Table> {
    let totals = table.numeric_column(&options.total_column)?;
    let deaths = table.numeric_column(&options.dead_column)?;
    let groups = partition(table, groupby_columns)?;

    let mut key_rows = Vec::with_capacity(groups.len());
    let mut means = Vec::with_capacity(groups.len());
    let mut lowers = Vec::with_capacity(groups.len());
    let mut uppers = Vec::with_capacity(groups.len());

    for group in &groups {
        if group.rows.len() > 1 {
            tracing::warn!(
                "Group '{}' has {} rows; using the counts of the last one",
                group.name(),
                group.rows.len()
            );
        }
        let row = group.last_row();
        let interval = mortality_interval(totals[row], deaths[row], options.confidence);
        tracing::debug!(
            "Group '{}': mortality {:.2}% [{:.2}, {:.2}]",
            group.name(),
            interval.mean_mortality,
            interval.ci_lower,
            interval.ci_upper
        );

        key_rows.push(group.first_row());
        means.push(interval.mean_mortality);
        lowers.push(interval.ci_lower);
        uppers.push(interval.ci_upper);
    }

    let mut columns = Vec::with_capacity(groupby_columns.len() + 3);
    for name in groupby_columns {
        columns.push((name.to_string(), table.column(name)?.take(&key_rows)));
    }
    columns.push((MEAN_MORTALITY.to_string(), DataColumn::Float64(means)));
    columns.push((CI_LOWER.to_string(), DataColumn::Float64(lowers)));
    columns.push((CI_UPPER.to_string(), DataColumn::Float64(uppers)));

    Ok(Table::from_columns(columns)?)
}
