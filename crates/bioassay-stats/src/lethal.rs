//! Lethal-concentration (LCx) estimation from probit fits
//!
//! With Φ⁻¹(p) = β₀ + β₁x fitted on concentration, the LC for percentile
//! `v` is
//!
//! LC = exp((Φ⁻¹(v/100) − β₀) / β₁)
//!
//! The interval perturbs both coefficients by ±1.96 standard errors and
//! reuses the same formula:
//!
//! lower = exp((q − β₀ − 1.96·se₀) / (β₁ + 1.96·se₁))
//! upper = exp((q − β₀ + 1.96·se₀) / (β₁ − 1.96·se₁))
//!
//! This ignores the covariance between β₀ and β₁ and does not guarantee
//! `lower ≤ LC ≤ upper`; it is not a delta-method or fiducial interval.

use crate::distribution::normal_quantile;
use crate::error::{AnalysisError, AnalysisResult};
use crate::group::partition;
use crate::probit::{fit_probit_with, FitOptions, ProbitFit};
use bioassay_io::{DataColumn, Table};
use serde::{Deserialize, Serialize};

/// Derived column: proportion dead per row
pub const PROPORTION: &str = "proportion";

/// Label used for the single record of a pooled analysis
pub const POOLED_LABEL: &str = "All strains";

/// Two-sided 95% normal critical value used for the coefficient bounds
const Z_95: f64 = 1.96;

/// Options for the dose-response analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbitOptions {
    /// Mortality percentile to estimate (50 for LC50)
    pub lc_value: f64,

    /// Fit each strain separately instead of pooling all rows
    pub by_strain: bool,

    pub strain_column: String,
    pub concentration_column: String,
    pub total_column: String,
    pub dead_column: String,

    /// IRLS stopping rules
    pub fit: FitOptions,
}

impl Default for ProbitOptions {
    fn default() -> Self {
        Self {
            lc_value: 50.0,
            by_strain: true,
            strain_column: "strain".to_string(),
            concentration_column: "concentration".to_string(),
            total_column: "total".to_string(),
            dead_column: "dead".to_string(),
            fit: FitOptions::default(),
        }
    }
}

impl ProbitOptions {
    /// Set the LC percentile
    pub fn with_lc_value(mut self, lc_value: f64) -> Self {
        self.lc_value = lc_value;
        self
    }

    /// Pool all strains into one fit
    pub fn pooled(mut self) -> Self {
        self.by_strain = false;
        self
    }

    /// Set the strain column name
    pub fn with_strain_column(mut self, name: impl Into<String>) -> Self {
        self.strain_column = name.into();
        self
    }

    /// Set the concentration column name
    pub fn with_concentration_column(mut self, name: impl Into<String>) -> Self {
        self.concentration_column = name.into();
        self
    }

    /// Set the IRLS stopping rules
    pub fn with_fit_options(mut self, fit: FitOptions) -> Self {
        self.fit = fit;
        self
    }
}

/// LC estimate with its confidence bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LcEstimate {
    /// Percentile the estimate refers to
    pub lc_value: f64,
    /// Estimated concentration
    pub lc: f64,
    #[serde(rename = "CI_lower")]
    pub ci_lower: f64,
    #[serde(rename = "CI_upper")]
    pub ci_upper: f64,
}

impl LcEstimate {
    /// Label such as `LC50` or `LC12.5`
    pub fn label(&self) -> String {
        format!("LC{}", self.lc_value)
    }
}

/// Output of [`calculate_lc_probit`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LcResults {
    /// One estimate per strain, in first-seen strain order
    ByStrain(Vec<(String, LcEstimate)>),
    /// A single estimate over all rows
    Pooled(LcEstimate),
}

impl LcResults {
    /// Estimate for a strain (or for [`POOLED_LABEL`] when pooled)
    pub fn get(&self, strain: &str) -> Option<&LcEstimate> {
        self.iter().find(|(name, _)| *name == strain).map(|(_, e)| e)
    }

    /// `(label, estimate)` pairs; a pooled result is labelled [`POOLED_LABEL`]
    pub fn iter(&self) -> Box<dyn Iterator<Item = (&str, &LcEstimate)> + '_> {
        match self {
            LcResults::ByStrain(entries) => {
                Box::new(entries.iter().map(|(name, e)| (name.as_str(), e)))
            }
            LcResults::Pooled(e) => Box::new(std::iter::once((POOLED_LABEL, e))),
        }
    }

    /// Number of estimates
    pub fn len(&self) -> usize {
        match self {
            LcResults::ByStrain(entries) => entries.len(),
            LcResults::Pooled(_) => 1,
        }
    }

    /// Check if there are no estimates
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Return a copy of `table` with a `proportion = dead / total` column
pub fn with_proportion(
    table: &Table,
    total_column: &str,
    dead_column: &str,
) -> AnalysisResult<Table> {
    let totals = table.numeric_column(total_column)?;
    let deaths = table.numeric_column(dead_column)?;
    let proportion = deaths.iter().zip(&totals).map(|(d, t)| d / t).collect();
    Ok(table.with_column(PROPORTION, DataColumn::Float64(proportion))?)
}

/// Fit the probit model to every row of `table`
pub fn fit_table(table: &Table, options: &ProbitOptions) -> AnalysisResult<ProbitFit> {
    let data = with_proportion(table, &options.total_column, &options.dead_column)?;
    let dose = data.numeric_column(&options.concentration_column)?;
    let proportion = data.numeric_column(PROPORTION)?;
    fit_probit_with(&dose, &proportion, &options.fit)
}

/// LC estimate and interval from a fitted model
pub fn estimate_lc(fit: &ProbitFit, lc_value: f64) -> AnalysisResult<LcEstimate> {
    if !(lc_value > 0.0 && lc_value < 100.0) {
        return Err(AnalysisError::InvalidPercentile(lc_value));
    }
    if fit.slope == 0.0 {
        return Err(AnalysisError::ZeroSlope);
    }

    let q = normal_quantile(lc_value / 100.0);
    let (b0, b1) = (fit.intercept, fit.slope);
    let (se0, se1) = (fit.intercept_se, fit.slope_se);

    Ok(LcEstimate {
        lc_value,
        lc: ((q - b0) / b1).exp(),
        ci_lower: ((q - b0 - Z_95 * se0) / (b1 + Z_95 * se1)).exp(),
        ci_upper: ((q - b0 + Z_95 * se0) / (b1 - Z_95 * se1)).exp(),
    })
}

/// Estimate LC values by probit analysis, per strain or pooled.
///
/// A failing strain aborts the whole analysis; the error names the strain.
pub fn calculate_lc_probit(table: &Table, options: &ProbitOptions) -> AnalysisResult<LcResults> {
    if !(options.lc_value > 0.0 && options.lc_value < 100.0) {
        return Err(AnalysisError::InvalidPercentile(options.lc_value));
    }

    if !options.by_strain {
        let fit = fit_table(table, options)?;
        return Ok(LcResults::Pooled(estimate_lc(&fit, options.lc_value)?));
    }

    let mut results = Vec::new();
    for group in partition(table, &[options.strain_column.as_str()])? {
        let strain = group.name();
        let estimate = fit_table(&table.take_rows(&group.rows), options)
            .and_then(|fit| estimate_lc(&fit, options.lc_value))
            .map_err(|e| e.in_group(strain.clone()))?;
        tracing::debug!(
            "Strain '{}': {} = {:.4} ({:.4}, {:.4})",
            strain,
            estimate.label(),
            estimate.lc,
            estimate.ci_lower,
            estimate.ci_upper
        );
        results.push((strain, estimate));
    }

    Ok(LcResults::ByStrain(results))
}
