//! Binomial GLM with probit link, fitted by iteratively reweighted least
//! squares (IRLS)
//!
//! The response is the observed proportion dead in each row, each row
//! weighted equally. The dispersion is fixed at 1, so the coefficient
//! covariance is the inverse Fisher information.
//!
//! # Algorithm
//!
//! Start from μ = (y + 0.5) / 2 and η = Φ⁻¹(μ). Each iteration solves
//!
//! (XᵀWX) β = XᵀWz,  w = φ(Φ⁻¹(μ))² / (μ(1 − μ)),  z = η + (y − μ) / φ(Φ⁻¹(μ))
//!
//! and stops once the binomial deviance changes by no more than the
//! tolerance.

use crate::distribution::{normal_cdf, normal_pdf, normal_quantile};
use crate::error::{AnalysisError, AnalysisResult};
use nalgebra::{Matrix2, Vector2};
use serde::{Deserialize, Serialize};

/// Fitted means are kept this far away from 0 and 1
const PROB_EPS: f64 = f64::EPSILON;

/// IRLS stopping rules
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitOptions {
    /// Maximum IRLS iterations
    pub max_iterations: usize,

    /// Absolute change in deviance that counts as converged
    pub tolerance: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-8,
        }
    }
}

impl FitOptions {
    /// Set the iteration limit
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the convergence tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// Result of a probit fit: Φ⁻¹(p) = intercept + slope · x
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbitFit {
    /// Intercept (β₀)
    pub intercept: f64,
    /// Slope (β₁)
    pub slope: f64,
    /// Standard error of the intercept
    pub intercept_se: f64,
    /// Standard error of the slope
    pub slope_se: f64,
    /// Coefficient covariance, intercept first
    pub covariance: [[f64; 2]; 2],
    /// Binomial deviance at the solution
    pub deviance: f64,
    /// IRLS iterations used
    pub iterations: usize,
    /// Number of observations
    pub n: usize,
}

impl ProbitFit {
    /// Linear predictor η = β₀ + β₁x
    pub fn linear_predictor(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// Predicted proportion Φ(η)
    pub fn predict(&self, x: f64) -> f64 {
        normal_cdf(self.linear_predictor(x))
    }

    /// Predicted proportions for several doses
    pub fn predict_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.predict(x)).collect()
    }
}

/// Fit a probit model of `proportion` on `dose` with default options
pub fn fit_probit(dose: &[f64], proportion: &[f64]) -> AnalysisResult<ProbitFit> {
    fit_probit_with(dose, proportion, &FitOptions::default())
}

/// Fit a probit model of `proportion` on `dose`
pub fn fit_probit_with(
    dose: &[f64],
    proportion: &[f64],
    options: &FitOptions,
) -> AnalysisResult<ProbitFit> {
    validate(dose, proportion)?;

    let mut mu: Vec<f64> = proportion.iter().map(|&y| (y + 0.5) / 2.0).collect();
    let mut eta: Vec<f64> = mu.iter().map(|&m| normal_quantile(m)).collect();
    let mut deviance = binomial_deviance(proportion, &mu);

    for iteration in 1..=options.max_iterations {
        let mut xtwx = Matrix2::<f64>::zeros();
        let mut xtwz = Vector2::<f64>::zeros();
        for ((&x, &y), (&e, &m)) in dose.iter().zip(proportion).zip(eta.iter().zip(&mu)) {
            let d = normal_pdf(normal_quantile(m));
            let w = d * d / (m * (1.0 - m));
            let z = e + (y - m) / d;
            let row = Vector2::new(1.0, x);
            xtwx += w * row * row.transpose();
            xtwz += w * z * row;
        }

        let inverse = xtwx.try_inverse().ok_or(AnalysisError::SingularFit)?;
        let beta = inverse * xtwz;
        if !beta.iter().all(|b| b.is_finite()) {
            return Err(AnalysisError::SingularFit);
        }

        eta = dose.iter().map(|&x| beta[0] + beta[1] * x).collect();
        mu = eta
            .iter()
            .map(|&e| normal_cdf(e).clamp(PROB_EPS, 1.0 - PROB_EPS))
            .collect();
        let new_deviance = binomial_deviance(proportion, &mu);

        if (new_deviance - deviance).abs() <= options.tolerance {
            let covariance = [
                [inverse[(0, 0)], inverse[(0, 1)]],
                [inverse[(1, 0)], inverse[(1, 1)]],
            ];
            tracing::debug!(
                "Probit fit converged in {} iterations: intercept {:.4}, slope {:.4}",
                iteration,
                beta[0],
                beta[1]
            );
            return Ok(ProbitFit {
                intercept: beta[0],
                slope: beta[1],
                intercept_se: covariance[0][0].sqrt(),
                slope_se: covariance[1][1].sqrt(),
                covariance,
                deviance: new_deviance,
                iterations: iteration,
                n: dose.len(),
            });
        }
        deviance = new_deviance;
    }

    Err(AnalysisError::NotConverged {
        iterations: options.max_iterations,
    })
}

fn validate(dose: &[f64], proportion: &[f64]) -> AnalysisResult<()> {
    if dose.len() != proportion.len() {
        return Err(AnalysisError::InvalidData {
            message: format!(
                "{} doses but {} proportions",
                dose.len(),
                proportion.len()
            ),
        });
    }
    if dose.len() < 2 {
        return Err(AnalysisError::InsufficientData {
            required: 2,
            actual: dose.len(),
        });
    }
    if let Some(x) = dose.iter().find(|x| !x.is_finite()) {
        return Err(AnalysisError::InvalidData {
            message: format!("non-finite concentration {}", x),
        });
    }
    if let Some(y) = proportion.iter().find(|y| !(0.0..=1.0).contains(*y)) {
        return Err(AnalysisError::InvalidData {
            message: format!("proportion {} outside [0, 1]", y),
        });
    }
    Ok(())
}

/// Binomial deviance for proportions, with 0 · ln 0 = 0
fn binomial_deviance(y: &[f64], mu: &[f64]) -> f64 {
    let total: f64 = y
        .iter()
        .zip(mu)
        .map(|(&y, &m)| {
            let mut d = 0.0;
            if y > 0.0 {
                d += y * (y / m).ln();
            }
            if y < 1.0 {
                d += (1.0 - y) * ((1.0 - y) / (1.0 - m)).ln();
            }
            d
        })
        .sum();
    2.0 * total
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOSE: [f64; 5] = [0.5, 1.0, 2.0, 4.0, 8.0];
    const PROPORTION: [f64; 5] = [0.08, 0.20, 0.48, 0.76, 0.96];

    #[test]
    fn test_fit_recovers_reference_coefficients() {
        let fit = fit_probit(&DOSE, &PROPORTION).unwrap();
        assert!((fit.intercept - -1.193936).abs() < 1e-4);
        assert!((fit.slope - 0.433059).abs() < 1e-4);
        assert!((fit.intercept_se - 1.086882).abs() < 1e-3);
        assert!((fit.slope_se - 0.389072).abs() < 1e-3);
        assert!(fit.iterations < 25);
        assert_eq!(fit.n, 5);
    }

    #[test]
    fn test_covariance_is_symmetric() {
        let fit = fit_probit(&DOSE, &PROPORTION).unwrap();
        assert!((fit.covariance[0][1] - fit.covariance[1][0]).abs() < 1e-12);
        assert!(fit.covariance[0][1] < 0.0);
    }

    #[test]
    fn test_predictions_increase_with_dose() {
        let fit = fit_probit(&DOSE, &PROPORTION).unwrap();
        let predicted = fit.predict_many(&DOSE);
        assert!(predicted.windows(2).all(|w| w[0] < w[1]));
        assert!(predicted.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_single_dose_is_singular() {
        let err = fit_probit(&[2.0, 2.0, 2.0], &[0.1, 0.5, 0.9]).unwrap_err();
        assert!(matches!(err, AnalysisError::SingularFit));
    }

    #[test]
    fn test_too_few_rows() {
        assert!(matches!(
            fit_probit(&[1.0], &[0.5]),
            Err(AnalysisError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_nan_proportion_rejected() {
        assert!(matches!(
            fit_probit(&[1.0, 2.0], &[f64::NAN, 0.5]),
            Err(AnalysisError::InvalidData { .. })
        ));
    }

    #[test]
    fn test_iteration_limit() {
        let options = FitOptions::default().with_max_iterations(1).with_tolerance(0.0);
        assert!(matches!(
            fit_probit_with(&DOSE, &PROPORTION, &options),
            Err(AnalysisError::NotConverged { iterations: 1 })
        ));
    }

    #[test]
    fn test_deviance_zero_at_perfect_fit() {
        assert_eq!(binomial_deviance(&[0.0, 1.0, 0.5], &[0.0, 1.0, 0.5]), 0.0);
    }
}
