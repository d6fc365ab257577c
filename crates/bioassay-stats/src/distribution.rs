//! Distribution helpers: standard normal and Student-t intervals
//!
//! Thin wrappers over `statrs` that return NaN for degenerate parameters
//! instead of panicking.

use statrs::distribution::{ContinuousCDF, StudentsT};
use statrs::function::erf::{erfc, erfc_inv};
use std::f64::consts::{PI, SQRT_2};

/// Standard normal CDF Φ(x)
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Standard normal density φ(x)
pub fn normal_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// Standard normal quantile Φ⁻¹(p)
///
/// Returns ±∞ at p = 1 and p = 0, and NaN outside [0, 1].
pub fn normal_quantile(p: f64) -> f64 {
    if !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    -SQRT_2 * erfc_inv(2.0 * p)
}

/// Two-sided Student-t interval with `df` degrees of freedom centred at
/// `loc` and scaled by `scale`.
///
/// Returns `(NaN, NaN)` when `df <= 0`, `scale <= 0`, either is NaN, or
/// `confidence` is outside (0, 1).
pub fn t_interval(confidence: f64, df: f64, loc: f64, scale: f64) -> (f64, f64) {
    let degenerate = (f64::NAN, f64::NAN);
    if !(df > 0.0) || !(scale > 0.0) || !(confidence > 0.0 && confidence < 1.0) {
        return degenerate;
    }

    let dist = match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => dist,
        Err(_) => return degenerate,
    };
    let q = dist.inverse_cdf(0.5 + confidence / 2.0);
    (loc - q * scale, loc + q * scale)
}
