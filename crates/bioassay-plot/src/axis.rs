//! Axis descriptors

use serde::{Deserialize, Serialize};

/// How positions along an axis are interpreted
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisKind {
    /// Discrete labels, one slot per distinct value
    Categorical,
    /// Continuous numeric values
    Linear,
}

/// Configuration for an axis
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    /// Axis title
    pub label: String,

    /// Scale type
    pub kind: AxisKind,

    /// Fixed data range; `None` lets the renderer fit the data
    pub range: Option<(f64, f64)>,
}

impl Axis {
    /// Categorical axis
    pub fn categorical(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: AxisKind::Categorical,
            range: None,
        }
    }

    /// Linear numeric axis
    pub fn linear(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: AxisKind::Linear,
            range: None,
        }
    }

    /// Fix the axis range
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.range = Some((min, max));
        self
    }
}

/// Range of the finite values, widened by `pad` of its span on each side.
///
/// A zero span is widened by `pad` absolute units instead.
pub fn padded_range(values: impl IntoIterator<Item = f64>, pad: f64) -> Option<(f64, f64)> {
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            None => Some((v, v)),
        })?;

    let span = max - min;
    let margin = if span > 0.0 { span * pad } else { pad };
    Some((min - margin, max + margin))
}
