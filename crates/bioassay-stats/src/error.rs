//! Error types for bioassay analyses

use bioassay_io::TableError;
use thiserror::Error;

/// Errors raised by the analyzers
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Missing or mistyped column
    #[error(transparent)]
    Table(#[from] TableError),

    /// Grouping requested with no key columns
    #[error("No grouping columns given")]
    NoGroupColumns,

    /// LC percentile outside (0, 100)
    #[error("Invalid LC percentile {0}: must lie strictly between 0 and 100")]
    InvalidPercentile(f64),

    /// Too few observations for a two-parameter fit
    #[error("Probit fit needs at least {required} observations, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// Values the binomial family cannot take
    #[error("Invalid data for probit fit: {message}")]
    InvalidData { message: String },

    /// IRLS ran out of iterations
    #[error("Probit fit did not converge after {iterations} iterations")]
    NotConverged { iterations: usize },

    /// Information matrix could not be inverted
    #[error("Probit fit has a singular information matrix")]
    SingularFit,

    /// LC formula divides by the slope
    #[error("Probit slope is zero; the LC value is undefined")]
    ZeroSlope,

    /// Failure inside one group of a per-group analysis
    #[error("Analysis of group '{group}' failed: {source}")]
    Group {
        group: String,
        #[source]
        source: Box<AnalysisError>,
    },
}

impl AnalysisError {
    /// Attach the name of the group being analysed
    pub fn in_group(self, group: impl Into<String>) -> Self {
        AnalysisError::Group {
            group: group.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for analyses
pub type AnalysisResult<T> = Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_error_passes_through() {
        let err: AnalysisError = TableError::ColumnNotFound("dead".to_string()).into();
        assert_eq!(err.to_string(), "Column not found: dead");
    }

    #[test]
    fn test_group_error_display() {
        let err = AnalysisError::ZeroSlope.in_group("Kisumu");
        let text = err.to_string();
        assert!(text.contains("Kisumu"));
        assert!(text.contains("slope is zero"));
    }
}
