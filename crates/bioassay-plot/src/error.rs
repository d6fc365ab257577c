//! Error types for bioassay-plot
//!
//! Covers failures while building charts from analysis tables and while
//! exporting or rendering them.

use bioassay_io::TableError;
use bioassay_stats::AnalysisError;
use thiserror::Error;

/// Main error type for chart construction and export
#[derive(Error, Debug)]
pub enum PlotError {
    /// Missing or mistyped column in the input table
    #[error(transparent)]
    Table(#[from] TableError),

    /// Re-fitting a model for a chart failed
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// Export format not available in this build
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// Invalid output dimensions
    #[error("Invalid dimensions: {width}x{height} (must be positive and within limits)")]
    InvalidDimensions { width: u32, height: u32 },

    /// Rendering backend failure
    #[error("Rendering failed: {0}")]
    Render(String),

    /// JSON serialization failure
    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for plot operations
pub type PlotResult<T> = Result<T, PlotError>;

/// Validation utilities
pub mod validation {
    use super::*;

    /// Validate export dimensions
    pub fn validate_dimensions(width: u32, height: u32) -> PlotResult<()> {
        const MAX_DIMENSION: u32 = 16384;
        const MIN_DIMENSION: u32 = 1;

        if width < MIN_DIMENSION
            || height < MIN_DIMENSION
            || width > MAX_DIMENSION
            || height > MAX_DIMENSION
        {
            return Err(PlotError::InvalidDimensions { width, height });
        }
        Ok(())
    }
}
