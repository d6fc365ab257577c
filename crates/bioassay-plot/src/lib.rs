//! bioassay-plot - Chart descriptors for bioassay results
//!
//! Plotters in this crate return a neutral [`Chart`]: traces, axes and
//! annotations with no ties to a rendering technology. A chart can be
//! exported as Plotly JSON, or rendered to SVG with the `svg` feature.
//!
//! # Charts
//!
//! - **Diagnostic dose**: grouped bars of mortality with asymmetric
//!   confidence-interval error bars
//! - **Dose response**: observed proportions per strain, dashed fitted
//!   probit curves, and an LC callout per strain

pub mod axis;
pub mod chart;
pub mod colormap;
pub mod diagnostic;
pub mod dose_response;
pub mod error;
pub mod export;

#[cfg(feature = "svg")]
pub mod svg;

pub use axis::*;
pub use chart::*;
pub use colormap::{categorical_palette, palette_color, Color};
pub use diagnostic::*;
pub use dose_response::*;
pub use error::*;
pub use export::*;

#[cfg(feature = "svg")]
pub use svg::render_svg;
