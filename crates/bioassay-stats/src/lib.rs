//! bioassay-stats - Mortality statistics for insecticide bioassays
//!
//! This crate turns loaded bioassay tables into derived statistics:
//!
//! - **Diagnostic dose**: per-group mortality with Student-t confidence
//!   intervals, returned as a [`Table`](bioassay_io::Table)
//! - **Dose response**: binomial GLM with probit link fitted by IRLS, and
//!   lethal-concentration (LCx) estimates with confidence bounds
//!
//! # Design
//!
//! Every analysis is a pure function of its input table. Rows are
//! partitioned into first-seen ordered groups and a reduction is mapped
//! over the groups; derived columns such as `proportion` are added to a
//! new table rather than to the caller's.

pub mod diagnostic;
pub mod distribution;
pub mod error;
pub mod group;
pub mod lethal;
pub mod probit;

pub use diagnostic::*;
pub use distribution::*;
pub use error::*;
pub use group::*;
pub use lethal::*;
pub use probit::*;
