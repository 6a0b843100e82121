//! Differential testing pipeline: per-feature omnibus tests, FDR
//! correction, and significance classification.

pub mod differential;
pub mod significance;

pub use differential::{
    omnibus_tests, run_differential_tests, DifferentialOptions, DifferentialReport,
    OmnibusOutcome,
};
pub use significance::{classify_significance, Criterion, SignificanceConfig};
