//! Group-based differential expression analysis.
//!
//! This library partitions the samples of a tabular gene-expression dataset
//! into named groups via declarative filters, then tests each feature for
//! differential expression across those groups.
//!
//! # Overview
//!
//! The library is organized into composable modules:
//!
//! - **data**: Core data structures (ExpressionMatrix, AnnotationTable,
//!   SampleGroup, result tables)
//! - **filter**: Declarative filter specifications and membership predicates
//! - **grouping**: Four-phase group construction (categorical, quantitative,
//!   expression-threshold, secondary set combination)
//! - **test**: Omnibus hypothesis tests (one-way ANOVA, Kruskal-Wallis)
//! - **correct**: Multiple testing correction (Benjamini-Hochberg)
//! - **analysis**: The differential testing pipeline and significance
//!   classification
//! - **project**: Project/dataset entities with JSON persistence
//!
//! # Example
//!
//! ```no_run
//! use statgenex::prelude::*;
//!
//! // Load data (semicolon-separated files)
//! let expression = ExpressionMatrix::from_csv("expression.csv", b';').unwrap();
//! let annotation = AnnotationTable::from_csv("annotation.csv", b';').unwrap();
//!
//! // Build sample groups from a declarative configuration
//! let config = GroupFilterConfig::from_yaml(
//!     "categorical:\n  tumor:\n    type: categorical\n    filters:\n      - tissue: tumor\n",
//! )
//! .unwrap();
//! let groups = build_groups(&annotation, &expression, &config).unwrap();
//!
//! // Test features across groups
//! let report = run_differential_tests(
//!     &expression,
//!     &groups,
//!     &["tumor".to_string(), "normal".to_string()],
//!     &["TP53".to_string(), "BRCA1".to_string()],
//!     &DifferentialOptions::default(),
//! )
//! .unwrap();
//! report.results.to_csv("results.csv", b';').unwrap();
//! ```

pub mod analysis;
pub mod correct;
pub mod data;
pub mod error;
pub mod filter;
pub mod grouping;
pub mod project;
pub mod test;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::analysis::{
        classify_significance, omnibus_tests, run_differential_tests, Criterion,
        DifferentialOptions, DifferentialReport, OmnibusOutcome, SignificanceConfig,
    };
    pub use crate::correct::correct_bh;
    pub use crate::data::{
        significance_symbol, AnnotationTable, ExpressionMatrix, FeatureTestResult,
        GroupDescription, GroupDescriptionTable, GroupSet, SampleGroup, SampleSizeTable,
        TestResultTable, Variable, VariableType,
    };
    pub use crate::error::{Result, StatgenexError};
    pub use crate::filter::{
        AcceptedValues, ExpressionClass, FilterPhase, FilterSpec, GroupFilterConfig,
        ThresholdType, ValueRange,
    };
    pub use crate::grouping::{build_groups, GroupBuilder};
    pub use crate::project::{Dataset, Project};
    pub use crate::test::{kruskal_wallis, one_way_anova, TestFailure};
}
