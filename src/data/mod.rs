//! Core data structures: expression matrix, annotation table, groups,
//! and result tables.

pub mod annotation;
pub mod expression;
pub mod group;
pub mod result;

pub use annotation::{AnnotationTable, Variable, VariableType};
pub use expression::ExpressionMatrix;
pub use group::{normalize_name, GroupSet, SampleGroup};
pub use result::{
    significance_symbol, FeatureTestResult, GroupDescription, GroupDescriptionTable,
    SampleSizeRow, SampleSizeTable, TestResultTable,
};
