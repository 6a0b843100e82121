//! Declarative sample filters: specifications and membership predicates.

pub mod predicate;
pub mod spec;

pub use predicate::{categorical_match, quantitative_match};
pub use spec::{
    AcceptedValues, ExpressionClass, FilterPhase, FilterSpec, GroupFilterConfig, ThresholdType,
    ValueRange,
};
