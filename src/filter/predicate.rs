//! Membership predicates over the annotation table.
//!
//! These are the stateless building blocks of group construction: each
//! function decides whether one sample satisfies one filter specification.
//! Filter-element maps combine by AND, so membership is invariant under
//! reordering of the maps.

use crate::data::{AnnotationTable, Variable};
use crate::error::{Result, StatgenexError};
use crate::filter::spec::{AcceptedValues, ValueRange};
use std::collections::BTreeMap;

/// Check a sample against a categorical filter list.
///
/// Every map must be satisfied; within one map, the sample's value must be
/// a member of the accepted set. Missing values never match.
pub fn categorical_match(
    annotation: &AnnotationTable,
    sample_id: &str,
    filters: &[BTreeMap<String, AcceptedValues>],
) -> Result<bool> {
    for filter_element in filters {
        for (column, accepted) in filter_element {
            if !annotation.has_column(column) {
                return Err(StatgenexError::MissingColumn(column.clone()));
            }
            let matches = match annotation.get(sample_id, column) {
                Some(Variable::Categorical(value)) => accepted.contains(value),
                Some(Variable::Continuous(value)) => accepted.contains(&value.to_string()),
                _ => false,
            };
            if !matches {
                return Ok(false);
            }
        }
    }
    Ok(true)
}

/// Check a sample against a quantitative filter list.
///
/// Every map must be satisfied; ranges are half-open, so a value equal to
/// `max` is excluded while a value equal to `min` is included. Missing or
/// non-numeric values never match.
pub fn quantitative_match(
    annotation: &AnnotationTable,
    sample_id: &str,
    filters: &[BTreeMap<String, ValueRange>],
) -> Result<bool> {
    for filter_element in filters {
        for (column, range) in filter_element {
            if !annotation.has_column(column) {
                return Err(StatgenexError::MissingColumn(column.clone()));
            }
            let matches = match annotation.get(sample_id, column) {
                Some(Variable::Continuous(value)) => range.contains(*value),
                _ => false,
            };
            if !matches {
                return Ok(false);
            }
        }
    }
    Ok(true)
}
