//! Declarative filter specifications for group construction.

use crate::error::{Result, StatgenexError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Accepted values for one categorical column: a single value or a list.
///
/// A sample matches if its value is a member of the accepted set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AcceptedValues {
    One(String),
    Many(Vec<String>),
}

impl AcceptedValues {
    /// Check membership.
    pub fn contains(&self, value: &str) -> bool {
        match self {
            AcceptedValues::One(v) => v == value,
            AcceptedValues::Many(values) => values.iter().any(|v| v == value),
        }
    }
}

/// A half-open value range `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    /// Create a range; bounds are ordered so argument order does not matter.
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Half-open containment: `min <= value < max`.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value < self.max
    }
}

/// Expression threshold computed over a reference group.
///
/// Only the median is supported; unrecognized values deserialize into
/// `Unsupported` and the corresponding group is silently skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ThresholdType {
    Median,
    Unsupported,
}

impl From<String> for ThresholdType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "median" => ThresholdType::Median,
            _ => ThresholdType::Unsupported,
        }
    }
}

impl From<ThresholdType> for String {
    fn from(value: ThresholdType) -> Self {
        match value {
            ThresholdType::Median => "median".to_string(),
            ThresholdType::Unsupported => "unsupported".to_string(),
        }
    }
}

/// Which side of the threshold defines the group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExpressionClass {
    /// Expression at or below the threshold.
    Low,
    /// Expression above the threshold.
    High,
    Unsupported,
}

impl From<String> for ExpressionClass {
    fn from(value: String) -> Self {
        match value.as_str() {
            "low" => ExpressionClass::Low,
            "high" => ExpressionClass::High,
            _ => ExpressionClass::Unsupported,
        }
    }
}

impl From<ExpressionClass> for String {
    fn from(value: ExpressionClass) -> Self {
        match value {
            ExpressionClass::Low => "low".to_string(),
            ExpressionClass::High => "high".to_string(),
            ExpressionClass::Unsupported => "unsupported".to_string(),
        }
    }
}

/// The phase a filter specification belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterPhase {
    Categorical,
    Quantitative,
    Expression,
    Secondary,
}

impl FilterPhase {
    pub fn name(&self) -> &'static str {
        match self {
            FilterPhase::Categorical => "categorical",
            FilterPhase::Quantitative => "quantitative",
            FilterPhase::Expression => "expression",
            FilterPhase::Secondary => "secondary",
        }
    }
}

/// A declarative filter specification, one variant per construction phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterSpec {
    /// Ordered list of column -> accepted-values maps; maps AND together,
    /// values within one map OR together.
    Categorical {
        filters: Vec<BTreeMap<String, AcceptedValues>>,
    },
    /// Ordered list of column -> half-open range maps; maps AND together.
    Quantitative {
        filters: Vec<BTreeMap<String, ValueRange>>,
    },
    /// Median split of one gene's expression over a reference group.
    Expression {
        ref_group: String,
        gene: String,
        threshold_type: ThresholdType,
        class: ExpressionClass,
    },
    /// Intersection of previously built groups, sorted.
    Secondary { groups: Vec<String> },
}

impl FilterSpec {
    /// The phase this specification belongs to.
    pub fn phase(&self) -> FilterPhase {
        match self {
            FilterSpec::Categorical { .. } => FilterPhase::Categorical,
            FilterSpec::Quantitative { .. } => FilterPhase::Quantitative,
            FilterSpec::Expression { .. } => FilterPhase::Expression,
            FilterSpec::Secondary { .. } => FilterPhase::Secondary,
        }
    }

    /// Check that this specification is usable in the given phase.
    pub fn expect_phase(&self, phase: FilterPhase, group_name: &str) -> Result<()> {
        if self.phase() == phase {
            Ok(())
        } else {
            Err(StatgenexError::InvalidFilterSpec(format!(
                "group '{}': expected a {} filter, got a {} filter",
                group_name,
                phase.name(),
                self.phase().name()
            )))
        }
    }
}

/// The four optional phase maps consumed by group construction.
///
/// Round-trips through YAML for declarative configuration files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GroupFilterConfig {
    pub categorical: BTreeMap<String, FilterSpec>,
    pub quantitative: BTreeMap<String, FilterSpec>,
    pub expression: BTreeMap<String, FilterSpec>,
    pub secondary: BTreeMap<String, FilterSpec>,
}

impl GroupFilterConfig {
    /// Load from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(StatgenexError::from)
    }

    /// Serialize to a YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(StatgenexError::from)
    }

    /// Check if all four phase maps are empty.
    pub fn is_empty(&self) -> bool {
        self.categorical.is_empty()
            && self.quantitative.is_empty()
            && self.expression.is_empty()
            && self.secondary.is_empty()
    }
}
