//! Omnibus hypothesis tests comparing two or more independent samples.

pub mod kruskal;

pub use anova::one_way_anova;
pub use kruskal::kruskal_wallis;

use serde::{Deserialize, Serialize};

/// Why an omnibus test could not produce a p-value.
///
/// These are recoverable, per-feature conditions: the testing engine records
/// them and leaves the feature's p-values unset instead of failing the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestFailure {
    /// Fewer than two groups were available.
    TooFewGroups { available: usize },
    /// A group contributed no values.
    EmptyGroup { index: usize },
    /// No residual degrees of freedom (every group holds a single value).
    NoResidualDf,
    /// Every value is identical; the test statistic is undefined.
    ConstantInput,
}

impl std::fmt::Display for TestFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestFailure::TooFewGroups { available } => {
                write!(f, "need at least 2 groups, got {}", available)
            }
            TestFailure::EmptyGroup { index } => {
                write!(f, "group at position {} has no values", index)
            }
            TestFailure::NoResidualDf => write!(f, "no residual degrees of freedom"),
            TestFailure::ConstantInput => write!(f, "all values are identical"),
        }
    }
}

/// Check the shared preconditions of both omnibus tests.
pub(crate) fn check_groups(groups: &[Vec<f64>]) -> Result<(), TestFailure> {
    if groups.len() < 2 {
        return Err(TestFailure::TooFewGroups {
            available: groups.len(),
        });
    }
    for (index, group) in groups.iter().enumerate() {
        if group.is_empty() {
            return Err(TestFailure::EmptyGroup { index });
        }
    }
    Ok(())
}
