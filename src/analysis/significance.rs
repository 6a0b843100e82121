//! Threshold-based significance classification.

use crate::data::{FeatureTestResult, TestResultTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A statistic a significance criterion can be placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    PvalAnova,
    PvalKw,
    FdrAnova,
    FdrKw,
}

impl Criterion {
    /// Extract this criterion's statistic from a result row.
    pub fn value(&self, result: &FeatureTestResult) -> Option<f64> {
        match self {
            Criterion::PvalAnova => result.pval_anova,
            Criterion::PvalKw => result.pval_kw,
            Criterion::FdrAnova => result.fdr_anova,
            Criterion::FdrKw => result.fdr_kw,
        }
    }
}

/// A conjunction of strict thresholds over raw and adjusted p-values.
///
/// A feature is significant iff every configured criterion's statistic is
/// present and strictly below its threshold; a missing statistic fails its
/// criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignificanceConfig {
    thresholds: BTreeMap<Criterion, f64>,
}

impl Default for SignificanceConfig {
    /// All four criteria at 0.05.
    fn default() -> Self {
        Self {
            thresholds: BTreeMap::from([
                (Criterion::PvalAnova, 0.05),
                (Criterion::PvalKw, 0.05),
                (Criterion::FdrAnova, 0.05),
                (Criterion::FdrKw, 0.05),
            ]),
        }
    }
}

impl SignificanceConfig {
    /// Create from an explicit criterion -> threshold map.
    pub fn new(thresholds: BTreeMap<Criterion, f64>) -> Self {
        Self { thresholds }
    }

    /// Replace one criterion's threshold.
    pub fn with_threshold(mut self, criterion: Criterion, threshold: f64) -> Self {
        self.thresholds.insert(criterion, threshold);
        self
    }

    /// The configured thresholds.
    pub fn thresholds(&self) -> &BTreeMap<Criterion, f64> {
        &self.thresholds
    }

    /// Decide significance for one result row.
    pub fn is_significant(&self, result: &FeatureTestResult) -> bool {
        self.thresholds.iter().all(|(criterion, &threshold)| {
            criterion
                .value(result)
                .map(|v| v < threshold)
                .unwrap_or(false)
        })
    }
}

/// Set the significance flag on every row of a result table.
pub fn classify_significance(config: &SignificanceConfig, table: &mut TestResultTable) {
    for result in &mut table.results {
        result.significant = config.is_significant(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(
        pval_anova: Option<f64>,
        pval_kw: Option<f64>,
        fdr_anova: Option<f64>,
        fdr_kw: Option<f64>,
    ) -> FeatureTestResult {
        FeatureTestResult {
            feature_id: "gene".to_string(),
            pval_anova,
            pval_kw,
            fdr_anova,
            fdr_kw,
            significant: false,
        }
    }

    #[test]
    fn test_all_criteria_pass() {
        let config = SignificanceConfig::default();
        let result = row(Some(0.01), Some(0.02), Some(0.03), Some(0.04));
        assert!(config.is_significant(&result));
    }

    #[test]
    fn test_conjunction_is_strict() {
        let config = SignificanceConfig::default();
        // 3 of 4 criteria pass; fdr_kw does not
        let result = row(Some(0.01), Some(0.02), Some(0.03), Some(0.06));
        assert!(!config.is_significant(&result));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let config = SignificanceConfig::default();
        let result = row(Some(0.05), Some(0.01), Some(0.01), Some(0.01));
        assert!(!config.is_significant(&result));
    }

    #[test]
    fn test_missing_statistic_fails_its_criterion() {
        let config = SignificanceConfig::default();
        let result = row(Some(0.01), None, Some(0.01), Some(0.01));
        assert!(!config.is_significant(&result));
        let all_missing = row(None, None, None, None);
        assert!(!config.is_significant(&all_missing));
    }

    #[test]
    fn test_custom_thresholds() {
        let config = SignificanceConfig::new(BTreeMap::from([(Criterion::PvalAnova, 0.1)]));
        let result = row(Some(0.08), None, None, None);
        assert!(config.is_significant(&result));
    }

    #[test]
    fn test_classify_marks_every_row() {
        let mut table = TestResultTable {
            results: vec![
                row(Some(0.01), Some(0.01), Some(0.01), Some(0.01)),
                row(None, None, None, None),
            ],
        };
        classify_significance(&SignificanceConfig::default(), &mut table);
        assert!(table.results[0].significant);
        assert!(!table.results[1].significant);
    }

    #[test]
    fn test_serde_rejects_unknown_criterion() {
        let parsed: Result<SignificanceConfig, _> =
            serde_yaml::from_str("pval_anova: 0.05\npval_ttest: 0.05\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = SignificanceConfig::default().with_threshold(Criterion::FdrKw, 0.1);
        let yaml = serde_yaml::to_string(&config).unwrap();
        let restored: SignificanceConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(restored, config);
    }
}
