//! Per-feature differential testing across sample groups.

use crate::analysis::significance::{classify_significance, SignificanceConfig};
use crate::correct::correct_bh;
use crate::data::{
    ExpressionMatrix, FeatureTestResult, GroupDescription, GroupDescriptionTable, GroupSet,
    SampleSizeRow, SampleSizeTable, TestResultTable,
};
use crate::error::Result;
use crate::test::{kruskal_wallis, one_way_anova, TestFailure};
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Options for a differential testing run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DifferentialOptions {
    /// Dataset name recorded in the group description table.
    pub dataset_name: String,
    /// Significance thresholds applied after FDR correction.
    pub significance: SignificanceConfig,
}

/// The three tables produced by a differential testing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifferentialReport {
    /// Per-feature p-values, FDR values and significance flags.
    pub results: TestResultTable,
    /// Per-feature, per-group counts of values used in testing.
    pub sample_sizes: SampleSizeTable,
    /// Nominal size of each evaluated group.
    pub description: GroupDescriptionTable,
}

/// Outcome of the per-feature omnibus computation.
///
/// Both tests run behind one failure boundary: either both p-values are
/// produced or neither is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OmnibusOutcome {
    /// ANOVA and Kruskal-Wallis p-values, in that order.
    Tested { pval_anova: f64, pval_kw: f64 },
    /// The reason neither p-value was produced.
    Failed(TestFailure),
}

/// Run both omnibus tests over one feature's group vectors.
pub fn omnibus_tests(group_values: &[Vec<f64>]) -> OmnibusOutcome {
    let attempt = one_way_anova(group_values)
        .and_then(|pval_anova| kruskal_wallis(group_values).map(|pval_kw| (pval_anova, pval_kw)));
    match attempt {
        Ok((pval_anova, pval_kw)) => OmnibusOutcome::Tested { pval_anova, pval_kw },
        Err(reason) => OmnibusOutcome::Failed(reason),
    }
}

/// Test every requested feature for differential expression across groups.
///
/// The evaluated groups are the requested names that exist in `groups`, in
/// the requested order. Features are the requested identifiers present in
/// the matrix, sorted ascending and deduplicated; absent features simply do
/// not appear in the output. Per feature, non-missing values are collected
/// per group and both omnibus tests are attempted together; when either is
/// undefined the feature keeps both p-values unset, a recoverable condition
/// that never fails the run. FDR correction is applied per test column, then
/// every feature gets an explicit significance flag.
///
/// Requesting an empty feature list tests every feature in the matrix.
pub fn run_differential_tests(
    expression: &ExpressionMatrix,
    groups: &GroupSet,
    requested_group_names: &[String],
    features: &[String],
    options: &DifferentialOptions,
) -> Result<DifferentialReport> {
    let available_groups: Vec<String> = requested_group_names
        .iter()
        .filter(|name| groups.contains(name))
        .cloned()
        .collect();
    debug!(
        "differential run: {} of {} requested groups available",
        available_groups.len(),
        requested_group_names.len()
    );

    let description = GroupDescriptionTable {
        rows: available_groups
            .iter()
            .map(|name| GroupDescription {
                group_name: name.clone(),
                dataset_name: options.dataset_name.clone(),
                sample_size: groups.get(name).map(|g| g.len()).unwrap_or(0),
            })
            .collect(),
    };

    let reduced = expression.reduce_features(features)?;
    let feature_ids: Vec<String> = reduced.feature_ids().to_vec();

    // Per-feature work is independent; output order follows feature_ids.
    let per_feature: Vec<(Vec<usize>, OmnibusOutcome)> = feature_ids
        .par_iter()
        .map(|feature| {
            let mut counts = Vec::with_capacity(available_groups.len());
            let mut group_values = Vec::with_capacity(available_groups.len());
            for name in &available_groups {
                let samples = &groups.get(name).expect("available group exists").samples;
                let values: Vec<f64> = reduced
                    .feature_values(feature, samples)
                    .unwrap_or_default()
                    .into_iter()
                    .filter(|v| !v.is_nan())
                    .collect();
                counts.push(values.len());
                group_values.push(values);
            }
            let outcome = omnibus_tests(&group_values);
            if let OmnibusOutcome::Failed(reason) = outcome {
                debug!("feature '{}': omnibus tests skipped ({})", feature, reason);
            }
            (counts, outcome)
        })
        .collect();

    let mut results = TestResultTable::default();
    let mut sample_sizes = SampleSizeTable {
        group_names: available_groups.clone(),
        rows: Vec::with_capacity(feature_ids.len()),
    };
    for (feature, (counts, outcome)) in feature_ids.iter().zip(per_feature) {
        sample_sizes.rows.push(SampleSizeRow {
            feature_id: feature.clone(),
            counts,
        });
        let (pval_anova, pval_kw) = match outcome {
            OmnibusOutcome::Tested { pval_anova, pval_kw } => (Some(pval_anova), Some(pval_kw)),
            OmnibusOutcome::Failed(_) => (None, None),
        };
        results.results.push(FeatureTestResult {
            feature_id: feature.clone(),
            pval_anova,
            pval_kw,
            fdr_anova: None,
            fdr_kw: None,
            significant: false,
        });
    }

    let fdr_anova = correct_bh(
        &results
            .results
            .iter()
            .map(|r| r.pval_anova)
            .collect::<Vec<_>>(),
    );
    let fdr_kw = correct_bh(&results.results.iter().map(|r| r.pval_kw).collect::<Vec<_>>());
    for (row, (qa, qk)) in results
        .results
        .iter_mut()
        .zip(fdr_anova.into_iter().zip(fdr_kw))
    {
        row.fdr_anova = qa;
        row.fdr_kw = qk;
    }

    classify_significance(&options.significance, &mut results);

    Ok(DifferentialReport {
        results,
        sample_sizes,
        description,
    })
}
