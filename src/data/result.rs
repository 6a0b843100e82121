//! Result tables produced by the differential testing pipeline.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Per-feature test outcome: raw and adjusted p-values plus the
/// significance flag.
///
/// A feature for which the omnibus tests failed keeps all four p-value
/// fields unset; it is still classified (as not significant).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureTestResult {
    /// Feature identifier.
    pub feature_id: String,
    /// One-way ANOVA p-value.
    pub pval_anova: Option<f64>,
    /// Kruskal-Wallis p-value.
    pub pval_kw: Option<f64>,
    /// BH-adjusted ANOVA p-value.
    pub fdr_anova: Option<f64>,
    /// BH-adjusted Kruskal-Wallis p-value.
    pub fdr_kw: Option<f64>,
    /// Significance flag (written as 1/0).
    pub significant: bool,
}

/// One row per tested feature.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestResultTable {
    pub results: Vec<FeatureTestResult>,
}

impl TestResultTable {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Get the row for a specific feature.
    pub fn get_feature(&self, feature_id: &str) -> Option<&FeatureTestResult> {
        self.results.iter().find(|r| r.feature_id == feature_id)
    }

    /// Rows flagged as significant.
    pub fn significant(&self) -> Vec<&FeatureTestResult> {
        self.results.iter().filter(|r| r.significant).collect()
    }

    /// Iterate over rows.
    pub fn iter(&self) -> impl Iterator<Item = &FeatureTestResult> {
        self.results.iter()
    }

    /// Write the table to a delimited text file.
    pub fn to_csv<P: AsRef<Path>>(&self, path: P, separator: u8) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(separator)
            .from_path(path)?;
        writer.write_record([
            "gene",
            "pval_anova",
            "pval_kw",
            "fdr_anova",
            "fdr_kw",
            "significant",
        ])?;
        for r in &self.results {
            writer.write_record([
                r.feature_id.clone(),
                format_pvalue(r.pval_anova),
                format_pvalue(r.pval_kw),
                format_pvalue(r.fdr_anova),
                format_pvalue(r.fdr_kw),
                if r.significant { "1" } else { "0" }.to_string(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// One row per evaluated group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDescription {
    /// Group name.
    pub group_name: String,
    /// Dataset the group belongs to.
    pub dataset_name: String,
    /// Nominal group size (before missing-value removal).
    pub sample_size: usize,
}

/// Descriptions of the groups that entered a comparison.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupDescriptionTable {
    pub rows: Vec<GroupDescription>,
}

impl GroupDescriptionTable {
    /// Write the table to a delimited text file.
    pub fn to_csv<P: AsRef<Path>>(&self, path: P, separator: u8) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(separator)
            .from_path(path)?;
        writer.write_record(["group_name", "dataset_name", "sample_size"])?;
        for r in &self.rows {
            writer.write_record([
                r.group_name.clone(),
                r.dataset_name.clone(),
                r.sample_size.to_string(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Per-feature, per-group counts of values actually used in testing.
///
/// Counts can be smaller than the nominal group size when expression values
/// are missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleSizeTable {
    /// Group names, in the order the engine evaluated them.
    pub group_names: Vec<String>,
    /// One row per feature: identifier plus one count per group.
    pub rows: Vec<SampleSizeRow>,
}

/// One row of the sample-size table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSizeRow {
    pub feature_id: String,
    pub counts: Vec<usize>,
}

impl SampleSizeTable {
    /// Count of non-missing values for a feature/group pair.
    pub fn get(&self, feature_id: &str, group_name: &str) -> Option<usize> {
        let col = self.group_names.iter().position(|g| g == group_name)?;
        let row = self.rows.iter().find(|r| r.feature_id == feature_id)?;
        row.counts.get(col).copied()
    }

    /// Write the table to a delimited text file.
    pub fn to_csv<P: AsRef<Path>>(&self, path: P, separator: u8) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(separator)
            .from_path(path)?;
        let mut header = vec!["gene".to_string()];
        header.extend(self.group_names.iter().cloned());
        writer.write_record(&header)?;
        for r in &self.rows {
            let mut record = vec![r.feature_id.clone()];
            record.extend(r.counts.iter().map(|c| c.to_string()));
            writer.write_record(&record)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Star notation for a p-value: `*` at 0.05, `**` at 0.01, `***` at 0.001.
pub fn significance_symbol(pvalue: f64) -> &'static str {
    if pvalue <= 0.001 {
        "***"
    } else if pvalue <= 0.01 {
        "**"
    } else if pvalue <= 0.05 {
        "*"
    } else {
        ""
    }
}

fn format_pvalue(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.6e}", v),
        None => String::new(),
    }
}
