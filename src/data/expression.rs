//! Expression matrix for feature-by-sample numeric data.

use crate::error::{Result, StatgenexError};
use nalgebra::DMatrix;
use std::collections::HashMap;
use std::path::Path;

/// A dense expression matrix.
///
/// Rows represent features (genes), columns represent samples. Missing
/// entries are stored as `f64::NAN`.
#[derive(Debug, Clone)]
pub struct ExpressionMatrix {
    /// Dense matrix (features × samples), NaN for missing entries.
    data: DMatrix<f64>,
    /// Feature identifiers (row names).
    feature_ids: Vec<String>,
    /// Sample identifiers (column names).
    sample_ids: Vec<String>,
    /// Feature id -> row index.
    feature_index: HashMap<String, usize>,
    /// Sample id -> column index.
    sample_index: HashMap<String, usize>,
}

impl ExpressionMatrix {
    /// Create a new ExpressionMatrix from a dense matrix and identifiers.
    pub fn new(
        data: DMatrix<f64>,
        feature_ids: Vec<String>,
        sample_ids: Vec<String>,
    ) -> Result<Self> {
        let (nrows, ncols) = data.shape();
        if nrows != feature_ids.len() {
            return Err(StatgenexError::DimensionMismatch {
                expected: nrows,
                actual: feature_ids.len(),
            });
        }
        if ncols != sample_ids.len() {
            return Err(StatgenexError::DimensionMismatch {
                expected: ncols,
                actual: sample_ids.len(),
            });
        }
        let feature_index = feature_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();
        let sample_index = sample_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();
        Ok(Self {
            data,
            feature_ids,
            sample_ids,
            feature_index,
            sample_index,
        })
    }

    /// Load an expression matrix from a delimited text file.
    ///
    /// Expected format:
    /// - First row: header with sample IDs (first column is the feature ID header)
    /// - Subsequent rows: feature ID followed by values; empty fields and
    ///   `NA`/`na`/`NaN` are treated as missing
    ///
    /// Rows and columns where every value is missing are dropped, as are
    /// duplicate value rows (first occurrence wins).
    pub fn from_csv<P: AsRef<Path>>(path: P, separator: u8) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(separator)
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;

        let header = reader.headers()?.clone();
        if header.len() < 2 {
            return Err(StatgenexError::EmptyData(
                "expression file must have at least one sample column".to_string(),
            ));
        }
        let sample_ids: Vec<String> = header.iter().skip(1).map(|s| s.to_string()).collect();
        let n_samples = sample_ids.len();

        let mut feature_ids: Vec<String> = Vec::new();
        let mut rows: Vec<Vec<f64>> = Vec::new();
        for record in reader.records() {
            let record = record?;
            if record.is_empty() {
                continue;
            }
            let mut values = vec![f64::NAN; n_samples];
            for (col, field) in record.iter().skip(1).take(n_samples).enumerate() {
                values[col] = parse_value(field);
            }
            feature_ids.push(record[0].to_string());
            rows.push(values);
        }
        if rows.is_empty() {
            return Err(StatgenexError::EmptyData(
                "no features in expression file".to_string(),
            ));
        }

        // Drop rows with no data, then duplicate value rows.
        let mut kept: Vec<(String, Vec<f64>)> = Vec::with_capacity(rows.len());
        for (id, values) in feature_ids.into_iter().zip(rows) {
            if values.iter().all(|v| v.is_nan()) {
                continue;
            }
            let duplicate = kept.iter().any(|(_, prev)| rows_equal(prev, &values));
            if !duplicate {
                kept.push((id, values));
            }
        }

        // Drop columns with no data.
        let col_has_data: Vec<bool> = (0..n_samples)
            .map(|c| kept.iter().any(|(_, values)| !values[c].is_nan()))
            .collect();
        let kept_cols: Vec<usize> = (0..n_samples).filter(|&c| col_has_data[c]).collect();
        let sample_ids: Vec<String> = kept_cols.iter().map(|&c| sample_ids[c].clone()).collect();

        let n_features = kept.len();
        let mut data = DMatrix::from_element(n_features, kept_cols.len(), f64::NAN);
        let mut feature_ids = Vec::with_capacity(n_features);
        for (row, (id, values)) in kept.into_iter().enumerate() {
            feature_ids.push(id);
            for (new_col, &old_col) in kept_cols.iter().enumerate() {
                data[(row, new_col)] = values[old_col];
            }
        }

        Self::new(data, feature_ids, sample_ids)
    }

    /// Write the expression matrix to a delimited text file.
    pub fn to_csv<P: AsRef<Path>>(&self, path: P, separator: u8) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(separator)
            .from_path(path)?;

        let mut header = vec!["feature_id".to_string()];
        header.extend(self.sample_ids.iter().cloned());
        writer.write_record(&header)?;

        for (row, feature_id) in self.feature_ids.iter().enumerate() {
            let mut record = vec![feature_id.clone()];
            for col in 0..self.n_samples() {
                let value = self.data[(row, col)];
                record.push(if value.is_nan() {
                    String::new()
                } else {
                    value.to_string()
                });
            }
            writer.write_record(&record)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Number of features (rows).
    #[inline]
    pub fn n_features(&self) -> usize {
        self.data.nrows()
    }

    /// Number of samples (columns).
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.data.ncols()
    }

    /// Feature identifiers.
    #[inline]
    pub fn feature_ids(&self) -> &[String] {
        &self.feature_ids
    }

    /// Sample identifiers.
    #[inline]
    pub fn sample_ids(&self) -> &[String] {
        &self.sample_ids
    }

    /// Check if a feature exists.
    pub fn has_feature(&self, feature_id: &str) -> bool {
        self.feature_index.contains_key(feature_id)
    }

    /// Check if a sample exists.
    pub fn has_sample(&self, sample_id: &str) -> bool {
        self.sample_index.contains_key(sample_id)
    }

    /// Get the value for a feature/sample pair, if both exist.
    ///
    /// A stored missing entry is returned as NaN.
    pub fn value(&self, feature_id: &str, sample_id: &str) -> Option<f64> {
        let row = *self.feature_index.get(feature_id)?;
        let col = *self.sample_index.get(sample_id)?;
        Some(self.data[(row, col)])
    }

    /// Values of one feature over a list of samples.
    ///
    /// Samples absent from the matrix are skipped; missing entries are
    /// returned as NaN. Returns `None` if the feature is absent.
    pub fn feature_values(&self, feature_id: &str, sample_ids: &[String]) -> Option<Vec<f64>> {
        let row = *self.feature_index.get(feature_id)?;
        Some(
            sample_ids
                .iter()
                .filter_map(|sid| self.sample_index.get(sid))
                .map(|&col| self.data[(row, col)])
                .collect(),
        )
    }

    /// Subset the matrix to the given samples, in the given order.
    pub fn subset_samples(&self, sample_ids: &[String]) -> Result<Self> {
        let mut cols = Vec::with_capacity(sample_ids.len());
        for sid in sample_ids {
            match self.sample_index.get(sid) {
                Some(&col) => cols.push(col),
                None => {
                    return Err(StatgenexError::SampleMismatch(format!(
                        "sample '{}' not found in expression matrix",
                        sid
                    )))
                }
            }
        }
        let mut data = DMatrix::from_element(self.n_features(), cols.len(), f64::NAN);
        for (new_col, &old_col) in cols.iter().enumerate() {
            data.set_column(new_col, &self.data.column(old_col));
        }
        Self::new(data, self.feature_ids.clone(), sample_ids.to_vec())
    }

    /// Reduce the matrix to the requested features.
    ///
    /// The result contains the intersection of the requested identifiers with
    /// the matrix rows, sorted ascending and deduplicated. Requesting an empty
    /// list returns the matrix unchanged.
    pub fn reduce_features(&self, requested: &[String]) -> Result<Self> {
        if requested.is_empty() {
            return Ok(self.clone());
        }
        let mut available: Vec<String> = requested
            .iter()
            .filter(|f| self.has_feature(f))
            .cloned()
            .collect();
        available.sort();
        available.dedup();

        let mut data = DMatrix::from_element(available.len(), self.n_samples(), f64::NAN);
        for (new_row, id) in available.iter().enumerate() {
            let old_row = self.feature_index[id];
            data.set_row(new_row, &self.data.row(old_row));
        }
        Self::new(data, available, self.sample_ids.clone())
    }
}

fn parse_value(field: &str) -> f64 {
    let trimmed = field.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("na") || trimmed.eq_ignore_ascii_case("nan")
    {
        f64::NAN
    } else {
        trimmed.parse::<f64>().unwrap_or(f64::NAN)
    }
}

/// Value-row equality treating NaN entries as equal.
fn rows_equal(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|(x, y)| (x.is_nan() && y.is_nan()) || x == y)
}
