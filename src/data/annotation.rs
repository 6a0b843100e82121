//! Sample annotation table (covariates per sample).

use crate::error::{Result, StatgenexError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// A covariate value that can be categorical or quantitative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Variable {
    /// Categorical variable with string levels.
    Categorical(String),
    /// Quantitative numeric variable.
    Continuous(f64),
    /// Missing value.
    Missing,
}

impl Variable {
    /// Check if this is a missing value.
    pub fn is_missing(&self) -> bool {
        matches!(self, Variable::Missing)
    }

    /// Try to get as categorical string.
    pub fn as_categorical(&self) -> Option<&str> {
        match self {
            Variable::Categorical(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as continuous f64.
    pub fn as_continuous(&self) -> Option<f64> {
        match self {
            Variable::Continuous(v) => Some(*v),
            _ => None,
        }
    }
}

/// Type hint for columns when loading annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariableType {
    Categorical,
    Continuous,
}

/// Sample annotation table: samples (rows) × covariates (columns).
#[derive(Debug, Clone)]
pub struct AnnotationTable {
    /// Sample IDs in order.
    sample_ids: Vec<String>,
    /// Column names.
    column_names: Vec<String>,
    /// Data stored as sample_id -> column_name -> Variable.
    data: HashMap<String, HashMap<String, Variable>>,
    /// Inferred or overridden type for each column.
    column_types: HashMap<String, VariableType>,
}

impl AnnotationTable {
    /// Load an annotation table from a delimited text file.
    ///
    /// Expected format:
    /// - First row: header with column names (first column is the sample ID)
    /// - Subsequent rows: sample ID followed by covariate values
    ///
    /// A column is inferred as continuous if every non-missing value parses
    /// as a number, otherwise categorical. Use `with_column_types` to
    /// override the inference.
    pub fn from_csv<P: AsRef<Path>>(path: P, separator: u8) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(separator)
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;

        let header = reader.headers()?.clone();
        if header.len() < 2 {
            return Err(StatgenexError::EmptyData(
                "annotation file must have at least one covariate column".to_string(),
            ));
        }
        let column_names: Vec<String> = header.iter().skip(1).map(|s| s.to_string()).collect();

        let mut raw_data: Vec<(String, Vec<String>)> = Vec::new();
        for record in reader.records() {
            let record = record?;
            if record.is_empty() {
                continue;
            }
            let sample_id = record[0].to_string();
            let values: Vec<String> = record.iter().skip(1).map(|s| s.to_string()).collect();
            raw_data.push((sample_id, values));
        }
        if raw_data.is_empty() {
            return Err(StatgenexError::EmptyData(
                "no samples in annotation file".to_string(),
            ));
        }

        // Infer column types
        let mut column_types = HashMap::new();
        for (col_idx, col_name) in column_names.iter().enumerate() {
            let all_numeric = raw_data.iter().all(|(_, values)| {
                let raw = values.get(col_idx).map(|s| s.trim()).unwrap_or("");
                is_missing_field(raw) || raw.parse::<f64>().is_ok()
            });
            let var_type = if all_numeric {
                VariableType::Continuous
            } else {
                VariableType::Categorical
            };
            column_types.insert(col_name.clone(), var_type);
        }

        let mut sample_ids = Vec::new();
        let mut data = HashMap::new();
        for (sample_id, values) in raw_data {
            sample_ids.push(sample_id.clone());
            let mut sample_data = HashMap::new();
            for (col_idx, col_name) in column_names.iter().enumerate() {
                let raw = values.get(col_idx).map(|s| s.trim()).unwrap_or("");
                let var = if is_missing_field(raw) {
                    Variable::Missing
                } else {
                    match column_types[col_name] {
                        VariableType::Continuous => raw
                            .parse::<f64>()
                            .map(Variable::Continuous)
                            .unwrap_or(Variable::Missing),
                        VariableType::Categorical => Variable::Categorical(raw.to_string()),
                    }
                };
                sample_data.insert(col_name.clone(), var);
            }
            data.insert(sample_id, sample_data);
        }

        Ok(Self {
            sample_ids,
            column_names,
            data,
            column_types,
        })
    }

    /// Override the type of specific columns, re-interpreting stored values.
    pub fn with_column_types(mut self, types: HashMap<String, VariableType>) -> Self {
        for (col_name, var_type) in &types {
            self.column_types.insert(col_name.clone(), *var_type);
            for sample_data in self.data.values_mut() {
                if let Some(var) = sample_data.get_mut(col_name) {
                    *var = match (&*var, var_type) {
                        (Variable::Categorical(s), VariableType::Continuous) => s
                            .trim()
                            .parse::<f64>()
                            .map(Variable::Continuous)
                            .unwrap_or(Variable::Missing),
                        (Variable::Continuous(v), VariableType::Categorical) => {
                            Variable::Categorical(v.to_string())
                        }
                        (other, _) => other.clone(),
                    };
                }
            }
        }
        self
    }

    /// Sample IDs in order.
    pub fn sample_ids(&self) -> &[String] {
        &self.sample_ids
    }

    /// Column names.
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Number of samples.
    pub fn n_samples(&self) -> usize {
        self.sample_ids.len()
    }

    /// Get a covariate value for a specific sample and column.
    pub fn get(&self, sample_id: &str, column: &str) -> Option<&Variable> {
        self.data.get(sample_id).and_then(|m| m.get(column))
    }

    /// Get the type of a column.
    pub fn column_type(&self, column: &str) -> Option<VariableType> {
        self.column_types.get(column).copied()
    }

    /// Check if a column exists.
    pub fn has_column(&self, column: &str) -> bool {
        self.column_names.iter().any(|c| c == column)
    }

    /// Check if a sample exists.
    pub fn has_sample(&self, sample_id: &str) -> bool {
        self.data.contains_key(sample_id)
    }

    /// Subset the table to the given samples, in the given order.
    pub fn subset_samples(&self, sample_ids: &[String]) -> Result<Self> {
        let mut new_data = HashMap::new();
        let mut new_sample_ids = Vec::new();
        for sid in sample_ids {
            match self.data.get(sid) {
                Some(sample_data) => {
                    new_data.insert(sid.clone(), sample_data.clone());
                    new_sample_ids.push(sid.clone());
                }
                None => {
                    return Err(StatgenexError::SampleMismatch(format!(
                        "sample '{}' not found in annotation table",
                        sid
                    )))
                }
            }
        }
        Ok(Self {
            sample_ids: new_sample_ids,
            column_names: self.column_names.clone(),
            data: new_data,
            column_types: self.column_types.clone(),
        })
    }

    /// Build an in-memory table from rows of (sample, column -> value).
    ///
    /// Intended for tests and programmatic construction.
    pub fn from_rows(
        column_names: Vec<String>,
        rows: Vec<(String, HashMap<String, Variable>)>,
    ) -> Result<Self> {
        if rows.is_empty() {
            return Err(StatgenexError::EmptyData(
                "no samples in annotation rows".to_string(),
            ));
        }
        let mut column_types = HashMap::new();
        for col in &column_names {
            let all_numeric = rows.iter().all(|(_, values)| {
                matches!(
                    values.get(col),
                    Some(Variable::Continuous(_)) | Some(Variable::Missing) | None
                )
            });
            let var_type = if all_numeric {
                VariableType::Continuous
            } else {
                VariableType::Categorical
            };
            column_types.insert(col.clone(), var_type);
        }
        let mut sample_ids = Vec::with_capacity(rows.len());
        let mut data = HashMap::new();
        for (sample_id, values) in rows {
            sample_ids.push(sample_id.clone());
            data.insert(sample_id, values);
        }
        Ok(Self {
            sample_ids,
            column_names,
            data,
            column_types,
        })
    }
}

fn is_missing_field(raw: &str) -> bool {
    raw.is_empty() || raw.eq_ignore_ascii_case("na")
}
