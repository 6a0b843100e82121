//! Project and dataset entities with JSON persistence.

use crate::data::{normalize_name, AnnotationTable, ExpressionMatrix, GroupSet, SampleGroup};
use crate::error::Result;
use crate::filter::GroupFilterConfig;
use crate::grouping::GroupBuilder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// A named dataset and its group collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    /// Dataset name (normalized).
    pub name: String,
    /// Groups built for this dataset.
    #[serde(default)]
    pub groups: GroupSet,
}

impl Dataset {
    /// Create an empty dataset; the name is normalized.
    pub fn new(name: &str) -> Self {
        Self {
            name: normalize_name(name),
            groups: GroupSet::new(),
        }
    }

    /// Add a group, replacing any prior group with the same name.
    pub fn add_group(&mut self, group: SampleGroup) {
        self.groups.add(group);
    }

    /// Build groups from filter specifications, merging into the existing
    /// collection.
    ///
    /// Existing groups stay visible to the expression and secondary phases.
    /// On error, groups built before the failure are kept.
    pub fn generate_groups(
        &mut self,
        annotation: &AnnotationTable,
        expression: &ExpressionMatrix,
        config: &GroupFilterConfig,
    ) -> Result<()> {
        let mut builder = GroupBuilder::new(annotation, expression)?
            .with_groups(std::mem::take(&mut self.groups));
        let outcome = builder.run(config);
        self.groups = builder.into_groups();
        outcome
    }
}

/// A named collection of datasets, persisted as a single JSON document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Project name (normalized).
    pub name: String,
    /// Datasets keyed by name.
    #[serde(default)]
    pub datasets: BTreeMap<String, Dataset>,
}

impl Project {
    /// Create an empty project; the name is normalized.
    pub fn new(name: &str) -> Self {
        Self {
            name: normalize_name(name),
            datasets: BTreeMap::new(),
        }
    }

    /// Add a dataset, replacing any prior dataset with the same name.
    pub fn add_dataset(&mut self, dataset: Dataset) {
        self.datasets.insert(dataset.name.clone(), dataset);
    }

    /// Look up a dataset by name.
    pub fn dataset(&self, name: &str) -> Option<&Dataset> {
        self.datasets.get(name)
    }

    /// Write the project as pretty-printed JSON.
    pub fn dump<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Read a project back from JSON.
    pub fn restore<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// One line per dataset with its groups and their sizes.
    pub fn summary(&self) -> String {
        let mut lines = vec![format!("Project {}", self.name)];
        for (name, dataset) in &self.datasets {
            if dataset.groups.is_empty() {
                lines.push(format!("Dataset {}: no groups defined", name));
            } else {
                let group_repr: Vec<String> = dataset
                    .groups
                    .iter()
                    .map(|g| format!("{} ({})", g.name, g.len()))
                    .collect();
                lines.push(format!("Dataset {}: {}", name, group_repr.join(", ")));
            }
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn sample_project() -> Project {
        let mut project = Project::new("My Study");
        let mut dataset = Dataset::new("cohort one");
        dataset.add_group(SampleGroup::new("tumor", vec!["s1".into(), "s2".into()]));
        dataset.add_group(SampleGroup::new("normal", vec!["s3".into()]));
        project.add_dataset(dataset);
        project
    }

    #[test]
    fn test_names_are_normalized() {
        let project = sample_project();
        assert_eq!(project.name, "My_Study");
        assert!(project.dataset("cohort_one").is_some());
    }

    #[test]
    fn test_json_roundtrip() {
        let project = sample_project();
        let file = NamedTempFile::new().unwrap();
        project.dump(file.path()).unwrap();

        let restored = Project::restore(file.path()).unwrap();
        assert_eq!(restored.name, project.name);
        let dataset = restored.dataset("cohort_one").unwrap();
        assert_eq!(dataset.groups.names(), &["tumor", "normal"]);
        assert_eq!(dataset.groups.get("tumor").unwrap().samples, vec!["s1", "s2"]);
    }

    #[test]
    fn test_summary() {
        let project = sample_project();
        let summary = project.summary();
        assert!(summary.contains("Project My_Study"));
        assert!(summary.contains("tumor (2)"));

        let mut empty = Project::new("p");
        empty.add_dataset(Dataset::new("d"));
        assert!(empty.summary().contains("no groups defined"));
    }
}
