//! Four-phase construction of sample groups from declarative filters.

use crate::data::{AnnotationTable, ExpressionMatrix, GroupSet, SampleGroup};
use crate::error::{Result, StatgenexError};
use crate::filter::spec::{ExpressionClass, FilterPhase, FilterSpec, GroupFilterConfig, ThresholdType};
use crate::filter::{categorical_match, quantitative_match};
use log::{debug, warn};
use std::collections::{BTreeMap, HashSet};

/// Builds a dataset's group collection from filter specifications.
///
/// Construction runs in four phases, in a fixed order: categorical,
/// quantitative, expression-threshold, secondary. Both input tables are
/// restricted to their common samples (sorted ascending by identifier)
/// before any filter evaluates, and each created group is visible to later
/// phases within the same run.
///
/// The group collection survives a failed phase, so groups built before the
/// failure remain accessible.
#[derive(Debug, Clone)]
pub struct GroupBuilder {
    annotation: AnnotationTable,
    expression: ExpressionMatrix,
    groups: GroupSet,
}

impl GroupBuilder {
    /// Restrict both tables to their common samples and start with an empty
    /// group collection.
    pub fn new(annotation: &AnnotationTable, expression: &ExpressionMatrix) -> Result<Self> {
        let mut common: Vec<String> = annotation
            .sample_ids()
            .iter()
            .filter(|sid| expression.has_sample(sid))
            .cloned()
            .collect();
        common.sort();
        debug!(
            "group builder: {} common samples ({} annotated, {} in matrix)",
            common.len(),
            annotation.n_samples(),
            expression.n_samples()
        );
        Ok(Self {
            annotation: annotation.subset_samples(&common)?,
            expression: expression.subset_samples(&common)?,
            groups: GroupSet::new(),
        })
    }

    /// Seed the builder with pre-existing groups (e.g. restored from a
    /// persisted dataset) so later phases can reference them.
    pub fn with_groups(mut self, groups: GroupSet) -> Self {
        self.groups = groups;
        self
    }

    /// The samples common to both tables, ascending by identifier.
    pub fn common_samples(&self) -> &[String] {
        self.annotation.sample_ids()
    }

    /// Groups built so far.
    pub fn groups(&self) -> &GroupSet {
        &self.groups
    }

    /// Consume the builder, returning the group collection.
    pub fn into_groups(self) -> GroupSet {
        self.groups
    }

    /// Run all four phases from a configuration. Empty phase maps are
    /// skipped.
    pub fn run(&mut self, config: &GroupFilterConfig) -> Result<()> {
        if !config.categorical.is_empty() {
            self.apply_categorical(&config.categorical)?;
        }
        if !config.quantitative.is_empty() {
            self.apply_quantitative(&config.quantitative)?;
        }
        if !config.expression.is_empty() {
            self.apply_expression(&config.expression)?;
        }
        if !config.secondary.is_empty() {
            self.apply_secondary(&config.secondary)?;
        }
        Ok(())
    }

    /// Phase 2: categorical filters over the annotation table.
    pub fn apply_categorical(&mut self, specs: &BTreeMap<String, FilterSpec>) -> Result<()> {
        for (group_name, spec) in specs {
            spec.expect_phase(FilterPhase::Categorical, group_name)?;
            let FilterSpec::Categorical { filters } = spec else {
                unreachable!()
            };
            let mut samples = Vec::new();
            for sid in self.annotation.sample_ids() {
                if categorical_match(&self.annotation, sid, filters)? {
                    samples.push(sid.clone());
                }
            }
            debug!("categorical group '{}': {} samples", group_name, samples.len());
            self.groups.add(SampleGroup::new(group_name, samples));
        }
        Ok(())
    }

    /// Phase 3: quantitative range filters over the annotation table.
    pub fn apply_quantitative(&mut self, specs: &BTreeMap<String, FilterSpec>) -> Result<()> {
        for (group_name, spec) in specs {
            spec.expect_phase(FilterPhase::Quantitative, group_name)?;
            let FilterSpec::Quantitative { filters } = spec else {
                unreachable!()
            };
            let mut samples = Vec::new();
            for sid in self.annotation.sample_ids() {
                if quantitative_match(&self.annotation, sid, filters)? {
                    samples.push(sid.clone());
                }
            }
            debug!("quantitative group '{}': {} samples", group_name, samples.len());
            self.groups.add(SampleGroup::new(group_name, samples));
        }
        Ok(())
    }

    /// Phase 4: median splits of one gene's expression over a reference
    /// group.
    ///
    /// A missing reference group is an error but does not stop the other
    /// groups in the phase; an absent gene or an unsupported threshold
    /// type/class silently produces no group.
    pub fn apply_expression(&mut self, specs: &BTreeMap<String, FilterSpec>) -> Result<()> {
        let mut first_error = None;
        for (group_name, spec) in specs {
            spec.expect_phase(FilterPhase::Expression, group_name)?;
            let FilterSpec::Expression {
                ref_group,
                gene,
                threshold_type,
                class,
            } = spec
            else {
                unreachable!()
            };

            let ref_samples = match self.groups.get(ref_group) {
                Some(group) => group.samples.clone(),
                None => {
                    first_error.get_or_insert(StatgenexError::MissingGroup {
                        name: ref_group.clone(),
                    });
                    continue;
                }
            };
            if !self.expression.has_feature(gene) {
                warn!(
                    "expression group '{}': gene '{}' not in matrix, skipping",
                    group_name, gene
                );
                continue;
            }
            if *threshold_type != ThresholdType::Median {
                warn!(
                    "expression group '{}': unsupported threshold type, skipping",
                    group_name
                );
                continue;
            }
            let keep_low = match class {
                ExpressionClass::Low => true,
                ExpressionClass::High => false,
                ExpressionClass::Unsupported => {
                    warn!(
                        "expression group '{}': unsupported class, skipping",
                        group_name
                    );
                    continue;
                }
            };

            // Reference samples present in the matrix, in group order.
            let common: Vec<String> = ref_samples
                .into_iter()
                .filter(|sid| self.expression.has_sample(sid))
                .collect();
            let values: Vec<f64> = common
                .iter()
                .filter_map(|sid| self.expression.value(gene, sid))
                .collect();
            let threshold = nan_median(&values);

            // An undefined median matches nothing, yielding an empty group.
            let samples: Vec<String> = match threshold {
                Some(median) => common
                    .iter()
                    .zip(&values)
                    .filter(|(_, &v)| {
                        if keep_low {
                            v <= median
                        } else {
                            v > median
                        }
                    })
                    .map(|(sid, _)| sid.clone())
                    .collect(),
                None => Vec::new(),
            };
            debug!(
                "expression group '{}': {} samples ({} split of '{}' over '{}')",
                group_name,
                samples.len(),
                if keep_low { "low" } else { "high" },
                gene,
                ref_group
            );
            self.groups.add(SampleGroup::new(group_name, samples));
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Phase 5: intersections of previously built groups.
    ///
    /// Every listed name must already exist; a missing name fails that group
    /// but not its siblings. The resulting sample list is sorted.
    pub fn apply_secondary(&mut self, specs: &BTreeMap<String, FilterSpec>) -> Result<()> {
        let mut first_error = None;
        for (group_name, spec) in specs {
            spec.expect_phase(FilterPhase::Secondary, group_name)?;
            let FilterSpec::Secondary { groups } = spec else {
                unreachable!()
            };

            let mut common: Option<HashSet<String>> = None;
            let mut missing = None;
            for primary_name in groups {
                match self.groups.get(primary_name) {
                    Some(primary) => {
                        let samples: HashSet<String> =
                            primary.samples.iter().cloned().collect();
                        common = Some(match common {
                            Some(acc) => acc.intersection(&samples).cloned().collect(),
                            None => samples,
                        });
                    }
                    None => {
                        missing = Some(primary_name.clone());
                        break;
                    }
                }
            }
            if let Some(name) = missing {
                first_error.get_or_insert(StatgenexError::MissingGroup { name });
                continue;
            }

            let mut samples: Vec<String> = common.unwrap_or_default().into_iter().collect();
            samples.sort();
            debug!("secondary group '{}': {} samples", group_name, samples.len());
            self.groups.add(SampleGroup::new(group_name, samples));
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Build a dataset's groups in one call.
///
/// Convenience wrapper over [`GroupBuilder`]; on error the partially built
/// collection is dropped, use the builder directly to keep it.
pub fn build_groups(
    annotation: &AnnotationTable,
    expression: &ExpressionMatrix,
    config: &GroupFilterConfig,
) -> Result<GroupSet> {
    let mut builder = GroupBuilder::new(annotation, expression)?;
    builder.run(config)?;
    Ok(builder.into_groups())
}

/// Median over the non-NaN entries; `None` if there are none.
fn nan_median(values: &[f64]) -> Option<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let n = sorted.len();
    if n % 2 == 1 {
        Some(sorted[n / 2])
    } else {
        Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    }
}
