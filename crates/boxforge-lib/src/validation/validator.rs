use crate::definition::{AppliancesCatalog, RawDefinition};
use crate::error::BoxForgeError;
use itertools::Itertools;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    #[error("appliance '{appliance}' is defined in a file named '{file_stem}'")]
    NameMismatch {
        appliance: String,
        file_stem: String,
    },
    #[error("appliance '{appliance}' is composed of undefined appliance '{reference}'")]
    UnknownReference {
        appliance: String,
        reference: String,
    },
    #[error("appliance '{appliance}' is composed of itself")]
    SelfReference { appliance: String },
    #[error("appliances form a composition cycle: {}", .appliances.join(" -> "))]
    CompositionCycle { appliances: Vec<String> },
    #[error("appliance '{appliance}' has invalid hardware: {details}")]
    InvalidHardware { appliance: String, details: String },
    #[error("appliance '{appliance}' has invalid partition '{root}': {details}")]
    InvalidPartition {
        appliance: String,
        root: String,
        details: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn into_result(self) -> Result<(), BoxForgeError> {
        if self.is_valid() {
            return Ok(());
        }

        Err(BoxForgeError::CatalogValidation {
            details: self.issues.iter().join("; "),
        })
    }
}

/// Checks a catalog before any resolution takes place.
///
/// The resolver silently skips cyclic references, so this is where composition
/// cycles are surfaced as errors.
pub fn validate_catalog(catalog: &AppliancesCatalog) -> ValidationReport {
    let mut report = ValidationReport::default();

    for (name, entry) in catalog.iter() {
        if let Some(file_stem) = entry
            .source
            .as_deref()
            .and_then(crate::definition::file_stem)
            && file_stem != name
        {
            report.issues.push(ValidationIssue::NameMismatch {
                appliance: name.to_string(),
                file_stem,
            });
        }

        for reference in &entry.definition.appliances {
            if !catalog.contains(reference) {
                report.issues.push(ValidationIssue::UnknownReference {
                    appliance: name.to_string(),
                    reference: reference.clone(),
                });
            }
        }

        validate_hardware(name, &entry.definition, &mut report);
    }

    find_cycles(catalog, &mut report);

    tracing::debug!(
        "Validated {} appliance definitions, found {} issues",
        catalog.len(),
        report.issues.len()
    );
    report
}

fn validate_hardware(name: &str, definition: &RawDefinition, report: &mut ValidationReport) {
    let Some(hardware) = &definition.hardware else {
        return;
    };

    if hardware.cpus == Some(0) {
        report.issues.push(ValidationIssue::InvalidHardware {
            appliance: name.to_string(),
            details: "cpus must be greater than 0".to_string(),
        });
    }
    if hardware.memory == Some(0) {
        report.issues.push(ValidationIssue::InvalidHardware {
            appliance: name.to_string(),
            details: "memory must be greater than 0".to_string(),
        });
    }

    let mut seen_roots = HashSet::new();
    for partition in &hardware.partitions {
        let mut invalid = |details: &str| {
            report.issues.push(ValidationIssue::InvalidPartition {
                appliance: name.to_string(),
                root: partition.root.clone(),
                details: details.to_string(),
            });
        };

        if !partition.root.starts_with('/') {
            invalid("mount point must be an absolute path");
        }
        if partition.size == 0 {
            invalid("size must be greater than 0");
        }
        if !seen_roots.insert(partition.root.as_str()) {
            invalid("mount point is declared more than once");
        }
    }
}

fn find_cycles(catalog: &AppliancesCatalog, report: &mut ValidationReport) {
    let mut graph: DiGraph<&str, ()> = DiGraph::new();
    let nodes: HashMap<&str, NodeIndex> = catalog
        .names()
        .map(|name| (name, graph.add_node(name)))
        .collect();

    for (name, entry) in catalog.iter() {
        for reference in &entry.definition.appliances {
            if reference == name {
                report.issues.push(ValidationIssue::SelfReference {
                    appliance: name.to_string(),
                });
                continue;
            }
            if let Some(&target) = nodes.get(reference.as_str()) {
                graph.add_edge(nodes[name], target, ());
            }
        }
    }

    let mut cycles: Vec<Vec<String>> = tarjan_scc(&graph)
        .into_iter()
        .filter(|component| component.len() > 1)
        .map(|component| {
            component
                .into_iter()
                .map(|index| graph[index].to_string())
                .sorted()
                .collect()
        })
        .collect();
    cycles.sort();

    report.issues.extend(
        cycles
            .into_iter()
            .map(|appliances| ValidationIssue::CompositionCycle { appliances }),
    );
}
