use super::discovery::discover_contributors;
use super::types::{EXCLUDE_MARKER, Partition, Resolution, ResolvedConfig};
use crate::config::Defaults;
use crate::definition::{AppliancesCatalog, RawDefinition};
use std::collections::HashSet;
use thiserror::Error;
use tracing;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Appliance '{0}' is not defined")]
    UnknownAppliance(String),
    #[error("Appliance '{appliance}' is composed of '{reference}', which is not defined")]
    UnknownReference {
        appliance: String,
        reference: String,
    },
}

/// Flattens composed appliance definitions into a single [`ResolvedConfig`].
///
/// Merge rules, applied to contributors in discovery order:
/// * `os`, `version` and `release` are overwritten by every contributor that
///   sets a non-empty value, so the last one wins;
/// * `cpus` and `memory` only ever grow;
/// * partitions are keyed by mount point and keep the largest size;
/// * repositories and packages are concatenated without de-duplication,
///   excludes being prefixed with [`EXCLUDE_MARKER`].
pub struct ApplianceConfigResolver<'a> {
    catalog: &'a AppliancesCatalog,
}

impl<'a> ApplianceConfigResolver<'a> {
    pub fn new(catalog: &'a AppliancesCatalog) -> Self {
        Self { catalog }
    }

    pub fn resolve_with_defaults(
        &self,
        requested: &str,
        defaults: &Defaults,
    ) -> Result<Resolution, ConfigurationError> {
        self.resolve(requested, ResolvedConfig::from_defaults(requested, defaults))
    }

    /// Merges every contributor of `requested` into `base`.
    ///
    /// `base` is consumed and only handed back on success.
    pub fn resolve(
        &self,
        requested: &str,
        mut base: ResolvedConfig,
    ) -> Result<Resolution, ConfigurationError> {
        tracing::debug!("Resolving appliance '{}'", requested);
        let contributors = discover_contributors(self.catalog, requested)?;

        base.name = requested.to_string();
        base.hardware
            .partitions
            .entry(ResolvedConfig::ROOT_PARTITION.to_string())
            .or_insert_with(|| Partition {
                root: ResolvedConfig::ROOT_PARTITION.to_string(),
                size: 0,
            });

        let mut listed: HashSet<String> = base.appliances.iter().cloned().collect();
        for name in &contributors.names {
            if listed.insert(name.clone()) {
                base.appliances.push(name.clone());
            }

            // Discovery only yields names present in the catalog.
            let Some(definition) = self.catalog.get(name) else {
                continue;
            };

            merge_metadata(&mut base, definition);
            merge_hardware(&mut base, definition);
            merge_repos(&mut base, definition);
            merge_packages(&mut base, definition);
        }

        tracing::debug!(
            "Resolved appliance '{}' from {} contributors: {} cpus, {} MB memory, {} GB disk",
            requested,
            base.appliances.len(),
            base.hardware.cpus,
            base.hardware.memory,
            base.disk_size()
        );

        Ok(Resolution {
            config: base,
            cycles: contributors.cycles,
        })
    }
}

/// Shorthand for a one-off resolution against `catalog`.
pub fn resolve_appliance(
    catalog: &AppliancesCatalog,
    requested: &str,
    defaults: &Defaults,
) -> Result<ResolvedConfig, ConfigurationError> {
    ApplianceConfigResolver::new(catalog)
        .resolve_with_defaults(requested, defaults)
        .map(|resolution| resolution.config)
}

fn overwrite(target: &mut String, value: Option<&str>) {
    if let Some(value) = value.filter(|value| !value.is_empty()) {
        *target = value.to_string();
    }
}

fn merge_metadata(config: &mut ResolvedConfig, definition: &RawDefinition) {
    if let Some(os) = &definition.os {
        overwrite(&mut config.os.name, os.name.as_deref());
        overwrite(&mut config.os.version, os.version.as_deref());
        overwrite(&mut config.os.password, os.password.as_deref());
    }

    overwrite(&mut config.version, definition.version.as_deref());
    overwrite(&mut config.release, definition.release.as_deref());
}

fn merge_hardware(config: &mut ResolvedConfig, definition: &RawDefinition) {
    let Some(hardware) = &definition.hardware else {
        return;
    };

    if let Some(cpus) = hardware.cpus {
        config.hardware.cpus = config.hardware.cpus.max(cpus);
    }
    if let Some(memory) = hardware.memory {
        config.hardware.memory = config.hardware.memory.max(memory);
    }

    for partition in &hardware.partitions {
        config
            .hardware
            .partitions
            .entry(partition.root.clone())
            .and_modify(|existing| existing.size = existing.size.max(partition.size))
            .or_insert_with(|| Partition {
                root: partition.root.clone(),
                size: partition.size,
            });
    }
}

fn merge_repos(config: &mut ResolvedConfig, definition: &RawDefinition) {
    config.repos.extend(definition.repos.iter().cloned());
}

fn merge_packages(config: &mut ResolvedConfig, definition: &RawDefinition) {
    let Some(packages) = &definition.packages else {
        return;
    };

    config.packages.extend(packages.includes.iter().cloned());
    config.packages.extend(
        packages
            .excludes
            .iter()
            .map(|package| format!("{EXCLUDE_MARKER}{package}")),
    );
}
