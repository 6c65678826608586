use crate::config::Defaults;
use crate::definition::Repository;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Prefix marking an entry of [`ResolvedConfig::packages`] as an exclude.
pub const EXCLUDE_MARKER: char = '-';

/// Fully merged, build-ready configuration of one appliance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedConfig {
    /// Name of the requested appliance
    pub name: String,
    /// Every contributing appliance in discovery order, the requested one first
    pub appliances: Vec<String>,
    pub os: OsConfig,
    pub version: String,
    pub release: String,
    pub hardware: HardwareConfig,
    pub repos: Vec<Repository>,
    /// Package specifiers; excludes carry the [`EXCLUDE_MARKER`] prefix
    pub packages: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsConfig {
    pub name: String,
    pub version: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareConfig {
    pub cpus: u32,
    /// Memory in megabytes
    pub memory: u32,
    /// Partitions keyed by mount point
    pub partitions: BTreeMap<String, Partition>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    pub root: String,
    /// Size in gigabytes
    pub size: u64,
}

impl ResolvedConfig {
    pub const ROOT_PARTITION: &'static str = "/";

    /// Accumulator for `name` holding only system defaults.
    pub fn from_defaults(name: &str, defaults: &Defaults) -> Self {
        let mut partitions = BTreeMap::new();
        partitions.insert(
            Self::ROOT_PARTITION.to_string(),
            Partition {
                root: Self::ROOT_PARTITION.to_string(),
                size: defaults.hardware.partition,
            },
        );

        Self {
            name: name.to_string(),
            appliances: Vec::new(),
            os: OsConfig {
                name: defaults.os.name.clone(),
                version: defaults.os.version.clone(),
                password: defaults.os.password.clone(),
            },
            version: defaults.version.clone(),
            release: defaults.release.clone(),
            hardware: HardwareConfig {
                cpus: defaults.hardware.cpus,
                memory: defaults.hardware.memory,
                partitions,
            },
            repos: Vec::new(),
            packages: Vec::new(),
        }
    }

    /// Total disk size in gigabytes, saturating at `u64::MAX`.
    pub fn disk_size(&self) -> u64 {
        self.hardware
            .partitions
            .values()
            .fold(0u64, |total, partition| total.saturating_add(partition.size))
    }

    pub fn included_packages(&self) -> impl Iterator<Item = &str> {
        self.packages
            .iter()
            .filter(|package| !package.starts_with(EXCLUDE_MARKER))
            .map(String::as_str)
    }

    pub fn excluded_packages(&self) -> impl Iterator<Item = &str> {
        self.packages
            .iter()
            .filter_map(|package| package.strip_prefix(EXCLUDE_MARKER))
    }
}

/// A composition reference that pointed back at an appliance still being
/// expanded and was therefore skipped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionCycle {
    pub from: String,
    pub to: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub config: ResolvedConfig,
    /// Back edges skipped during contributor discovery; never affects `config`
    pub cycles: Vec<CompositionCycle>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_defaults_has_root_partition() {
        let config = ResolvedConfig::from_defaults("jeos", &Defaults::default());

        assert_eq!(config.name, "jeos");
        assert!(config.appliances.is_empty());
        assert_eq!(config.hardware.partitions.len(), 1);
        assert_eq!(config.hardware.partitions["/"].size, 1);
        assert_eq!(config.disk_size(), 1);
    }

    #[test]
    fn test_disk_size_saturates_instead_of_overflowing() {
        let mut config = ResolvedConfig::from_defaults("jeos", &Defaults::default());
        for root in ["/var", "/home"] {
            config.hardware.partitions.insert(
                root.to_string(),
                Partition {
                    root: root.to_string(),
                    size: u64::MAX,
                },
            );
        }

        assert_eq!(config.disk_size(), u64::MAX);
    }

    #[test]
    fn test_package_views_split_on_exclude_marker() {
        let mut config = ResolvedConfig::from_defaults("jeos", &Defaults::default());
        config.packages = vec![
            "httpd".to_string(),
            "-sendmail".to_string(),
            "vim-enhanced".to_string(),
        ];

        assert_eq!(
            config.included_packages().collect::<Vec<_>>(),
            vec!["httpd", "vim-enhanced"]
        );
        assert_eq!(config.excluded_packages().collect::<Vec<_>>(), vec!["sendmail"]);
    }
}
