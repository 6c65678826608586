use serde::{Deserialize, Serialize};

/// System-wide values every resolution starts from before any appliance
/// definition is merged in.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Defaults {
    pub os: OsDefaults,
    pub version: String,
    pub release: String,
    pub hardware: HardwareDefaults,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct OsDefaults {
    pub name: String,
    pub version: String,
    pub password: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct HardwareDefaults {
    pub cpus: u32,
    /// Memory in megabytes
    pub memory: u32,
    /// Size of the implicit `/` partition in gigabytes
    pub partition: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            os: OsDefaults {
                name: "fedora".to_string(),
                version: "11".to_string(),
                password: "boxgrinder".to_string(),
            },
            version: "1.0".to_string(),
            release: "0".to_string(),
            hardware: HardwareDefaults {
                cpus: 1,
                memory: 256,
                partition: 1,
            },
        }
    }
}
