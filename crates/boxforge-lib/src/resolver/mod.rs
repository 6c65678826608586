mod discovery;
mod merge;
mod types;

pub use discovery::{Contributors, discover_contributors};
pub use merge::{ApplianceConfigResolver, ConfigurationError, resolve_appliance};
pub use types::{
    CompositionCycle, EXCLUDE_MARKER, HardwareConfig, OsConfig, Partition, Resolution,
    ResolvedConfig,
};
