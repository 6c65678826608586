mod catalog;
mod loader;
mod model;

pub use catalog::{AppliancesCatalog, CatalogEntry};
pub(crate) use loader::file_stem;
pub use loader::{DEFINITION_EXTENSION, load_catalog, load_definition};
pub use model::{
    HardwareSpec, OsOverride, PackageSelection, PartitionSpec, RawDefinition, Repository,
};
