use crate::config::Defaults;
use crate::definition::AppliancesCatalog;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
    /// One `<appliance>.json` per resolved appliance
    Directory(PathBuf),
}

#[derive(Debug, Clone)]
pub struct ResolveParams {
    pub catalog: AppliancesCatalog,
    pub defaults: Defaults,
    pub appliances: Vec<String>,
    pub output: OutputTarget,
}

#[derive(Debug, Clone)]
pub struct ValidateParams {
    pub catalog: AppliancesCatalog,
}

#[derive(Debug, Clone)]
pub struct ListParams {
    pub catalog: AppliancesCatalog,
}
