use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BoxForgeError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Appliance resolution error: {0}")]
    Resolution(#[from] crate::resolver::ConfigurationError),

    #[error("Failed to load appliance definition from {path}: {reason}")]
    DefinitionLoad { path: PathBuf, reason: String },

    #[error("Appliance '{name}' is defined twice: in {first} and in {second}")]
    DuplicateAppliance {
        name: String,
        first: String,
        second: String,
    },

    #[error("Appliance catalog validation failed: {details}")]
    CatalogValidation { details: String },

    #[error("Invalid command line arguments: {details}")]
    CliArgumentValidation { details: String },

    #[error("Failed to load resolution document from {path}: {reason}")]
    DocumentLoad { path: PathBuf, reason: String },

    #[error("Failed to write resolved configuration to {path}: {reason}")]
    OutputWrite { path: PathBuf, reason: String },

    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected error: {0}")]
    Unexpected(#[from] eyre::Report),
}
