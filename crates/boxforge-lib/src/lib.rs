pub mod cli;
pub mod config;
pub mod definition;
pub mod error;
pub mod output;
pub mod resolver;
pub mod validation;

pub use config::Defaults;
pub use definition::{AppliancesCatalog, RawDefinition};
pub use error::BoxForgeError;
pub use resolver::{ApplianceConfigResolver, ResolvedConfig};
