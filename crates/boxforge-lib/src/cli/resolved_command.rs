use crate::cli::args::Command;
use crate::cli::params::{ListParams, OutputTarget, ResolveParams, ValidateParams};
use crate::config::load_defaults;
use crate::definition::{AppliancesCatalog, load_catalog};
use crate::error::BoxForgeError;
use crate::validation::validate_catalog;
use itertools::Itertools;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub enum ResolvedCommand {
    Resolve(ResolveParams),
    Validate(ValidateParams),
    List(ListParams),
}

pub fn resolve_command(command: Command) -> Result<ResolvedCommand, BoxForgeError> {
    match command {
        Command::Resolve {
            appliances_dir,
            defaults_path,
            appliances,
            all,
            output_path,
            skip_validation,
        } => {
            let catalog = load_non_empty_catalog(&appliances_dir)?;

            if skip_validation {
                tracing::warn!("Skipping validation of appliance definitions");
            } else {
                validate_catalog(&catalog).into_result()?;
            }

            let appliances: Vec<String> = if all {
                catalog.names().map(str::to_string).collect()
            } else {
                appliances.into_iter().unique().collect()
            };

            if appliances.is_empty() {
                return Err(BoxForgeError::CliArgumentValidation {
                    details: "No appliances requested. Pass appliance names or --all.".to_string(),
                });
            }

            let output = match output_path {
                Some(path) if appliances.len() == 1 && !all => {
                    OutputTarget::File(PathBuf::from(path))
                }
                Some(path) => OutputTarget::Directory(PathBuf::from(path)),
                None if appliances.len() == 1 => OutputTarget::Stdout,
                None => {
                    return Err(BoxForgeError::CliArgumentValidation {
                        details: "Several appliances requested. Pass --output with a directory to write them to.".to_string(),
                    });
                }
            };

            let defaults = load_defaults(defaults_path.as_deref())?;

            Ok(ResolvedCommand::Resolve(ResolveParams {
                catalog,
                defaults,
                appliances,
                output,
            }))
        }
        Command::Validate { appliances_dir } => {
            let catalog = load_non_empty_catalog(&appliances_dir)?;
            Ok(ResolvedCommand::Validate(ValidateParams { catalog }))
        }
        Command::List { appliances_dir } => {
            let catalog = load_non_empty_catalog(&appliances_dir)?;
            Ok(ResolvedCommand::List(ListParams { catalog }))
        }
    }
}

fn load_non_empty_catalog(appliances_dir: &str) -> Result<AppliancesCatalog, BoxForgeError> {
    let catalog = load_catalog(Path::new(appliances_dir))?;

    if catalog.is_empty() {
        return Err(BoxForgeError::CliArgumentValidation {
            details: format!(
                "There are no appliance definitions in '{}'. Add <name>/<name>.appl files or pass --appliances-dir.",
                appliances_dir
            ),
        });
    }

    Ok(catalog)
}
