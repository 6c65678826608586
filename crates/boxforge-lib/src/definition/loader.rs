use super::catalog::AppliancesCatalog;
use super::model::RawDefinition;
use crate::error::BoxForgeError;
use std::path::{Path, PathBuf};

pub const DEFINITION_EXTENSION: &str = "appl";

/// Loads every `.appl` file found in `dir` or one directory below it.
pub fn load_catalog(dir: &Path) -> Result<AppliancesCatalog, BoxForgeError> {
    tracing::info!("Loading appliance definitions from {}", dir.display());

    let mut catalog = AppliancesCatalog::new();
    for path in discover_definition_files(dir)? {
        let content = read_definition_file(&path)?;
        let definition = parse_definition(&path, &content)?;
        tracing::debug!(
            "Loaded appliance '{}' from {}",
            definition.name,
            path.display()
        );
        catalog.insert_loaded(definition, path, content)?;
    }

    tracing::info!("Loaded {} appliance definitions", catalog.len());
    Ok(catalog)
}

pub fn load_definition(path: &Path) -> Result<RawDefinition, BoxForgeError> {
    let content = read_definition_file(path)?;
    parse_definition(path, &content)
}

fn read_definition_file(path: &Path) -> Result<Vec<u8>, BoxForgeError> {
    std::fs::read(path).map_err(|e| BoxForgeError::DefinitionLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn parse_definition(path: &Path, content: &[u8]) -> Result<RawDefinition, BoxForgeError> {
    let load_error = |reason: String| BoxForgeError::DefinitionLoad {
        path: path.to_path_buf(),
        reason,
    };

    let mut definition: RawDefinition = serde_yaml::from_slice(content)
        .map_err(|e| load_error(format!("YAML parsing failed: {}", e)))?;

    if definition.name.is_empty() {
        definition.name = file_stem(path).ok_or_else(|| {
            load_error("definition has no name and the file name is not valid UTF-8".to_string())
        })?;
    }

    Ok(definition)
}

pub(crate) fn file_stem(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
}

fn discover_definition_files(dir: &Path) -> Result<Vec<PathBuf>, BoxForgeError> {
    if !dir.is_dir() {
        return Err(BoxForgeError::DefinitionLoad {
            path: dir.to_path_buf(),
            reason: "appliances directory does not exist".to_string(),
        });
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            for nested in std::fs::read_dir(&path)? {
                let nested = nested?.path();
                if is_definition_file(&nested) {
                    files.push(nested);
                }
            }
        } else if is_definition_file(&path) {
            files.push(path);
        }
    }

    // Directory iteration order is platform dependent.
    files.sort();
    Ok(files)
}

fn is_definition_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .is_some_and(|extension| extension == DEFINITION_EXTENSION)
}
