use crate::error::BoxForgeError;
use crate::resolver::ResolvedConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What downstream build stages read: a resolved configuration together with
/// a fingerprint of the definitions it was produced from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionDocument {
    /// Version of the document format
    pub format_version: u32,
    /// Hash of the contributing definition files
    pub definitions_hash: String,
    pub config: ResolvedConfig,
}

impl ResolutionDocument {
    pub const FORMAT_VERSION: u32 = 1;

    pub fn new(definitions_hash: String, config: ResolvedConfig) -> Self {
        Self {
            format_version: Self::FORMAT_VERSION,
            definitions_hash,
            config,
        }
    }

    pub fn to_json(&self) -> Result<String, BoxForgeError> {
        serde_json::to_string_pretty(self).map_err(Into::into)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), BoxForgeError> {
        let json = self.to_json().map_err(|e| BoxForgeError::OutputWrite {
            path: path.to_path_buf(),
            reason: format!("JSON serialization failed: {}", e),
        })?;

        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| BoxForgeError::OutputWrite {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        }

        std::fs::write(path, json).map_err(|e| BoxForgeError::OutputWrite {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(())
    }

    pub fn load_from_file(path: &Path) -> Result<Self, BoxForgeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| BoxForgeError::DocumentLoad {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        let document: ResolutionDocument =
            serde_json::from_str(&content).map_err(|e| BoxForgeError::DocumentLoad {
                path: path.to_path_buf(),
                reason: format!("JSON parsing failed: {}", e),
            })?;

        if document.format_version != Self::FORMAT_VERSION {
            return Err(BoxForgeError::DocumentLoad {
                path: path.to_path_buf(),
                reason: format!(
                    "document format version {} is not supported. Expected version {}",
                    document.format_version,
                    Self::FORMAT_VERSION
                ),
            });
        }

        Ok(document)
    }
}
