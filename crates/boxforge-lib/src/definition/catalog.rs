use super::model::RawDefinition;
use crate::error::BoxForgeError;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct CatalogEntry {
    pub definition: RawDefinition,
    /// File the definition was read from, if it came from disk
    pub source: Option<PathBuf>,
    /// Bytes the definition was parsed from
    pub content: Option<Vec<u8>>,
}

impl CatalogEntry {
    fn describe_source(&self) -> String {
        self.source
            .as_deref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "<in-memory definition>".to_string())
    }
}

/// All known appliance definitions keyed by appliance name.
///
/// The catalog is built once before resolution and only read afterwards, so it
/// can be shared by reference between any number of resolutions.
#[derive(Clone, Debug, Default)]
pub struct AppliancesCatalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl AppliancesCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_definitions(
        definitions: impl IntoIterator<Item = RawDefinition>,
    ) -> Result<Self, BoxForgeError> {
        let mut catalog = Self::new();
        for definition in definitions {
            catalog.insert(definition, None)?;
        }
        Ok(catalog)
    }

    pub fn insert(
        &mut self,
        definition: RawDefinition,
        source: Option<PathBuf>,
    ) -> Result<(), BoxForgeError> {
        self.insert_entry(CatalogEntry {
            definition,
            source,
            content: None,
        })
    }

    /// Inserts a definition together with the file contents it was parsed from.
    pub fn insert_loaded(
        &mut self,
        definition: RawDefinition,
        source: PathBuf,
        content: Vec<u8>,
    ) -> Result<(), BoxForgeError> {
        self.insert_entry(CatalogEntry {
            definition,
            source: Some(source),
            content: Some(content),
        })
    }

    fn insert_entry(&mut self, entry: CatalogEntry) -> Result<(), BoxForgeError> {
        if let Some(existing) = self.entries.get(&entry.definition.name) {
            return Err(BoxForgeError::DuplicateAppliance {
                name: entry.definition.name.clone(),
                first: existing.describe_source(),
                second: entry.describe_source(),
            });
        }

        self.entries.insert(entry.definition.name.clone(), entry);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&RawDefinition> {
        self.entries.get(name).map(|entry| &entry.definition)
    }

    pub fn entry(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CatalogEntry)> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// SHA-256 over the given appliances' definitions, in the given order.
    ///
    /// Definitions loaded from disk contribute the file contents captured when
    /// they were loaded, others their JSON form. The files are not read again,
    /// so the hash always describes the definitions that were resolved.
    /// Downstream stages compare it against a previous run to detect stale
    /// resolved configurations.
    pub fn definitions_hash(&self, names: &[String]) -> Result<String, BoxForgeError> {
        let mut hasher = Sha256::new();

        for name in names {
            let Some(entry) = self.entries.get(name) else {
                continue;
            };

            hasher.update(name.as_bytes());
            hasher.update([0u8]);
            match entry.content.as_deref() {
                Some(content) => hasher.update(content),
                None => hasher.update(serde_json::to_vec(&entry.definition)?),
            }
            hasher.update([0u8]);
        }

        Ok(format!("{:x}", hasher.finalize()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(name: &str) -> RawDefinition {
        RawDefinition {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let mut catalog = AppliancesCatalog::new();
        catalog
            .insert(definition("base"), Some(PathBuf::from("a/base.appl")))
            .unwrap();

        let err = catalog
            .insert(definition("base"), Some(PathBuf::from("b/base.appl")))
            .unwrap_err();

        match err {
            BoxForgeError::DuplicateAppliance {
                name,
                first,
                second,
            } => {
                assert_eq!(name, "base");
                assert_eq!(first, "a/base.appl");
                assert_eq!(second, "b/base.appl");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_names_are_sorted() {
        let catalog = AppliancesCatalog::from_definitions([
            definition("web"),
            definition("base"),
            definition("db"),
        ])
        .unwrap();

        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["base", "db", "web"]);
        assert!(catalog.contains("db"));
        assert!(!catalog.contains("mail"));
    }

    #[test]
    fn test_definitions_hash_depends_on_content_and_order() {
        let mut web = definition("web");
        web.appliances = vec!["base".to_string()];
        let catalog = AppliancesCatalog::from_definitions([definition("base"), web]).unwrap();

        let forward = catalog
            .definitions_hash(&["web".to_string(), "base".to_string()])
            .unwrap();
        let again = catalog
            .definitions_hash(&["web".to_string(), "base".to_string()])
            .unwrap();
        let reversed = catalog
            .definitions_hash(&["base".to_string(), "web".to_string()])
            .unwrap();

        assert_eq!(forward, again);
        assert_ne!(forward, reversed);
        assert_eq!(forward.len(), 64);
    }
}
