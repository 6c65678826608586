use crate::cli::{OutputTarget, ResolveParams};
use crate::error::BoxForgeError;
use crate::output::ResolutionDocument;
use crate::resolver::ApplianceConfigResolver;
use std::io::Write;
use tracing;

pub fn run_resolve(params: ResolveParams) -> Result<Vec<ResolutionDocument>, BoxForgeError> {
    let ResolveParams {
        catalog,
        defaults,
        appliances,
        output,
    } = params;

    let resolver = ApplianceConfigResolver::new(&catalog);
    let mut documents = Vec::with_capacity(appliances.len());

    for appliance in &appliances {
        tracing::info!("Resolving appliance {}", appliance);
        // Skipped cyclic references are already logged during discovery.
        let config = resolver
            .resolve_with_defaults(appliance, &defaults)?
            .config;
        tracing::info!(
            "Appliance {} is composed of [{}] and needs {} GB of disk",
            config.name,
            config.appliances.join(", "),
            config.disk_size()
        );

        let definitions_hash = catalog.definitions_hash(&config.appliances)?;
        documents.push(ResolutionDocument::new(definitions_hash, config));
    }

    match &output {
        OutputTarget::Stdout => {
            let mut stdout = std::io::stdout().lock();
            for document in &documents {
                writeln!(stdout, "{}", document.to_json()?)?;
            }
        }
        OutputTarget::File(path) => {
            for document in &documents {
                tracing::info!("Writing resolved configuration to {}", path.display());
                document.save_to_file(path)?;
            }
        }
        OutputTarget::Directory(dir) => {
            for document in &documents {
                let path = dir.join(format!("{}.json", document.config.name));
                tracing::info!("Writing resolved configuration to {}", path.display());
                document.save_to_file(&path)?;
            }
        }
    }

    tracing::info!("Resolved {} appliances", documents.len());
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Defaults;
    use crate::definition::{AppliancesCatalog, RawDefinition};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn appliance(name: &str, appliances: &[&str]) -> RawDefinition {
        RawDefinition {
            name: name.to_string(),
            appliances: appliances.iter().map(|a| a.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_cyclic_reference_is_logged_once() {
        let dir = tempfile::tempdir().unwrap();
        let output_path = dir.path().join("x.json");
        let params = ResolveParams {
            catalog: AppliancesCatalog::from_definitions([
                appliance("x", &["y"]),
                appliance("y", &["x"]),
            ])
            .unwrap(),
            defaults: Defaults::default(),
            appliances: vec!["x".to_string()],
            output: OutputTarget::File(output_path.clone()),
        };

        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let documents = tracing::subscriber::with_default(subscriber, || run_resolve(params))
            .expect("Resolution should tolerate cycles");

        assert_eq!(documents[0].config.appliances, vec!["x", "y"]);
        assert!(output_path.is_file());

        let logs = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert_eq!(logs.matches("cyclic reference").count(), 1, "{logs}");
    }
}
