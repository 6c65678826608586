use crate::cli::ListParams;
use crate::definition::AppliancesCatalog;
use crate::error::BoxForgeError;
use crate::resolver::discover_contributors;
use itertools::Itertools;
use std::io::Write;

/// One line per appliance: its name, summary and flattened composition.
///
/// Appliances whose composition cannot be flattened are still listed, with the
/// reason in place of their contributors.
pub fn list_appliances(catalog: &AppliancesCatalog) -> Vec<String> {
    catalog
        .iter()
        .map(|(name, entry)| {
            let mut line = name.to_string();
            if let Some(summary) = &entry.definition.summary {
                line.push_str(&format!(" - {}", summary));
            }

            match discover_contributors(catalog, name) {
                Ok(contributors) => {
                    let composed_of = contributors.names.iter().skip(1).join(", ");
                    if !composed_of.is_empty() {
                        line.push_str(&format!(" (composed of: {})", composed_of));
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        "Cannot list the composition of '{}': {}. Run `boxforge validate` for details",
                        name,
                        e
                    );
                    line.push_str(&format!(" (broken composition: {})", e));
                }
            }
            line
        })
        .collect()
}

pub fn run_list(params: ListParams) -> Result<(), BoxForgeError> {
    let ListParams { catalog } = params;

    let mut stdout = std::io::stdout().lock();
    for line in list_appliances(&catalog) {
        writeln!(stdout, "{}", line)?;
    }

    Ok(())
}
