use super::merge::ConfigurationError;
use super::types::CompositionCycle;
use crate::definition::AppliancesCatalog;
use std::collections::HashSet;

/// Appliances taking part in one resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Contributors {
    /// Depth-first pre-order discovery sequence, requested appliance first
    pub names: Vec<String>,
    pub cycles: Vec<CompositionCycle>,
}

/// Walks the composition graph from `requested`, visiting every appliance once.
///
/// The walk keeps its own stack, so deep composition chains cannot overflow the
/// call stack. A reference to an appliance that was already visited is skipped;
/// when that appliance is still on the current path the edge closes a cycle and
/// is recorded in [`Contributors::cycles`].
pub fn discover_contributors(
    catalog: &AppliancesCatalog,
    requested: &str,
) -> Result<Contributors, ConfigurationError> {
    let root = catalog
        .get(requested)
        .ok_or_else(|| ConfigurationError::UnknownAppliance(requested.to_string()))?;

    let mut names = vec![requested.to_string()];
    let mut cycles = Vec::new();
    let mut visited: HashSet<&str> = HashSet::from([requested]);
    let mut on_path: HashSet<&str> = HashSet::from([requested]);
    let mut stack = vec![(requested, root.appliances.iter())];

    while let Some((current, references)) = stack.last_mut() {
        let current = *current;

        let Some(reference) = references.next() else {
            on_path.remove(current);
            stack.pop();
            continue;
        };
        let reference = reference.as_str();

        if visited.contains(reference) {
            if on_path.contains(reference) {
                tracing::warn!(
                    "Appliance '{}' composes '{}' which is already being expanded; skipping cyclic reference",
                    current,
                    reference
                );
                cycles.push(CompositionCycle {
                    from: current.to_string(),
                    to: reference.to_string(),
                });
            } else {
                tracing::trace!(
                    "Appliance '{}' already included, skipping reference from '{}'",
                    reference,
                    current
                );
            }
            continue;
        }

        let definition =
            catalog
                .get(reference)
                .ok_or_else(|| ConfigurationError::UnknownReference {
                    appliance: current.to_string(),
                    reference: reference.to_string(),
                })?;

        visited.insert(reference);
        on_path.insert(reference);
        names.push(reference.to_string());
        stack.push((reference, definition.appliances.iter()));
    }

    Ok(Contributors { names, cycles })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::RawDefinition;

    fn catalog(edges: &[(&str, &[&str])]) -> AppliancesCatalog {
        AppliancesCatalog::from_definitions(edges.iter().map(|(name, appliances)| {
            RawDefinition {
                name: name.to_string(),
                appliances: appliances.iter().map(|a| a.to_string()).collect(),
                ..Default::default()
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_preorder_discovery() {
        let catalog = catalog(&[
            ("root", &["a", "b"]),
            ("a", &["a1", "a2"]),
            ("b", &["b1"]),
            ("a1", &[]),
            ("a2", &[]),
            ("b1", &[]),
        ]);

        let contributors = discover_contributors(&catalog, "root").unwrap();

        assert_eq!(contributors.names, vec!["root", "a", "a1", "a2", "b", "b1"]);
        assert!(contributors.cycles.is_empty());
    }

    #[test]
    fn test_shared_dependency_is_listed_once() {
        let catalog = catalog(&[
            ("web", &["jeos", "httpd"]),
            ("httpd", &["jeos"]),
            ("jeos", &[]),
        ]);

        let contributors = discover_contributors(&catalog, "web").unwrap();

        assert_eq!(contributors.names, vec!["web", "jeos", "httpd"]);
        assert!(
            contributors.cycles.is_empty(),
            "a diamond is not a cycle: {:?}",
            contributors.cycles
        );
    }

    #[test]
    fn test_two_node_cycle_terminates() {
        let catalog = catalog(&[("x", &["y"]), ("y", &["x"])]);

        let contributors = discover_contributors(&catalog, "x").unwrap();

        assert_eq!(contributors.names, vec!["x", "y"]);
        assert_eq!(
            contributors.cycles,
            vec![CompositionCycle {
                from: "y".to_string(),
                to: "x".to_string(),
            }]
        );
    }

    #[test]
    fn test_self_reference_terminates() {
        let catalog = catalog(&[("loop", &["loop", "leaf"]), ("leaf", &[])]);

        let contributors = discover_contributors(&catalog, "loop").unwrap();

        assert_eq!(contributors.names, vec!["loop", "leaf"]);
        assert_eq!(contributors.cycles.len(), 1);
    }

    #[test]
    fn test_deep_chain_does_not_recurse() {
        let names: Vec<String> = (0..20_000).map(|i| format!("layer-{i}")).collect();
        let catalog = AppliancesCatalog::from_definitions(names.iter().enumerate().map(
            |(i, name)| RawDefinition {
                name: name.clone(),
                appliances: names.get(i + 1).cloned().into_iter().collect(),
                ..Default::default()
            },
        ))
        .unwrap();

        let contributors = discover_contributors(&catalog, "layer-0").unwrap();

        assert_eq!(contributors.names, names);
    }

    #[test]
    fn test_unknown_requested_appliance() {
        let catalog = catalog(&[("jeos", &[])]);

        let err = discover_contributors(&catalog, "missing").unwrap_err();

        assert_eq!(err, ConfigurationError::UnknownAppliance("missing".to_string()));
    }

    #[test]
    fn test_unknown_reference() {
        let catalog = catalog(&[("web", &["jeos", "ghost"]), ("jeos", &[])]);

        let err = discover_contributors(&catalog, "web").unwrap_err();

        assert_eq!(
            err,
            ConfigurationError::UnknownReference {
                appliance: "web".to_string(),
                reference: "ghost".to_string(),
            }
        );
    }
}
