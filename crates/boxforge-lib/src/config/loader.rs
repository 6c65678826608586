use super::Defaults;
use crate::error::BoxForgeError;
use config::Config as ConfigBuilder;

/// Environment variables starting with this prefix override defaults,
/// e.g. `BOXFORGE_HARDWARE__MEMORY=512`.
pub const ENV_PREFIX: &str = "BOXFORGE";

/// Keys of [`Defaults`] that can be overridden from the environment, as the
/// `config` crate sees them after stripping the prefix.
const ENV_KEYS: &[&str] = &[
    "os__name",
    "os__version",
    "os__password",
    "version",
    "release",
    "hardware__cpus",
    "hardware__memory",
    "hardware__partition",
];

pub fn load_defaults(defaults_path: Option<&str>) -> Result<Defaults, BoxForgeError> {
    load_defaults_with_env(defaults_path, std::env::vars())
}

fn load_defaults_with_env(
    defaults_path: Option<&str>,
    env: impl IntoIterator<Item = (String, String)>,
) -> Result<Defaults, BoxForgeError> {
    let builtin = Defaults::default();

    let mut config_builder = ConfigBuilder::builder()
        .set_default("os.name", builtin.os.name)?
        .set_default("os.version", builtin.os.version)?
        .set_default("os.password", builtin.os.password)?
        .set_default("version", builtin.version)?
        .set_default("release", builtin.release)?
        .set_default("hardware.cpus", i64::from(builtin.hardware.cpus))?
        .set_default("hardware.memory", i64::from(builtin.hardware.memory))?
        .set_default("hardware.partition", builtin.hardware.partition as i64)?;

    if let Some(defaults_path) = defaults_path {
        tracing::info!("Loading defaults from {}", defaults_path);
        config_builder = config_builder.add_source(config::File::with_name(defaults_path));
    }

    config_builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .source(Some(known_env_overrides(env))),
        )
        .build()?
        .try_deserialize()
        .map_err(Into::into)
}

/// Keeps only the variables that name a defaults key. Other `BOXFORGE_*`
/// variables, such as logging settings, belong to someone else.
fn known_env_overrides(
    env: impl IntoIterator<Item = (String, String)>,
) -> config::Map<String, String> {
    env.into_iter()
        .filter(|(key, _)| {
            key.strip_prefix(ENV_PREFIX)
                .and_then(|rest| rest.strip_prefix('_'))
                .is_some_and(|rest| ENV_KEYS.contains(&rest.to_lowercase().as_str()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_defaults_without_file() {
        let defaults = load_defaults(None).unwrap();

        assert_eq!(defaults, Defaults::default());
    }

    #[test]
    fn test_file_overrides_selected_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("defaults.yaml");
        std::fs::write(
            &path,
            "hardware:\n  memory: 1024\n  partition: 4\nos:\n  name: centos\n  version: \"5\"\n",
        )
        .unwrap();

        let defaults = load_defaults(Some(path.to_str().unwrap())).unwrap();

        assert_eq!(defaults.hardware.memory, 1024);
        assert_eq!(defaults.hardware.partition, 4);
        assert_eq!(defaults.hardware.cpus, 1);
        assert_eq!(defaults.os.name, "centos");
        assert_eq!(defaults.os.version, "5");
        assert_eq!(defaults.os.password, "boxgrinder");
        assert_eq!(defaults.release, "0");
    }

    fn env(vars: &[(&str, &str)]) -> Vec<(String, String)> {
        vars.iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn test_environment_overrides_known_keys() {
        let defaults = load_defaults_with_env(
            None,
            env(&[
                ("BOXFORGE_HARDWARE__MEMORY", "512"),
                ("BOXFORGE_OS__NAME", "centos"),
                ("BOXFORGE_RELEASE", "3"),
            ]),
        )
        .unwrap();

        assert_eq!(defaults.hardware.memory, 512);
        assert_eq!(defaults.os.name, "centos");
        assert_eq!(defaults.release, "3");
        assert_eq!(defaults.hardware.cpus, 1);
    }

    #[test]
    fn test_unrelated_prefixed_variables_are_ignored() {
        let defaults = load_defaults_with_env(
            None,
            env(&[
                ("BOXFORGE_LOG", "debug"),
                ("BOXFORGE_HARDWARE__DISK", "40"),
                ("BOXFORGEX_VERSION", "9"),
                ("PATH", "/usr/bin"),
            ]),
        )
        .unwrap();

        assert_eq!(defaults, Defaults::default());
    }

    #[test]
    fn test_missing_defaults_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.yaml");

        let err = load_defaults(Some(path.to_str().unwrap())).unwrap_err();

        assert!(matches!(err, BoxForgeError::Config(_)));
    }
}
