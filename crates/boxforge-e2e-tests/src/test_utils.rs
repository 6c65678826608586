use eyre::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const JEOS: &str = r#"
name: jeos
summary: Just enough operating system
os:
  name: fedora
  version: "13"
  password: jeos
hardware:
  cpus: 1
  memory: 512
  partitions:
    - root: /
      size: 2
repos:
  - name: fedora-updates
    mirrorlist: "https://mirrors.fedoraproject.org/metalink?repo=updates-released-f13"
packages:
  includes:
    - bash
    - openssh-server
  excludes:
    - sendmail
"#;

pub const HTTPD: &str = r#"
name: httpd
appliances:
  - jeos
hardware:
  memory: 1024
  partitions:
    - root: /var/www
      size: 5
packages:
  includes:
    - httpd
"#;

pub const POSTGRES: &str = r#"
name: postgres
appliances:
  - jeos
version: 8.4
hardware:
  cpus: 2
  memory: 768
  partitions:
    - root: /var/lib/pgsql
      size: 10
    - root: /
      size: 3
packages:
  includes:
    - postgresql-server
"#;

pub const WEB_STACK: &str = r#"
name: web-stack
summary: Apache in front of PostgreSQL
appliances:
  - httpd
  - postgres
version: "2.0"
release: "5"
repos:
  - name: local
    baseurl: "file:///srv/repo"
    ephemeral: true
"#;

/// Writes `definitions` as `<dir>/<name>/<name>.appl` files.
pub fn write_appliances(dir: &Path, definitions: &[(&str, &str)]) -> Result<PathBuf> {
    let appliances_dir = dir.join("appliances");
    for (name, content) in definitions {
        let appliance_dir = appliances_dir.join(name);
        std::fs::create_dir_all(&appliance_dir)?;
        std::fs::write(appliance_dir.join(format!("{name}.appl")), content)?;
    }
    Ok(appliances_dir)
}

pub fn setup_test_environment() -> Result<TempDir> {
    let temp_dir = tempfile::tempdir()?;

    write_appliances(
        temp_dir.path(),
        &[
            ("jeos", JEOS),
            ("httpd", HTTPD),
            ("postgres", POSTGRES),
            ("web-stack", WEB_STACK),
        ],
    )?;

    Ok(temp_dir)
}

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter("boxforge_lib=debug,boxforge_e2e_tests=debug")
        .with_test_writer()
        .try_init()
        .ok();
}

pub fn read_json(path: &Path) -> Result<serde_json::Value> {
    let content = std::fs::read_to_string(path)?;
    tracing::debug!("Read {} bytes from {}", content.len(), path.display());
    Ok(serde_json::from_str(&content)?)
}
