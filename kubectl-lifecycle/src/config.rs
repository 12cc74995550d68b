use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::endoflife::DEFAULT_BASE_URL;

/// Top-level configuration loaded from `.kubectl-lifecycle.yaml` or an explicit path.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub endoflife: EndOfLifeConfig,

  #[serde(default)]
  pub versions: VersionsConfig,

  #[serde(default)]
  pub nodes: NodesConfig,
}

/// Settings for the endoflife.date API client.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EndOfLifeConfig {
  /// Base URL of the API (default `https://endoflife.date/api`).
  #[serde(default = "default_base_url")]
  pub base_url: String,

  /// Timeout applied to each request, in seconds (default 2).
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

fn default_base_url() -> String {
  DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
  2
}

impl Default for EndOfLifeConfig {
  fn default() -> Self {
    Self {
      base_url: default_base_url(),
      timeout_secs: default_timeout_secs(),
    }
  }
}

impl EndOfLifeConfig {
  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs)
  }
}

/// Settings for the add-on compatibility check.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VersionsConfig {
  /// Namespaces searched for add-ons, in order.
  #[serde(default = "default_namespaces")]
  pub namespaces: Vec<String>,

  /// Alternate compatibility table; the embedded table is used when unset.
  #[serde(default)]
  pub components_file: Option<PathBuf>,
}

fn default_namespaces() -> Vec<String> {
  ["kube-system", "platform", "cert-manager"]
    .iter()
    .map(|ns| ns.to_string())
    .collect()
}

impl Default for VersionsConfig {
  fn default() -> Self {
    Self {
      namespaces: default_namespaces(),
      components_file: None,
    }
  }
}

/// Settings for the node listing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodesConfig {
  /// Node label shown in the `ROLE` column and used for sorting.
  #[serde(default = "default_role_label")]
  pub role_label: String,

  /// Node label shown in the `DETAIL` column.
  #[serde(default = "default_detail_label")]
  pub detail_label: String,
}

fn default_role_label() -> String {
  "kubernetes.io/role".to_string()
}

fn default_detail_label() -> String {
  "node.kubernetes.io/instance-type".to_string()
}

impl Default for NodesConfig {
  fn default() -> Self {
    Self {
      role_label: default_role_label(),
      detail_label: default_detail_label(),
    }
  }
}

const DEFAULT_CONFIG_FILE: &str = ".kubectl-lifecycle.yaml";

/// Loads the configuration from `path` when given; otherwise from
/// `.kubectl-lifecycle.yaml` in the working directory if it exists, else defaults
pub fn load(path: Option<&str>) -> Result<Config> {
  load_from(path.map(Path::new), std::env::current_dir().ok().as_deref())
}

fn load_from(explicit: Option<&Path>, working_dir: Option<&Path>) -> Result<Config> {
  if let Some(path) = explicit {
    return read(path);
  }

  match working_dir.map(|dir| dir.join(DEFAULT_CONFIG_FILE)) {
    Some(path) if path.is_file() => read(&path),
    _ => Ok(Config::default()),
  }
}

fn read(path: &Path) -> Result<Config> {
  let contents =
    std::fs::read_to_string(path).with_context(|| format!("Unable to read configuration: {}", path.display()))?;
  let config =
    serde_yaml::from_str(&contents).with_context(|| format!("Invalid configuration in {}", path.display()))?;
  debug!("Loaded configuration from {}", path.display());

  Ok(config)
}
