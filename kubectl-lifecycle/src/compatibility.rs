use std::{collections::BTreeMap, path::Path};

use anyhow::{Context, Result};
use rust_embed::RustEmbed;
use serde::{Deserialize, Serialize};
use tabled::Tabled;
use tracing::debug;

use crate::{error::Error, version};

/// Returned by [`CompatibilityTable::required_version`] when there is no entry
/// for the Kubernetes version and component pair
pub const UNKNOWN: &str = "unknown";

/// Image tag that is never considered out of date
pub const LATEST: &str = "latest";

/// Minimum version of a component required for a given Kubernetes version
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentRequirement {
  #[serde(rename = "Name", alias = "name")]
  pub name: String,
  #[serde(rename = "Version", alias = "version")]
  pub version: String,
}

/// A component running in the cluster, as extracted from a workload's container image
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedComponent {
  pub name: String,
  pub namespace: String,
  pub kind: String,
  /// Image tag; a semantic version, `latest`, or any other opaque tag
  pub version: String,
}

/// Result of checking one component against the table
#[derive(Clone, Debug, Serialize, Deserialize, Tabled)]
#[tabled(rename_all = "UpperCase")]
pub struct ComponentStatus {
  #[tabled(rename = "SERVICE")]
  pub name: String,
  #[tabled(skip)]
  pub namespace: String,
  #[tabled(skip)]
  pub kind: String,
  #[tabled(rename = "OUT OF DATE")]
  pub out_of_date: bool,
  #[tabled(rename = "CURRENT VERSION")]
  pub current_version: String,
  #[tabled(rename = "REQUIRED VERSION")]
  pub required_version: String,
}

/// Contains the static table of minimum add-on versions in JSON format
#[derive(RustEmbed)]
#[folder = "data/"]
struct Data;

const COMPONENTS_FILE: &str = "components.json";

/// Maps a Kubernetes minor version (e.g. `v1.19`) to the minimum versions of the
/// add-ons that are compatible with it
///
/// The table is loaded once and never modified afterwards
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompatibilityTable {
  versions: BTreeMap<String, Vec<ComponentRequirement>>,
}

impl CompatibilityTable {
  /// Loads the table bundled with the binary
  pub fn embedded() -> Result<Self> {
    let file = Data::get(COMPONENTS_FILE).ok_or_else(|| Error::Table(format!("{COMPONENTS_FILE} is not embedded")))?;
    let contents = std::str::from_utf8(file.data.as_ref()).map_err(|e| Error::Table(e.to_string()))?;

    Ok(Self::from_json(contents)?)
  }

  /// Loads a table from a file on disk, replacing the embedded one
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let contents =
      std::fs::read_to_string(path).with_context(|| format!("Failed to read components file: {}", path.display()))?;
    let table = Self::from_json(&contents).with_context(|| format!("Failed to parse components file: {}", path.display()))?;
    debug!("Loaded compatibility table from {}", path.display());

    Ok(table)
  }

  pub fn from_json(contents: &str) -> Result<Self, Error> {
    serde_json::from_str(contents).map_err(|e| Error::Table(e.to_string()))
  }

  /// Kubernetes versions present in the table, in sorted order
  pub fn kubernetes_versions(&self) -> impl Iterator<Item = &str> {
    self.versions.keys().map(String::as_str)
  }

  /// Returns the minimum required version of `component` for `kubernetes_version`
  ///
  /// Both keys are matched exactly; there is no fallback to a neighboring minor
  /// version. Returns [`UNKNOWN`] when either key is absent
  pub fn required_version(&self, kubernetes_version: &str, component: &str) -> &str {
    self
      .versions
      .get(kubernetes_version)
      .and_then(|reqs| reqs.iter().find(|r| r.name == component))
      .map(|r| r.version.as_str())
      .unwrap_or(UNKNOWN)
  }

  /// Checks a single observed component
  ///
  /// Returns `None` when the table has no requirement for the component, in which
  /// case the component is skipped rather than reported
  pub fn evaluate(&self, kubernetes_version: &str, component: &ObservedComponent) -> Result<Option<ComponentStatus>> {
    let required = self.required_version(kubernetes_version, &component.name);
    if required == UNKNOWN {
      debug!(
        "No requirement for {} on {kubernetes_version}, skipping",
        component.name
      );
      return Ok(None);
    }

    let out_of_date = if component.version == LATEST {
      false
    } else {
      version::is_out_of_date(required, &component.version).with_context(|| {
        format!(
          "Unable to compare versions for component '{}' (current: '{}', required: '{required}')",
          component.name, component.version
        )
      })?
    };

    Ok(Some(ComponentStatus {
      name: component.name.to_owned(),
      namespace: component.namespace.to_owned(),
      kind: component.kind.to_owned(),
      out_of_date,
      current_version: component.version.to_owned(),
      required_version: required.to_owned(),
    }))
  }

  /// Checks all components in the order given; the first error aborts the check
  pub fn check_components(
    &self,
    kubernetes_version: &str,
    components: &[ObservedComponent],
  ) -> Result<Vec<ComponentStatus>> {
    components.iter().try_fold(Vec::new(), |mut statuses, component| {
      if let Some(status) = self.evaluate(kubernetes_version, component)? {
        statuses.push(status);
      }
      Ok(statuses)
    })
  }
}
