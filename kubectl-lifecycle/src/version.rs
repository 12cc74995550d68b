use std::{fmt, str::FromStr};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A `major.minor.patch` triple
///
/// Pre-release and build suffixes (e.g. the `-eksbuild.2` in `1.19.6-eksbuild.2`)
/// are accepted when parsing but discarded; two versions that differ only in
/// their suffix compare as equal. This deviates from strict semver precedence,
/// where a pre-release sorts below its release, because add-on image tags use
/// the suffix as a packaging revision rather than a pre-release marker
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SemanticVersion {
  pub major: u64,
  pub minor: u64,
  pub patch: u64,
}

impl FromStr for SemanticVersion {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let trimmed = strip_v(s);
    let parsed = semver::Version::parse(trimmed).map_err(|e| Error::Parse {
      input: s.to_owned(),
      reason: e.to_string(),
    })?;

    Ok(SemanticVersion {
      major: parsed.major,
      minor: parsed.minor,
      patch: parsed.patch,
    })
  }
}

impl fmt::Display for SemanticVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
  }
}

/// Removes a single leading `v`, if present
fn strip_v(version: &str) -> &str {
  version.strip_prefix('v').unwrap_or(version)
}

/// Returns true when `current` is strictly older than `required`
///
/// Equal versions are not out of date. Either string failing to parse is an
/// error; callers must not pass the `unknown` sentinel or a `latest` tag here
pub fn is_out_of_date(required: &str, current: &str) -> Result<bool, Error> {
  let required: SemanticVersion = required.parse()?;
  let current: SemanticVersion = current.parse()?;

  Ok(required > current)
}

/// Given a version, parse the minor version
///
/// For example, the format Amazon EKS of v1.20.7-eks-123456 returns 20
/// Or the format of v1.22.7 returns 22. The minor component must be all digits,
/// optionally followed by the `+` some providers append
pub(crate) fn parse_minor(version: &str) -> Result<u64> {
  let parts: Vec<&str> = version.split('.').collect();
  let minor_str = parts
    .get(1)
    .context(format!("Invalid version format '{version}', expected 'X.Y[.Z]'"))?;
  let digits = minor_str.strip_suffix('+').unwrap_or(minor_str);
  if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
    bail!("Invalid minor version in '{version}'");
  }
  let minor = digits
    .parse::<u64>()
    .with_context(|| format!("Invalid minor version in '{version}'"))?;

  Ok(minor)
}

/// The control plane's `major.minor` version
///
/// This is the granularity used both for endoflife.date release cycles and for
/// the keys of the add-on compatibility table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterVersion {
  pub major: u64,
  pub minor: u64,
}

impl ClusterVersion {
  /// Builds the version from the `major`/`minor` fields reported by the API server
  ///
  /// Some providers append a `+` to the minor version (e.g. `"19+"` on EKS)
  pub fn from_parts(major: &str, minor: &str) -> Result<Self> {
    let major = major
      .trim()
      .trim_end_matches('+')
      .parse::<u64>()
      .with_context(|| format!("Invalid server major version '{major}'"))?;
    let minor = minor
      .trim()
      .trim_end_matches('+')
      .parse::<u64>()
      .with_context(|| format!("Invalid server minor version '{minor}'"))?;

    Ok(ClusterVersion { major, minor })
  }

  /// Release cycle as used by endoflife.date, e.g. `1.19`
  pub fn cycle(&self) -> String {
    format!("{}.{}", self.major, self.minor)
  }

  /// Key into the compatibility table, e.g. `v1.19`
  pub fn table_key(&self) -> String {
    format!("v{}.{}", self.major, self.minor)
  }

  /// The next minor version the cluster would be upgraded to
  pub fn next(&self) -> Result<Self> {
    let minor = self
      .minor
      .checked_add(1)
      .with_context(|| format!("No minor version follows {self}"))?;

    Ok(ClusterVersion {
      major: self.major,
      minor,
    })
  }
}

impl FromStr for ClusterVersion {
  type Err = anyhow::Error;

  /// Accepts `v1.21`, `1.21` or a full version such as `v1.21.3-eks-123456`
  fn from_str(s: &str) -> Result<Self> {
    let trimmed = strip_v(s.trim());
    let major = trimmed
      .split('.')
      .next()
      .unwrap_or_default()
      .parse::<u64>()
      .with_context(|| format!("Invalid version format '{s}', expected 'X.Y[.Z]'"))?;
    let minor = parse_minor(trimmed)?;

    // Anything past `X.Y` has to be a full version, e.g. `1.21.3-eks-123456`
    if trimmed.splitn(3, '.').nth(2).is_some() {
      trimmed
        .parse::<SemanticVersion>()
        .with_context(|| format!("Invalid version format '{s}', expected 'X.Y[.Z]'"))?;
    }

    Ok(ClusterVersion { major, minor })
  }
}

impl fmt::Display for ClusterVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.cycle())
  }
}
