use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::{
  config::NodesConfig,
  endoflife::{EolRecord, Expiry, Product},
  k8s::{Node, NodeCondition},
};

const NONE: &str = "<none>";

/// End-of-life status of a single release cycle
#[derive(Clone, Debug, Serialize, Deserialize, Tabled)]
#[tabled(rename_all = "UpperCase")]
pub struct EolStatus {
  #[tabled(rename = "TYPE", display = "display_product")]
  pub product: Product,
  pub version: String,
  #[tabled(rename = "EOL DATE")]
  pub eol: String,
  #[tabled(rename = "DAYS LEFT")]
  pub days_left: i64,
  #[tabled(skip)]
  pub expired: bool,
  #[tabled(skip)]
  pub in_expiry_range: bool,
}

fn display_product(product: &Product) -> String {
  product.label().to_string()
}

impl EolStatus {
  /// Evaluates the record against `now` and the expiry range threshold
  pub fn evaluate(record: &EolRecord, now: DateTime<Utc>, threshold_days: i64) -> Result<Self> {
    let eol = record.eol_date().with_context(|| {
      format!(
        "Invalid end-of-life date for {} {}",
        record.product.label(),
        record.version
      )
    })?;
    let expiry = Expiry::evaluate(eol, now, threshold_days);

    Ok(EolStatus {
      product: record.product,
      version: record.version.to_owned(),
      eol: record.eol.to_owned(),
      days_left: expiry.days_left,
      expired: expiry.expired,
      in_expiry_range: expiry.in_expiry_range,
    })
  }

  pub fn is_failing(&self) -> bool {
    self.expired || self.in_expiry_range
  }
}

/// Result of the end-of-life check
///
/// The first row is always the cluster's current version and is the only row
/// that decides the outcome; any further rows are informational
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EolReport {
  pub rows: Vec<EolStatus>,
}

impl EolReport {
  pub fn is_failing(&self) -> bool {
    self.rows.first().is_some_and(EolStatus::is_failing)
  }
}

/// Node details shown by `get nodes`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Tabled)]
#[tabled(rename_all = "UpperCase")]
pub struct NodeSummary {
  pub role: String,
  pub name: String,
  pub detail: String,
  pub status: String,
}

impl NodeSummary {
  pub fn from_node(node: &Node, config: &NodesConfig) -> Self {
    let label = |key: &str| node.labels.get(key).cloned().unwrap_or_else(|| NONE.to_string());

    NodeSummary {
      role: label(&config.role_label),
      name: node.name.to_owned(),
      detail: label(&config.detail_label),
      status: node_status(&node.conditions),
    }
  }
}

/// Summarizes the node conditions, e.g. `Ready` or `NotReady,MemoryPressure`
///
/// The readiness is always listed first, followed by any other condition that
/// is currently `True`
pub fn node_status(conditions: &[NodeCondition]) -> String {
  let is_true = |c: &&NodeCondition| c.status == "True";

  let ready = conditions.iter().filter(is_true).any(|c| c.type_ == "Ready");
  let mut status = vec![if ready { "Ready" } else { "NotReady" }];
  status.extend(
    conditions
      .iter()
      .filter(is_true)
      .filter(|c| c.type_ != "Ready")
      .map(|c| c.type_.as_str()),
  );

  status.join(",")
}

/// Builds the node summaries sorted by role; nodes with the same role keep the
/// order returned by the API server
pub fn summarize_nodes(nodes: &[Node], config: &NodesConfig) -> Vec<NodeSummary> {
  let mut summaries: Vec<NodeSummary> = nodes.iter().map(|n| NodeSummary::from_node(n, config)).collect();
  summaries.sort_by(|a, b| a.role.cmp(&b.role));

  summaries
}
