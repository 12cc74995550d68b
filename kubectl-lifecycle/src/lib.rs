//! `kubectl-lifecycle` is a kubectl plugin that reports how close a cluster is to
//! losing support and which of its add-ons are too old for the running version

pub mod clients;
mod cli;
pub mod compatibility;
pub mod config;
pub mod endoflife;
pub mod error;
pub mod k8s;
pub mod output;
pub mod report;
pub mod version;

use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
pub use cli::{Check, CheckCommands, Cli, Commands, EndOfLife, Get, GetCommands, Nodes, Releases, Versions};
use tracing::{debug, info, warn};

use crate::{
  clients::{EolClients, K8sClients, RealK8sClients},
  compatibility::{CompatibilityTable, ComponentStatus, ObservedComponent},
  config::{Config, NodesConfig},
  endoflife::{HttpEolClient, Product},
  error::Error,
  report::{EolReport, EolStatus, NodeSummary},
  version::ClusterVersion,
};

/// Runs the selected command
///
/// Returns `ExitCode::FAILURE` when `check endoflife` finds the cluster's version
/// expired or within the expiry range; every other error is returned as `Err`
pub async fn run(cli: &Cli) -> Result<ExitCode> {
  let config = config::load(cli.config.as_deref())?;

  match &cli.commands {
    Commands::Check(check) => match &check.command {
      CheckCommands::EndOfLife(args) => check_endoflife(args, &config).await,
      CheckCommands::Versions(args) => {
        check_versions(args, &config).await?;
        Ok(ExitCode::SUCCESS)
      }
    },
    Commands::Get(get) => {
      match &get.command {
        GetCommands::Nodes(args) => get_nodes(args, &config).await?,
        GetCommands::Releases(args) => get_releases(args, &config).await?,
      }
      Ok(ExitCode::SUCCESS)
    }
  }
}

fn eol_client(config: &Config) -> Result<HttpEolClient> {
  Ok(HttpEolClient::new(
    &config.endoflife.base_url,
    config.endoflife.timeout(),
  )?)
}

async fn check_endoflife(args: &EndOfLife, config: &Config) -> Result<ExitCode> {
  let version = match &args.kube_version {
    Some(version) => version.parse::<ClusterVersion>()?,
    None => RealK8sClients::new().await?.get_server_version().await?,
  };

  let eol = eol_client(config)?;
  let report = endoflife_report(&eol, args.product, version, args.next, args.expiry_range, Utc::now()).await?;

  if !args.silent {
    let rendered = output::render(&report.rows, args.format)?;
    output::write(&rendered, args.output.as_deref())?;
  }

  if report.is_failing() {
    return Ok(ExitCode::FAILURE);
  }
  Ok(ExitCode::SUCCESS)
}

/// Evaluates the end-of-life status of `version`, and of the following minor
/// version when `include_next` is set
///
/// The next version is informational only: when endoflife.date does not know it
/// yet, it is left out of the report instead of failing the check
pub async fn endoflife_report<E: EolClients>(
  eol: &E,
  product: Product,
  version: ClusterVersion,
  include_next: bool,
  expiry_range: i64,
  now: DateTime<Utc>,
) -> Result<EolReport> {
  let record = eol
    .get_eol(product, &version.cycle())
    .await
    .with_context(|| format!("Unable to retrieve end-of-life data for {} {version}", product.label()))?;
  let current = EolStatus::evaluate(&record, now, expiry_range)?;

  if current.expired {
    warn!("{} {version} reached its end of life on {}", product.label(), current.eol);
  } else if current.in_expiry_range {
    warn!(
      "{} {version} reaches its end of life in {} days",
      product.label(),
      current.days_left
    );
  }

  let mut rows = vec![current];

  if include_next {
    let next = version.next()?;
    match eol.get_eol(product, &next.cycle()).await {
      Ok(record) => rows.push(EolStatus::evaluate(&record, now, expiry_range)?),
      Err(err) if matches!(err.downcast_ref::<Error>(), Some(Error::NotFound { .. })) => {
        info!("No end-of-life data for {} {next} yet", product.label());
      }
      Err(err) => {
        return Err(err.context(format!(
          "Unable to retrieve end-of-life data for {} {next}",
          product.label()
        )));
      }
    }
  }

  Ok(EolReport { rows })
}

async fn check_versions(args: &Versions, config: &Config) -> Result<()> {
  let table = match args.components.as_deref() {
    Some(path) => CompatibilityTable::from_path(path)?,
    None => match &config.versions.components_file {
      Some(path) => CompatibilityTable::from_path(path)?,
      None => CompatibilityTable::embedded()?,
    },
  };

  let namespaces = if args.namespaces.is_empty() {
    &config.versions.namespaces
  } else {
    &args.namespaces
  };

  let k8s = RealK8sClients::new().await?;
  let statuses = versions_report(&k8s, &table, args.kube_version.as_deref(), namespaces).await?;

  let rendered = output::render(&statuses, args.format)?;
  output::write(&rendered, args.output.as_deref())
}

/// Collects the workloads of each namespace, in the order given
pub async fn collect_components<K: K8sClients>(k8s: &K, namespaces: &[String]) -> Result<Vec<ObservedComponent>> {
  let mut components = Vec::new();
  for namespace in namespaces {
    components.extend(k8s.get_workloads(namespace).await?);
  }

  Ok(components)
}

/// Checks the add-ons found in `namespaces` against the requirements for
/// `kube_version`, or for the cluster's own version when none is given
pub async fn versions_report<K: K8sClients>(
  k8s: &K,
  table: &CompatibilityTable,
  kube_version: Option<&str>,
  namespaces: &[String],
) -> Result<Vec<ComponentStatus>> {
  let version = match kube_version {
    Some(version) => version.parse::<ClusterVersion>()?,
    None => k8s.get_server_version().await?,
  };

  let key = version.table_key();
  if !table.kubernetes_versions().any(|v| v == key) {
    warn!("No add-on requirements are known for Kubernetes {key}");
  }

  let components = collect_components(k8s, namespaces).await?;
  debug!("Checking {} components against {key}", components.len());

  table.check_components(&key, &components)
}

async fn get_nodes(args: &Nodes, config: &Config) -> Result<()> {
  let k8s = RealK8sClients::new().await?;
  let summaries = nodes_report(&k8s, &config.nodes).await?;

  let rendered = output::render(&summaries, args.format)?;
  output::write(&rendered, args.output.as_deref())
}

pub async fn nodes_report<K: K8sClients>(k8s: &K, config: &NodesConfig) -> Result<Vec<NodeSummary>> {
  let nodes = k8s.get_nodes().await?;

  Ok(report::summarize_nodes(&nodes, config))
}

async fn get_releases(args: &Releases, config: &Config) -> Result<()> {
  let eol = eol_client(config)?;
  let releases = releases_report(&eol, args.product, Utc::now()).await?;

  let rendered = output::render(&releases, args.format)?;
  output::write(&rendered, args.output.as_deref())
}

/// Lists every release cycle of `product` with the days left until its end of life
pub async fn releases_report<E: EolClients>(eol: &E, product: Product, now: DateTime<Utc>) -> Result<Vec<EolStatus>> {
  let records = eol
    .list_eol(product)
    .await
    .with_context(|| format!("Unable to retrieve release cycles for {}", product.label()))?;

  records
    .iter()
    .map(|record| EolStatus::evaluate(record, now, 0))
    .collect()
}
