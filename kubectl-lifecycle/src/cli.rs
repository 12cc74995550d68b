use anstyle::{AnsiColor, Effects};
use clap::{Args, Parser, Subcommand, builder::Styles};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use serde::{Deserialize, Serialize};

use crate::{endoflife::Product, output::Format};

fn styles() -> Styles {
  Styles::styled()
    .header(AnsiColor::Green.on_default() | Effects::BOLD)
    .usage(AnsiColor::Green.on_default() | Effects::BOLD)
    .literal(AnsiColor::Cyan.on_default() | Effects::BOLD)
    .placeholder(AnsiColor::Cyan.on_default())
}

#[derive(Parser, Debug)]
#[command(author, about, version)]
#[command(propagate_version = true, styles = styles())]
pub struct Cli {
  #[command(subcommand)]
  pub commands: Commands,

  /// Path to a configuration file [default: .kubectl-lifecycle.yaml, if present]
  #[arg(long, global = true)]
  pub config: Option<String>,

  #[clap(flatten)]
  pub verbose: Verbosity<WarnLevel>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
  Check(Check),
  Get(Get),
}

/// Check the cluster against support dates and add-on requirements
#[derive(Args, Debug)]
pub struct Check {
  #[command(subcommand)]
  pub command: CheckCommands,
}

#[derive(Debug, Subcommand)]
pub enum CheckCommands {
  #[command(name = "endoflife")]
  EndOfLife(EndOfLife),
  Versions(Versions),
}

/// Retrieve cluster and release information
#[derive(Args, Debug)]
pub struct Get {
  #[command(subcommand)]
  pub command: GetCommands,
}

#[derive(Debug, Subcommand)]
pub enum GetCommands {
  Nodes(Nodes),
  Releases(Releases),
}

/// Check the end-of-life date of the cluster's version
///
/// Exits with status 1 when the version has reached its end of life or is
/// within the expiry range
#[derive(Args, Debug, Serialize, Deserialize)]
pub struct EndOfLife {
  /// Product whose release cycles are checked
  #[arg(short, long, value_enum, default_value_t)]
  pub product: Product,

  /// Number of days before the end-of-life date at which the check fails
  #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
  pub expiry_range: i64,

  /// Suppress all output; only the exit status is reported
  #[arg(short, long)]
  pub silent: bool,

  /// Version to check instead of querying the cluster (e.g. 1.21)
  #[arg(short, long)]
  pub kube_version: Option<String>,

  /// Also report the next minor version
  #[arg(long)]
  pub next: bool,

  #[arg(short, long, value_enum, default_value_t)]
  pub format: Format,

  /// Write to file instead of stdout
  #[arg(short, long)]
  pub output: Option<String>,
}

/// Check add-on versions against the minimum versions required for a Kubernetes version
#[derive(Args, Debug, Serialize, Deserialize)]
pub struct Versions {
  /// Kubernetes version to check against (e.g. v1.19) [default: the cluster's version]
  #[arg(short, long)]
  pub kube_version: Option<String>,

  /// Namespace to search for add-ons; may be repeated [default: from config]
  #[arg(short, long = "namespace")]
  pub namespaces: Vec<String>,

  /// Compatibility table to use instead of the embedded one
  #[arg(short, long)]
  pub components: Option<String>,

  #[arg(short, long, value_enum, default_value_t)]
  pub format: Format,

  /// Write to file instead of stdout
  #[arg(short, long)]
  pub output: Option<String>,
}

/// List the cluster nodes with their role and status
#[derive(Args, Debug, Serialize, Deserialize)]
pub struct Nodes {
  #[arg(short, long, value_enum, default_value_t)]
  pub format: Format,

  /// Write to file instead of stdout
  #[arg(short, long)]
  pub output: Option<String>,
}

/// List every release cycle of a product with its end-of-life date
#[derive(Args, Debug, Serialize, Deserialize)]
pub struct Releases {
  #[arg(short, long, value_enum, default_value_t)]
  pub product: Product,

  #[arg(short, long, value_enum, default_value_t)]
  pub format: Format,

  /// Write to file instead of stdout
  #[arg(short, long)]
  pub output: Option<String>,
}
