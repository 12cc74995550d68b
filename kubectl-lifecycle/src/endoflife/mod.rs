//! Client and decision logic for the endoflife.date API
//!
//! The API is composed of a few simple JSON documents; this wraps the Kubernetes
//! related products and evaluates how close a release cycle is to losing support

mod client;
pub mod expiry;

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub use client::{DEFAULT_BASE_URL, HttpEolClient};
pub use expiry::{Expiry, days_until_end, in_expiry_range, is_expired, parse_eol_date};

use crate::error::Error;

/// Products tracked on endoflife.date that this tool knows how to query
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Product {
  /// Upstream Kubernetes release cycles
  #[default]
  #[value(name = "kubernetes")]
  Kubernetes,
  /// Amazon EKS Kubernetes release cycles
  #[value(name = "amazon-eks")]
  AmazonEks,
}

impl Product {
  /// Path segment used by the API and value accepted on the command line
  pub fn slug(&self) -> &'static str {
    match self {
      Product::Kubernetes => "kubernetes",
      Product::AmazonEks => "amazon-eks",
    }
  }

  /// Label shown in the `TYPE` column
  pub fn label(&self) -> &'static str {
    match self {
      Product::Kubernetes => "Kubernetes",
      Product::AmazonEks => "EKS",
    }
  }
}

impl fmt::Display for Product {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.slug())
  }
}

impl FromStr for Product {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "kubernetes" => Ok(Product::Kubernetes),
      "amazon-eks" => Ok(Product::AmazonEks),
      _ => Err(Error::UnknownProduct(s.to_owned())),
    }
  }
}

/// End-of-life data for a single release cycle of a product
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EolRecord {
  pub product: Product,
  /// Release cycle queried, e.g. `1.19`
  pub version: String,
  /// End-of-life date as returned by the API (`YYYY-MM-DD`)
  pub eol: String,
  /// Latest patch release within the cycle
  pub latest: Option<String>,
  pub release_date: Option<String>,
}

impl EolRecord {
  pub fn eol_date(&self) -> Result<NaiveDate, Error> {
    parse_eol_date(&self.eol)
  }
}
