use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

use super::{EolRecord, Product};
use crate::error::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://endoflife.date/api";

/// The `eol` field is a date for most products but may be a boolean when a
/// cycle has no announced end of life
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EolField {
  Date(String),
  Flag(bool),
}

/// Release cycle as returned by `/{product}.json` and `/{product}/{cycle}.json`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Release {
  /// Only present on the list endpoint
  cycle: Option<String>,
  eol: EolField,
  latest: Option<String>,
  #[serde(alias = "release")]
  release_date: Option<String>,
}

impl Release {
  fn into_record(self, product: Product, version: &str) -> Result<EolRecord> {
    let eol = match self.eol {
      EolField::Date(date) => date,
      EolField::Flag(flag) => {
        return Err(Error::DateParse {
          input: flag.to_string(),
        });
      }
    };

    Ok(EolRecord {
      product,
      version: self.cycle.unwrap_or_else(|| version.to_owned()),
      eol,
      latest: self.latest,
      release_date: self.release_date,
    })
  }
}

/// HTTP client for the endoflife.date API
#[derive(Clone, Debug)]
pub struct HttpEolClient {
  base_url: String,
  http: reqwest::Client,
}

impl HttpEolClient {
  pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
    let http = reqwest::Client::builder()
      .timeout(timeout)
      .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|source| Error::Network {
        url: base_url.to_owned(),
        source,
      })?;

    Ok(Self {
      base_url: base_url.trim_end_matches('/').to_owned(),
      http,
    })
  }

  /// Retrieves the end-of-life data for a single release cycle
  pub async fn get(&self, product: Product, version: &str) -> Result<EolRecord> {
    let url = format!("{}/{}/{version}.json", self.base_url, product.slug());
    let release: Release = self.send(&url).await?;

    release.into_record(product, version)
  }

  /// Retrieves the end-of-life data for every release cycle of a product
  pub async fn list(&self, product: Product) -> Result<Vec<EolRecord>> {
    let url = format!("{}/{}.json", self.base_url, product.slug());
    let releases: Vec<Release> = self.send(&url).await?;

    releases
      .into_iter()
      .map(|release| release.into_record(product, ""))
      .collect()
  }

  async fn send<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
    debug!("GET {url}");
    let network = |source| Error::Network {
      url: url.to_owned(),
      source,
    };

    let response = self.http.get(url).send().await.map_err(network)?;
    let status = response.status();
    debug!("GET {url} returned {status}");

    if status == StatusCode::NOT_FOUND {
      return Err(Error::NotFound { url: url.to_owned() });
    }
    if !(200..400).contains(&status.as_u16()) {
      return Err(Error::Status {
        url: url.to_owned(),
        status: status.as_u16(),
      });
    }

    let body = response.bytes().await.map_err(network)?;
    serde_json::from_slice(&body).map_err(|e| Error::Body {
      url: url.to_owned(),
      reason: e.to_string(),
    })
  }
}
