use std::collections::HashMap;

use anyhow::Result;

use kubectl_lifecycle::clients::EolClients;
use kubectl_lifecycle::endoflife::{EolRecord, Product};
use kubectl_lifecycle::error::Error;

/// Mock endoflife.date client; unknown cycles are reported as not found
#[derive(Clone, Default)]
pub struct MockEolClient {
  pub records: HashMap<(Product, String), EolRecord>,
  pub releases: HashMap<Product, Vec<EolRecord>>,
}

impl MockEolClient {
  pub fn with_record(mut self, record: EolRecord) -> Self {
    self.releases.entry(record.product).or_default().push(record.clone());
    self.records.insert((record.product, record.version.clone()), record);
    self
  }
}

impl EolClients for MockEolClient {
  async fn get_eol(&self, product: Product, version: &str) -> Result<EolRecord> {
    match self.records.get(&(product, version.to_string())) {
      Some(record) => Ok(record.clone()),
      None => Err(
        Error::NotFound {
          url: format!("mock://{}/{version}.json", product.slug()),
        }
        .into(),
      ),
    }
  }

  async fn list_eol(&self, product: Product) -> Result<Vec<EolRecord>> {
    match self.releases.get(&product) {
      Some(records) => Ok(records.clone()),
      None => Err(
        Error::NotFound {
          url: format!("mock://{}.json", product.slug()),
        }
        .into(),
      ),
    }
  }
}

/// Mock that fails every request with a server error
pub struct MockEolClientError;

impl EolClients for MockEolClientError {
  async fn get_eol(&self, product: Product, version: &str) -> Result<EolRecord> {
    Err(
      Error::Status {
        url: format!("mock://{}/{version}.json", product.slug()),
        status: 503,
      }
      .into(),
    )
  }

  async fn list_eol(&self, product: Product) -> Result<Vec<EolRecord>> {
    Err(
      Error::Status {
        url: format!("mock://{}.json", product.slug()),
        status: 503,
      }
      .into(),
    )
  }
}
