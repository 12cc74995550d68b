use thiserror::Error;

/// Errors raised by the decision modules and the retrieval clients
///
/// Command handlers wrap these in `anyhow` with additional context; the typed
/// variants remain available through `downcast_ref` for callers that need to
/// distinguish a missing release from a network failure
#[derive(Debug, Error)]
pub enum Error {
  /// A version string that is not `major.minor.patch[-pre][+build]`
  #[error("invalid version '{input}': {reason}")]
  Parse { input: String, reason: String },

  /// An end-of-life date that is not exactly `YYYY-MM-DD`
  #[error("invalid date '{input}', expected YYYY-MM-DD")]
  DateParse { input: String },

  #[error("unknown product '{0}', expected one of: kubernetes, amazon-eks")]
  UnknownProduct(String),

  #[error("resource not found: {url}")]
  NotFound { url: String },

  #[error("request to {url} failed with status {status}")]
  Status { url: String, status: u16 },

  /// A response body that does not decode into the expected document
  #[error("unexpected response from {url}: {reason}")]
  Body { url: String, reason: String },

  #[error("request to {url} failed")]
  Network {
    url: String,
    #[source]
    source: reqwest::Error,
  },

  /// Unable to load credentials or connect to the cluster
  #[error("{0}")]
  Auth(String),

  /// The compatibility table could not be read or decoded
  #[error("unable to read components configuration: {0}")]
  Table(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
