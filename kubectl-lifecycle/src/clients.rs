use anyhow::Result;

use crate::{
  compatibility::ObservedComponent,
  endoflife::{EolRecord, HttpEolClient, Product},
  error::Error,
  k8s::{self, Node},
  version::ClusterVersion,
};

/// Trait abstracting all Kubernetes API operations used by the plugin
pub trait K8sClients {
  fn get_server_version(&self) -> impl std::future::Future<Output = Result<ClusterVersion>> + Send;
  fn get_nodes(&self) -> impl std::future::Future<Output = Result<Vec<Node>>> + Send;
  fn get_workloads(&self, namespace: &str) -> impl std::future::Future<Output = Result<Vec<ObservedComponent>>> + Send;
}

/// Trait abstracting the endoflife.date API operations used by the plugin
pub trait EolClients {
  fn get_eol(&self, product: Product, version: &str) -> impl std::future::Future<Output = Result<EolRecord>> + Send;
  fn list_eol(&self, product: Product) -> impl std::future::Future<Output = Result<Vec<EolRecord>>> + Send;
}

/// Real Kubernetes client implementation wrapping kube-rs
pub struct RealK8sClients {
  client: kube::Client,
}

impl RealK8sClients {
  pub async fn new() -> Result<Self> {
    match kube::Client::try_default().await {
      Ok(client) => Ok(Self { client }),
      Err(e) => Err(
        Error::Auth(format!(
          "Unable to connect to cluster: {e}\n\n\
          Ensure kubeconfig file is present and the current context points at the cluster."
        ))
        .into(),
      ),
    }
  }
}

impl K8sClients for RealK8sClients {
  async fn get_server_version(&self) -> Result<ClusterVersion> {
    k8s::get_server_version(&self.client).await
  }

  async fn get_nodes(&self) -> Result<Vec<Node>> {
    k8s::get_nodes(&self.client).await
  }

  async fn get_workloads(&self, namespace: &str) -> Result<Vec<ObservedComponent>> {
    k8s::get_workloads(&self.client, namespace).await
  }
}

impl EolClients for HttpEolClient {
  async fn get_eol(&self, product: Product, version: &str) -> Result<EolRecord> {
    Ok(self.get(product, version).await?)
  }

  async fn list_eol(&self, product: Product) -> Result<Vec<EolRecord>> {
    Ok(self.list(product).await?)
  }
}
