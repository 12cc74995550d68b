use std::collections::BTreeMap;

use anyhow::{Result, bail};

use kubectl_lifecycle::clients::K8sClients;
use kubectl_lifecycle::compatibility::ObservedComponent;
use kubectl_lifecycle::k8s::Node;
use kubectl_lifecycle::version::ClusterVersion;

/// Mock K8s client for testing
#[derive(Clone, Default)]
pub struct MockK8sClients {
  pub version: Option<ClusterVersion>,
  pub nodes: Vec<Node>,
  /// Workloads keyed by namespace
  pub workloads: BTreeMap<String, Vec<ObservedComponent>>,
}

impl K8sClients for MockK8sClients {
  async fn get_server_version(&self) -> Result<ClusterVersion> {
    match self.version {
      Some(version) => Ok(version),
      None => bail!("mock cluster has no version"),
    }
  }

  async fn get_nodes(&self) -> Result<Vec<Node>> {
    Ok(self.nodes.clone())
  }

  async fn get_workloads(&self, namespace: &str) -> Result<Vec<ObservedComponent>> {
    Ok(self.workloads.get(namespace).cloned().unwrap_or_default())
  }
}

/// Mock that returns errors for all methods
pub struct MockK8sClientsError;

impl K8sClients for MockK8sClientsError {
  async fn get_server_version(&self) -> Result<ClusterVersion> { bail!("mock K8s error") }
  async fn get_nodes(&self) -> Result<Vec<Node>> { bail!("mock K8s error") }
  async fn get_workloads(&self, _namespace: &str) -> Result<Vec<ObservedComponent>> { bail!("mock K8s error") }
}
