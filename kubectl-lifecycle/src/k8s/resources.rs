use std::collections::BTreeMap;

use anyhow::{Context, Result};
use k8s_openapi::api::{
  apps,
  core::{self, v1::PodTemplateSpec},
};
use kube::{Client, api::Api};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{compatibility::ObservedComponent, version::ClusterVersion};

/// Returns the control plane version reported by the API server
pub async fn get_server_version(client: &Client) -> Result<ClusterVersion> {
  let info = client
    .apiserver_version()
    .await
    .context("Unable to retrieve the cluster version")?;
  debug!("API server version: {}", info.git_version);

  ClusterVersion::from_parts(&info.major, &info.minor)
}

/// Condition reported on a node's status, e.g. `Ready=True`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeCondition {
  pub type_: String,
  pub status: String,
}

/// Node details as viewed from the Kubernetes API
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Node {
  pub name: String,
  pub labels: BTreeMap<String, String>,
  pub conditions: Vec<NodeCondition>,
}

/// Returns all of the nodes in the cluster
pub async fn get_nodes(client: &Client) -> Result<Vec<Node>> {
  let api: Api<core::v1::Node> = Api::all(client.clone());
  let node_list = api.list(&Default::default()).await.context("Unable to list nodes")?;

  let nodes = node_list
    .items
    .into_iter()
    .map(|node| {
      let conditions = node
        .status
        .and_then(|status| status.conditions)
        .unwrap_or_default()
        .into_iter()
        .map(|c| NodeCondition {
          type_: c.type_,
          status: c.status,
        })
        .collect();

      Node {
        name: node.metadata.name.unwrap_or_default(),
        labels: node.metadata.labels.unwrap_or_default(),
        conditions,
      }
    })
    .collect();

  Ok(nodes)
}

/// Returns the tag of a container image reference
///
/// The tag follows the last `:` of the reference, once any `@sha256:...` digest
/// has been removed. A `:` that belongs to a registry port (`registry:5000/app`)
/// is not a tag separator, and an untagged image resolves to `latest`
pub fn image_tag(image: &str) -> &str {
  let reference = image.split('@').next().unwrap_or(image);
  let name_start = reference.rfind('/').map(|i| i + 1).unwrap_or(0);

  match reference[name_start..].rfind(':') {
    Some(i) => &reference[name_start + i + 1..],
    None => "latest",
  }
}

/// Builds the observed component for a workload from the first container of its pod template
fn observed_component(
  name: Option<String>,
  namespace: &str,
  kind: &str,
  template: &PodTemplateSpec,
) -> Option<ObservedComponent> {
  let name = name?;
  let image = template
    .spec
    .as_ref()
    .and_then(|spec| spec.containers.first())
    .and_then(|container| container.image.as_deref());

  match image {
    Some(image) => Some(ObservedComponent {
      name,
      namespace: namespace.to_owned(),
      kind: kind.to_owned(),
      version: image_tag(image).to_owned(),
    }),
    None => {
      warn!("{kind} {namespace}/{name} has no container image, skipping");
      None
    }
  }
}

async fn get_deployments(client: &Client, namespace: &str) -> Result<Vec<ObservedComponent>> {
  let api: Api<apps::v1::Deployment> = Api::namespaced(client.clone(), namespace);
  let deployment_list = api
    .list(&Default::default())
    .await
    .with_context(|| format!("Unable to list deployments in namespace {namespace}"))?;

  let deployments = deployment_list
    .items
    .into_iter()
    .filter_map(|dplmnt| {
      let spec = dplmnt.spec?;
      observed_component(dplmnt.metadata.name, namespace, "Deployment", &spec.template)
    })
    .collect();

  Ok(deployments)
}

async fn get_daemonsets(client: &Client, namespace: &str) -> Result<Vec<ObservedComponent>> {
  let api: Api<apps::v1::DaemonSet> = Api::namespaced(client.clone(), namespace);
  let daemonset_list = api
    .list(&Default::default())
    .await
    .with_context(|| format!("Unable to list daemonsets in namespace {namespace}"))?;

  let daemonsets = daemonset_list
    .items
    .into_iter()
    .filter_map(|dset| {
      let spec = dset.spec?;
      observed_component(dset.metadata.name, namespace, "DaemonSet", &spec.template)
    })
    .collect();

  Ok(daemonsets)
}

/// Returns the components running as Deployments followed by DaemonSets in `namespace`
pub async fn get_workloads(client: &Client, namespace: &str) -> Result<Vec<ObservedComponent>> {
  let mut workloads = get_deployments(client, namespace).await?;
  workloads.extend(get_daemonsets(client, namespace).await?);
  debug!("Found {} workloads in namespace {namespace}", workloads.len());

  Ok(workloads)
}

#[cfg(test)]
mod tests {
  use k8s_openapi::api::core::v1::{Container, PodSpec};

  use super::*;

  fn template(image: Option<&str>) -> PodTemplateSpec {
    PodTemplateSpec {
      metadata: None,
      spec: Some(PodSpec {
        containers: vec![Container {
          name: "app".to_string(),
          image: image.map(str::to_string),
          ..Container::default()
        }],
        ..PodSpec::default()
      }),
    }
  }

  #[test]
  fn image_tag_variants() {
    let cases = vec![
      ("coredns/coredns:1.8.4", "1.8.4"),
      (
        "602401143452.dkr.ecr.us-west-2.amazonaws.com/eks/kube-proxy:v1.19.6-eksbuild.2",
        "v1.19.6-eksbuild.2",
      ),
      ("nginx:latest", "latest"),
      ("nginx", "latest"),
      ("localhost:5000/cert-manager-controller:v1.4.0", "v1.4.0"),
      ("localhost:5000/cert-manager-controller", "latest"),
      ("quay.io/jetstack/cert-manager-controller:v1.4.0@sha256:abcdef", "v1.4.0"),
      ("k8s.gcr.io/metrics-server/metrics-server:stable", "stable"),
    ];

    for (image, expected) in cases {
      assert_eq!(image_tag(image), expected, "image_tag({image})");
    }
  }

  #[test]
  fn observed_component_from_first_container() {
    let component = observed_component(
      Some("coredns".to_string()),
      "kube-system",
      "Deployment",
      &template(Some("coredns/coredns:1.8.4")),
    )
    .unwrap();

    assert_eq!(component.name, "coredns");
    assert_eq!(component.namespace, "kube-system");
    assert_eq!(component.kind, "Deployment");
    assert_eq!(component.version, "1.8.4");
  }

  #[test]
  fn observed_component_without_image() {
    let component = observed_component(Some("broken".to_string()), "default", "DaemonSet", &template(None));
    assert!(component.is_none());
  }

  #[test]
  fn observed_component_without_containers() {
    let template = PodTemplateSpec {
      metadata: None,
      spec: None,
    };
    assert!(observed_component(Some("empty".to_string()), "default", "Deployment", &template).is_none());
  }
}
