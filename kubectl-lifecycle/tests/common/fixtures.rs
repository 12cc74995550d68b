use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};

use kubectl_lifecycle::compatibility::ObservedComponent;
use kubectl_lifecycle::endoflife::{EolRecord, Product};
use kubectl_lifecycle::k8s::{Node, NodeCondition};
use kubectl_lifecycle::version::ClusterVersion;

use super::mock_eol::MockEolClient;
use super::mock_k8s::MockK8sClients;

/// Fixed evaluation instant shared by the date based tests
pub fn now() -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2022, 3, 1, 0, 0, 0).unwrap()
}

pub fn fixture(name: &str) -> String {
  let path = format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"));
  std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("unable to read {path}: {e}"))
}

pub fn record(product: Product, version: &str, eol: &str) -> EolRecord {
  EolRecord {
    product,
    version: version.to_string(),
    eol: eol.to_string(),
    latest: None,
    release_date: None,
  }
}

/// Release cycles as published for Kubernetes and Amazon EKS
pub fn eol_client() -> MockEolClient {
  MockEolClient::default()
    .with_record(record(Product::Kubernetes, "1.19", "2021-10-28"))
    .with_record(record(Product::Kubernetes, "1.20", "2022-02-28"))
    .with_record(record(Product::Kubernetes, "1.21", "2022-06-28"))
    .with_record(record(Product::AmazonEks, "1.19", "2022-04-01"))
    .with_record(record(Product::AmazonEks, "1.20", "2022-09-01"))
}

pub fn component(namespace: &str, kind: &str, name: &str, version: &str) -> ObservedComponent {
  ObservedComponent {
    name: name.to_string(),
    namespace: namespace.to_string(),
    kind: kind.to_string(),
    version: version.to_string(),
  }
}

pub fn node(name: &str, role: &str, ready: bool) -> Node {
  let labels = BTreeMap::from([
    ("kubernetes.io/role".to_string(), role.to_string()),
    ("node.kubernetes.io/instance-type".to_string(), "m5.large".to_string()),
  ]);

  Node {
    name: name.to_string(),
    labels,
    conditions: vec![NodeCondition {
      type_: "Ready".to_string(),
      status: if ready { "True" } else { "False" }.to_string(),
    }],
  }
}

/// A 1.19 cluster running a mix of current, outdated and untracked add-ons
pub fn cluster_1_19() -> MockK8sClients {
  let workloads = BTreeMap::from([
    (
      "kube-system".to_string(),
      vec![
        component("kube-system", "Deployment", "coredns", "1.8.3"),
        component("kube-system", "Deployment", "metrics-server", "v0.5.0"),
        component("kube-system", "DaemonSet", "kube-proxy", "v1.19.6-eksbuild.2"),
        component("kube-system", "DaemonSet", "aws-node", "latest"),
      ],
    ),
    (
      "cert-manager".to_string(),
      vec![
        component("cert-manager", "Deployment", "cert-manager", "v1.3.1"),
        component("cert-manager", "Deployment", "cert-manager-webhook", "v1.3.1"),
      ],
    ),
  ]);

  MockK8sClients {
    version: Some(ClusterVersion { major: 1, minor: 19 }),
    nodes: vec![
      node("ip-10-0-1-10", "worker", true),
      node("ip-10-0-0-5", "control-plane", true),
      node("ip-10-0-1-11", "worker", false),
    ],
    workloads,
  }
}
