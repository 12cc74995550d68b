pub mod resources;

pub use resources::{Node, NodeCondition, get_nodes, get_server_version, get_workloads, image_tag};
