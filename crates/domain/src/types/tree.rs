//! Resource tree nodes
//!
//! `/repositories/:repo/resources/:id/tree` returns a nested structure of
//! these nodes; the walkers here collect URIs without further API calls.

use serde::{Deserialize, Serialize};

/// One node of a resource tree, including the root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    /// URI of the record this node describes.
    pub record_uri: String,
    /// Title as rendered in the staff interface tree.
    #[serde(default)]
    pub title: Option<String>,
    /// Whether the node has child nodes.
    #[serde(default)]
    pub has_children: bool,
    /// Instance types attached to the record (e.g. `digital_object`).
    #[serde(default)]
    pub instance_types: Vec<String>,
    /// Child nodes, in tree order.
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Collect the URIs of every descendant node, depth first.
    ///
    /// The root's own URI is not included; callers walking a resource tree
    /// want the archival objects beneath it.
    #[must_use]
    pub fn archival_object_uris(&self) -> Vec<String> {
        let mut uris = Vec::new();
        for child in &self.children {
            collect_uris(child, &mut uris);
        }
        uris
    }

    /// Collect URIs of descendants that carry instances, optionally limited
    /// to one instance type.
    #[must_use]
    pub fn children_with_instances(&self, instance_type: Option<&str>) -> Vec<String> {
        let mut uris = Vec::new();
        for child in &self.children {
            collect_with_instances(child, instance_type, &mut uris);
        }
        uris
    }
}

fn collect_uris(node: &TreeNode, uris: &mut Vec<String>) {
    uris.push(node.record_uri.clone());
    for child in &node.children {
        collect_uris(child, uris);
    }
}

fn collect_with_instances(node: &TreeNode, instance_type: Option<&str>, uris: &mut Vec<String>) {
    let matches = match instance_type {
        Some(wanted) => node.instance_types.iter().any(|t| t == wanted),
        None => !node.instance_types.is_empty(),
    };
    if matches {
        uris.push(node.record_uri.clone());
    }
    for child in &node.children {
        collect_with_instances(child, instance_type, uris);
    }
}
