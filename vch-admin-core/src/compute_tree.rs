//! In-memory tree of selectable compute targets.
//!
//! The directory reports clusters, hosts and resource pools as a flat list;
//! the tree folds hosts and pools under their parent clusters by alias
//! matching and drops records that would violate the parent/child type rules.

use tracing::warn;

use crate::types::{ComputeResourceNode, NodeTypeId};

#[derive(Debug, Clone, Default)]
pub struct ComputeResourceTree {
    datacenter: Option<String>,
    roots: Vec<ComputeResourceNode>,
}

impl ComputeResourceTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the tree for one datacenter from flat directory records.
    ///
    /// Clusters come first as roots; every other record is attached to the
    /// first cluster it shares an alias with, provided the cluster accepts
    /// its type. Unattached records stay at the root when a datacenter may
    /// contain them directly.
    pub fn build(datacenter_text: &str, records: Vec<ComputeResourceNode>) -> Self {
        let mut roots: Vec<ComputeResourceNode> = Vec::new();
        let mut rest: Vec<ComputeResourceNode> = Vec::new();

        for record in records {
            if record.node_type_id == NodeTypeId::DcCluster {
                roots.push(record);
            } else {
                rest.push(record);
            }
        }

        for record in rest {
            let parent = roots.iter().position(|cluster| {
                cluster.shares_alias_with(&record)
                    && cluster.node_type_id.accepts_child(&record.node_type_id)
            });
            match parent {
                Some(i) => roots[i].children.push(record),
                None if NodeTypeId::Datacenter.accepts_child(&record.node_type_id) => {
                    roots.push(record)
                }
                None => {
                    warn!(
                        text = %record.text,
                        node_type = %String::from(record.node_type_id.clone()),
                        "dropping inventory record with no valid parent"
                    );
                }
            }
        }

        Self {
            datacenter: Some(datacenter_text.to_string()),
            roots,
        }
    }

    pub fn datacenter(&self) -> Option<&str> {
        self.datacenter.as_deref()
    }

    pub fn roots(&self) -> &[ComputeResourceNode] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Depth-first lookup by alias.
    pub fn find_by_alias(&self, alias: &str) -> Option<&ComputeResourceNode> {
        fn walk<'a>(nodes: &'a [ComputeResourceNode], alias: &str) -> Option<&'a ComputeResourceNode> {
            for node in nodes {
                if node.aliases.iter().any(|a| a == alias) {
                    return Some(node);
                }
                if let Some(found) = walk(&node.children, alias) {
                    return Some(found);
                }
            }
            None
        }
        walk(&self.roots, alias)
    }

    /// All selectable nodes, depth first.
    pub fn selectable(&self) -> Vec<&ComputeResourceNode> {
        fn walk<'a>(nodes: &'a [ComputeResourceNode], out: &mut Vec<&'a ComputeResourceNode>) {
            for node in nodes {
                if node.is_selectable() {
                    out.push(node);
                }
                walk(&node.children, out);
            }
        }
        let mut out = Vec::new();
        walk(&self.roots, &mut out);
        out
    }

    pub fn clear(&mut self) {
        self.datacenter = None;
        self.roots.clear();
    }
}
