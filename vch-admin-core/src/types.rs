use serde::{Deserialize, Serialize};

/// One entry of the session's server list, used to scope directory queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    pub service_guid: String,
    pub thumbprint: String,
}

/// Inventory node kinds reported by the resource directory.
///
/// Unknown type identifiers are preserved verbatim so newer directory
/// versions don't break tree construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeTypeId {
    Datacenter,
    DcCluster,
    ClusterHostSystem,
    HostSystem,
    ResourcePool,
    Other(String),
}

impl From<String> for NodeTypeId {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Datacenter" => NodeTypeId::Datacenter,
            "DcCluster" => NodeTypeId::DcCluster,
            "ClusterHostSystem" => NodeTypeId::ClusterHostSystem,
            "HostSystem" => NodeTypeId::HostSystem,
            "ResourcePool" => NodeTypeId::ResourcePool,
            _ => NodeTypeId::Other(s),
        }
    }
}

impl From<NodeTypeId> for String {
    fn from(t: NodeTypeId) -> Self {
        match t {
            NodeTypeId::Datacenter => "Datacenter".to_string(),
            NodeTypeId::DcCluster => "DcCluster".to_string(),
            NodeTypeId::ClusterHostSystem => "ClusterHostSystem".to_string(),
            NodeTypeId::HostSystem => "HostSystem".to_string(),
            NodeTypeId::ResourcePool => "ResourcePool".to_string(),
            NodeTypeId::Other(s) => s,
        }
    }
}

impl NodeTypeId {
    /// Whether a node of this type can be picked as the VCH compute target.
    pub fn is_selectable(&self) -> bool {
        matches!(
            self,
            NodeTypeId::DcCluster
                | NodeTypeId::ClusterHostSystem
                | NodeTypeId::HostSystem
                | NodeTypeId::ResourcePool
        )
    }

    /// Which child node types are valid under a node of this type.
    pub fn accepts_child(&self, child: &NodeTypeId) -> bool {
        match self {
            NodeTypeId::Datacenter => matches!(
                child,
                NodeTypeId::DcCluster
                    | NodeTypeId::ClusterHostSystem
                    | NodeTypeId::HostSystem
                    | NodeTypeId::ResourcePool
            ),
            NodeTypeId::DcCluster => matches!(
                child,
                NodeTypeId::ClusterHostSystem | NodeTypeId::HostSystem | NodeTypeId::ResourcePool
            ),
            NodeTypeId::ResourcePool => matches!(child, NodeTypeId::ResourcePool),
            _ => false,
        }
    }
}

/// A selectable compute target in the datacenter inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputeResourceNode {
    /// URN-style reference or bare moid; may be empty for synthetic nodes.
    #[serde(default)]
    pub object_ref: String,
    /// Display label; may be empty.
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_node_type")]
    pub node_type_id: NodeTypeId,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub children: Vec<ComputeResourceNode>,
}

fn default_node_type() -> NodeTypeId {
    NodeTypeId::Other(String::new())
}

impl ComputeResourceNode {
    pub fn new(text: impl Into<String>, node_type_id: NodeTypeId) -> Self {
        Self {
            object_ref: String::new(),
            text: text.into(),
            node_type_id,
            aliases: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_object_ref(mut self, object_ref: impl Into<String>) -> Self {
        self.object_ref = object_ref.into();
        self
    }

    pub fn with_aliases(mut self, aliases: Vec<String>) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn is_selectable(&self) -> bool {
        self.node_type_id.is_selectable()
    }

    /// True when the node shares at least one alias with `other`.
    pub fn shares_alias_with(&self, other: &ComputeResourceNode) -> bool {
        self.aliases.iter().any(|a| other.aliases.contains(a))
    }
}

/// CPU or memory usage bounds for the selected compute resource, in MHz / MB.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationUsage {
    pub max_usage: i64,
    pub unreserved_for_pool: i64,
}

/// Allocation bounds refreshed whenever the selected compute resource changes.
///
/// `max_usage` is the dynamic upper bound for the matching limit and
/// reservation fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceAllocationInfo {
    pub cpu: AllocationUsage,
    pub memory: AllocationUsage,
}

/// The committed compute-capacity artifact.
///
/// Field values are the strings the operator entered; the provisioning
/// backend owns unit interpretation. Reservation and shares fields are only
/// populated in advanced mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeCapacityModel {
    pub cpu_limit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_reservation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_shares: Option<String>,
    pub memory_limit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_reservation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_shares: Option<String>,
    pub is_advanced_mode: bool,
    pub compute_resource_moid: String,
}

/// Transient product of a tree interaction, consumed to derive the selection
/// moid and to trigger an allocation-info refresh.
#[derive(Debug, Clone)]
pub struct SelectionEvent {
    pub datacenter: Option<ComputeResourceNode>,
    pub obj: ComputeResourceNode,
}

/// A datacenter entry as listed by the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryLabel {
    pub text: String,
}

/// DRS status of a cluster; informational input only, never validated against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrsStatus {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub default_vm_behavior: String,
}

/// A DRS VM group defined on a cluster; informational input only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VmGroup {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub vm_refs: Vec<String>,
}
