//! Stub collaborators for exercising the wizard step without a management
//! console behind it.
//!
//! The defaults mirror a one-datacenter, one-cluster inventory with 4096
//! MHz/MB of headroom.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::abstractions::{ResourceDirectory, SessionProvider};
use crate::error::{VchAdminError, VchResult};
use crate::types::{
    AllocationUsage, ComputeResourceNode, DrsStatus, InventoryLabel, NodeTypeId,
    ResourceAllocationInfo, ServerInfo, VmGroup,
};

pub const MAX_LIMIT: i64 = 4096;

pub const DC_REF: &str = "urn:vmomi:Datacenter:dc-test:00000000-0000-0000-0000-000000000000";

pub fn stub_allocation_info() -> ResourceAllocationInfo {
    ResourceAllocationInfo {
        cpu: AllocationUsage {
            max_usage: MAX_LIMIT,
            unreserved_for_pool: MAX_LIMIT,
        },
        memory: AllocationUsage {
            max_usage: MAX_LIMIT,
            unreserved_for_pool: MAX_LIMIT,
        },
    }
}

pub fn stub_datacenter_node() -> ComputeResourceNode {
    ComputeResourceNode::new("datacenter", NodeTypeId::Datacenter).with_object_ref(DC_REF)
}

pub fn stub_cluster_node() -> ComputeResourceNode {
    ComputeResourceNode::new("cluster", NodeTypeId::DcCluster)
        .with_aliases(vec!["cluster".to_string()])
}

fn stub_failure(operation: &str) -> VchAdminError {
    VchAdminError::fetch(
        operation,
        std::io::Error::new(std::io::ErrorKind::Other, "stubbed backend failure"),
    )
}

/// In-memory [`ResourceDirectory`] with per-call failure switches.
pub struct StubResourceDirectory {
    pub datacenters: Vec<InventoryLabel>,
    pub clusters: Vec<ComputeResourceNode>,
    pub hosts_and_pools: Vec<ComputeResourceNode>,
    pub allocation: ResourceAllocationInfo,
    pub drs_status: Vec<DrsStatus>,
    pub vm_groups: Vec<VmGroup>,
    pub fail_inventory: AtomicBool,
    pub fail_allocations: AtomicBool,
}

impl Default for StubResourceDirectory {
    fn default() -> Self {
        Self {
            datacenters: vec![InventoryLabel {
                text: "datacenter".to_string(),
            }],
            clusters: vec![stub_cluster_node()],
            hosts_and_pools: vec![stub_cluster_node()],
            allocation: stub_allocation_info(),
            drs_status: Vec::new(),
            vm_groups: Vec::new(),
            fail_inventory: AtomicBool::new(false),
            fail_allocations: AtomicBool::new(false),
        }
    }
}

impl StubResourceDirectory {
    pub fn set_fail_inventory(&self, fail: bool) {
        self.fail_inventory.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_allocations(&self, fail: bool) {
        self.fail_allocations.store(fail, Ordering::SeqCst);
    }

    fn inventory_guard(&self, operation: &str) -> VchResult<()> {
        if self.fail_inventory.load(Ordering::SeqCst) {
            return Err(stub_failure(operation));
        }
        Ok(())
    }
}

#[async_trait]
impl ResourceDirectory for StubResourceDirectory {
    async fn get_datacenters(&self) -> VchResult<Vec<InventoryLabel>> {
        self.inventory_guard("get_datacenters")?;
        Ok(self.datacenters.clone())
    }

    async fn get_clusters_list(&self, _service_guid: &str) -> VchResult<Vec<ComputeResourceNode>> {
        self.inventory_guard("get_clusters_list")?;
        Ok(self.clusters.clone())
    }

    async fn get_hosts_and_resource_pools(
        &self,
        _service_guid: &str,
    ) -> VchResult<Vec<ComputeResourceNode>> {
        self.inventory_guard("get_hosts_and_resource_pools")?;
        Ok(self.hosts_and_pools.clone())
    }

    async fn get_resource_allocations_info(
        &self,
        _resource_moid: &str,
    ) -> VchResult<ResourceAllocationInfo> {
        if self.fail_allocations.load(Ordering::SeqCst) {
            return Err(stub_failure("get_resource_allocations_info"));
        }
        Ok(self.allocation)
    }

    async fn get_cluster_vm_groups(&self, _cluster_moid: &str) -> VchResult<Vec<VmGroup>> {
        Ok(self.vm_groups.clone())
    }

    async fn get_cluster_drs_status(&self, _cluster_moid: &str) -> VchResult<Vec<DrsStatus>> {
        Ok(self.drs_status.clone())
    }
}

/// [`SessionProvider`] backed by a fixed server list.
pub struct StubSessionProvider {
    pub servers: Vec<ServerInfo>,
}

impl Default for StubSessionProvider {
    fn default() -> Self {
        Self {
            servers: vec![ServerInfo {
                name: "server.vsphere.local".to_string(),
                service_guid: "aaaa-bbb-ccc".to_string(),
                thumbprint: "AA:BB:CC".to_string(),
            }],
        }
    }
}

impl StubSessionProvider {
    pub fn empty() -> Self {
        Self {
            servers: Vec::new(),
        }
    }
}

impl SessionProvider for StubSessionProvider {
    fn servers_info(&self) -> Vec<ServerInfo> {
        self.servers.clone()
    }
}
