use async_trait::async_trait;

use crate::error::VchResult;
use crate::types::{
    ComputeResourceNode, DrsStatus, InventoryLabel, ResourceAllocationInfo, VmGroup,
};

/// Read access to the management console's inventory directory.
///
/// All calls are asynchronous and scoped to a management session; `service_guid`
/// comes from the session's server list. Implementations talk to the real
/// management API; the wizard core only consumes the declared shapes.
#[async_trait]
pub trait ResourceDirectory: Send + Sync {
    /// List the datacenters visible to the session.
    async fn get_datacenters(&self) -> VchResult<Vec<InventoryLabel>>;

    /// List the clusters of the server identified by `service_guid`.
    async fn get_clusters_list(&self, service_guid: &str) -> VchResult<Vec<ComputeResourceNode>>;

    /// List hosts and resource pools, flat, with alias metadata linking them
    /// to their parent clusters.
    async fn get_hosts_and_resource_pools(
        &self,
        service_guid: &str,
    ) -> VchResult<Vec<ComputeResourceNode>>;

    /// Fetch CPU/memory allocation bounds for the compute resource identified
    /// by `resource_moid`.
    async fn get_resource_allocations_info(
        &self,
        resource_moid: &str,
    ) -> VchResult<ResourceAllocationInfo>;

    /// List the DRS VM groups defined on a cluster.
    async fn get_cluster_vm_groups(&self, cluster_moid: &str) -> VchResult<Vec<VmGroup>>;

    /// Fetch the DRS status records of a cluster.
    async fn get_cluster_drs_status(&self, cluster_moid: &str) -> VchResult<Vec<DrsStatus>>;
}
