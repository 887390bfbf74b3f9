//! The compute-capacity wizard step.
//!
//! Holds the step's whole state: the resource tree, the current selection,
//! the allocation bounds the validators check against, and the capacity form
//! itself. The step is single-owner; all collaborator calls suspend the
//! calling handler and nothing blocks.
//!
//! Selections race with their allocation-info fetches: a fetch started for an
//! earlier selection may resolve after a newer one. Every selection bumps an
//! epoch and results are applied only when their epoch is still current, so
//! the last selection always wins.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::abstractions::{ResourceDirectory, SessionProvider, WizardStep};
use crate::commit::{CommitOutcome, CommittedConfig, FieldError};
use crate::compute_tree::ComputeResourceTree;
use crate::config::WizardConfig;
use crate::error::{VchAdminError, VchResult};
use crate::moref::{datacenter_id_from_ref, ManagedObjectRef};
use crate::types::{
    ComputeCapacityModel, ComputeResourceNode, DrsStatus, InventoryLabel, NodeTypeId,
    ResourceAllocationInfo, SelectionEvent, ServerInfo, VmGroup,
};
use crate::validation::{CapacityField, CapacityForm};

const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Lifecycle phases of the step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPhase {
    Initial,
    ResourcesLoaded,
    ResourceSelected,
    FormReady,
}

/// Notifications the surrounding UI layer can subscribe to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepEvent {
    ResourcesLoaded { cluster_count: usize },
    SelectionChanged { moid: String, epoch: u64 },
    AllocationRefreshed { epoch: u64 },
    StaleAllocationDiscarded { epoch: u64 },
    ModeToggled { advanced: bool },
    Reset,
}

/// The current compute-resource selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub node: ComputeResourceNode,
    pub datacenter_moid: Option<String>,
    pub moid: String,
}

pub struct ComputeCapacityStep {
    directory: Arc<dyn ResourceDirectory>,
    session: Arc<dyn SessionProvider>,
    config: WizardConfig,
    phase: StepPhase,
    datacenter: Option<InventoryLabel>,
    clusters: Vec<ComputeResourceNode>,
    tree: ComputeResourceTree,
    form: CapacityForm,
    selection: Option<Selection>,
    allocation: Option<ResourceAllocationInfo>,
    drs_status: Vec<DrsStatus>,
    vm_groups: Vec<VmGroup>,
    selection_epoch: u64,
    events: broadcast::Sender<StepEvent>,
}

impl ComputeCapacityStep {
    pub fn new(
        directory: Arc<dyn ResourceDirectory>,
        session: Arc<dyn SessionProvider>,
        config: WizardConfig,
    ) -> VchResult<Self> {
        config.validate()?;
        let form = CapacityForm::new(&config.defaults, config.start_in_advanced_mode);
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Ok(Self {
            directory,
            session,
            config,
            phase: StepPhase::Initial,
            datacenter: None,
            clusters: Vec::new(),
            tree: ComputeResourceTree::new(),
            form,
            selection: None,
            allocation: None,
            drs_status: Vec::new(),
            vm_groups: Vec::new(),
            selection_epoch: 0,
            events,
        })
    }

    /// Subscribe to step notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<StepEvent> {
        self.events.subscribe()
    }

    pub fn phase(&self) -> StepPhase {
        self.phase
    }

    pub fn datacenter(&self) -> Option<&InventoryLabel> {
        self.datacenter.as_ref()
    }

    pub fn clusters(&self) -> &[ComputeResourceNode] {
        &self.clusters
    }

    pub fn tree(&self) -> &ComputeResourceTree {
        &self.tree
    }

    pub fn form(&self) -> &CapacityForm {
        &self.form
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn allocation(&self) -> Option<&ResourceAllocationInfo> {
        self.allocation.as_ref()
    }

    pub fn drs_status(&self) -> &[DrsStatus] {
        &self.drs_status
    }

    pub fn vm_groups(&self) -> &[VmGroup] {
        &self.vm_groups
    }

    pub fn selection_epoch(&self) -> u64 {
        self.selection_epoch
    }

    /// Record operator input for one capacity field.
    pub fn set_field(&mut self, field: CapacityField, value: impl Into<String>) {
        self.form.set_value(field, value);
    }

    /// Switch between basic and advanced mode. Entered values survive.
    pub fn toggle_advanced_mode(&mut self) {
        let advanced = !self.form.advanced();
        self.form.set_advanced(advanced);
        debug!(advanced, "capacity form mode toggled");
        let _ = self.events.send(StepEvent::ModeToggled { advanced });
    }

    /// Fetch the datacenter and session-scoped cluster lists.
    ///
    /// On failure nothing is mutated; the caller may re-invoke to retry.
    pub async fn on_page_load(&mut self) -> VchResult<()> {
        let server = self.active_server()?;
        let (datacenters, clusters) = futures::join!(
            self.directory.get_datacenters(),
            self.directory.get_clusters_list(&server.service_guid),
        );
        let datacenters = match datacenters {
            Ok(datacenters) => datacenters,
            Err(e) => {
                warn!(error = %e, "datacenter list fetch failed");
                return Err(e);
            }
        };
        let clusters = match clusters {
            Ok(clusters) => clusters,
            Err(e) => {
                warn!(error = %e, "cluster list fetch failed");
                return Err(e);
            }
        };

        self.datacenter = datacenters.into_iter().next();
        self.clusters = clusters;
        if self.phase == StepPhase::Initial {
            self.phase = StepPhase::ResourcesLoaded;
        }
        info!(cluster_count = self.clusters.len(), "compute resources loaded");
        let _ = self.events.send(StepEvent::ResourcesLoaded {
            cluster_count: self.clusters.len(),
        });
        Ok(())
    }

    /// Resolve the host/resource-pool records for the named datacenter and
    /// rebuild the selection tree. The prior tree is kept on failure.
    pub async fn load_resources(&mut self, datacenter_text: &str) -> VchResult<&[ComputeResourceNode]> {
        let server = self.active_server()?;
        let records = self
            .directory
            .get_hosts_and_resource_pools(&server.service_guid)
            .await
            .map_err(|e| {
                warn!(error = %e, datacenter = datacenter_text, "resource tree fetch failed");
                e
            })?;
        self.tree = ComputeResourceTree::build(datacenter_text, records);
        debug!(
            datacenter = datacenter_text,
            roots = self.tree.roots().len(),
            "resource tree rebuilt"
        );
        Ok(self.tree.roots())
    }

    /// Record a tree selection and refresh the allocation bounds for it.
    ///
    /// Convenience composition of [`begin_selection`](Self::begin_selection)
    /// and [`apply_allocation`](Self::apply_allocation) for callers that can
    /// suspend inline. A fetch failure keeps the selection but leaves the
    /// prior bounds in place; re-selecting retries.
    pub async fn select_compute_resource(&mut self, event: SelectionEvent) -> VchResult<()> {
        let epoch = self.begin_selection(&event)?;
        let moid = self
            .selection
            .as_ref()
            .map(|s| s.moid.clone())
            .unwrap_or_default();

        let info = self
            .directory
            .get_resource_allocations_info(&moid)
            .await
            .map_err(|e| {
                warn!(error = %e, moid = %moid, "allocation info fetch failed");
                e
            })?;
        self.apply_allocation(epoch, info);

        if event.obj.node_type_id == NodeTypeId::DcCluster {
            if let Err(e) = self.refresh_cluster_details().await {
                // Informational only; the form stays usable without them.
                warn!(error = %e, moid = %moid, "cluster details fetch failed");
            }
        }
        Ok(())
    }

    /// First phase of a selection: derive the moids, bump the epoch and store
    /// the selection. Returns the epoch to hand back to
    /// [`apply_allocation`](Self::apply_allocation) once the allocation fetch
    /// resolves. A malformed reference leaves all state untouched.
    pub fn begin_selection(&mut self, event: &SelectionEvent) -> VchResult<u64> {
        let datacenter_moid = event
            .datacenter
            .as_ref()
            .map(|dc| datacenter_id_from_ref(&dc.object_ref))
            .transpose()?;
        let moid = Self::resolve_moid(&event.obj, datacenter_moid.as_deref())?;

        self.selection_epoch += 1;
        let epoch = self.selection_epoch;
        self.selection = Some(Selection {
            node: event.obj.clone(),
            datacenter_moid,
            moid: moid.clone(),
        });
        self.drs_status.clear();
        self.vm_groups.clear();
        self.phase = StepPhase::ResourceSelected;
        info!(moid = %moid, epoch, "compute resource selected");
        let _ = self.events.send(StepEvent::SelectionChanged { moid, epoch });
        Ok(epoch)
    }

    /// Second phase of a selection: install fetched allocation bounds.
    ///
    /// Returns false and discards the result when `epoch` is no longer the
    /// current selection epoch (a newer selection superseded the fetch).
    pub fn apply_allocation(&mut self, epoch: u64, info: ResourceAllocationInfo) -> bool {
        if epoch != self.selection_epoch {
            warn!(
                epoch,
                current = self.selection_epoch,
                "discarding stale allocation info"
            );
            let _ = self.events.send(StepEvent::StaleAllocationDiscarded { epoch });
            return false;
        }
        self.allocation = Some(info);
        self.form.set_bounds(Some(info));
        self.phase = StepPhase::FormReady;
        debug!(
            cpu_max = info.cpu.max_usage,
            memory_max = info.memory.max_usage,
            "allocation bounds refreshed"
        );
        let _ = self.events.send(StepEvent::AllocationRefreshed { epoch });
        true
    }

    /// Refresh the DRS status and VM groups of the currently selected
    /// cluster. No-op for non-cluster selections.
    pub async fn refresh_cluster_details(&mut self) -> VchResult<()> {
        let (moid, epoch) = match &self.selection {
            Some(s) if s.node.node_type_id == NodeTypeId::DcCluster => {
                (s.moid.clone(), self.selection_epoch)
            }
            _ => return Ok(()),
        };
        let (drs, groups) = futures::join!(
            self.directory.get_cluster_drs_status(&moid),
            self.directory.get_cluster_vm_groups(&moid),
        );
        if epoch != self.selection_epoch {
            warn!(epoch, "discarding stale cluster details");
            return Ok(());
        }
        let (drs, groups) = (drs?, groups?);
        self.drs_status = drs;
        self.vm_groups = groups;
        debug!(
            moid = %moid,
            vm_groups = self.vm_groups.len(),
            "cluster details refreshed"
        );
        Ok(())
    }

    /// Project the current form values into a [`ComputeCapacityModel`].
    ///
    /// Pure and idempotent; callable in any phase.
    pub fn update_current_model(&self) -> ComputeCapacityModel {
        let advanced = self.form.advanced();
        let advanced_value =
            |field: CapacityField| advanced.then(|| self.form.value(field).to_string());
        let model = ComputeCapacityModel {
            cpu_limit: self.form.value(CapacityField::CpuLimit).to_string(),
            cpu_reservation: advanced_value(CapacityField::CpuReservation),
            cpu_shares: advanced_value(CapacityField::CpuShares),
            memory_limit: self.form.value(CapacityField::MemoryLimit).to_string(),
            memory_reservation: advanced_value(CapacityField::MemoryReservation),
            memory_shares: advanced_value(CapacityField::MemoryShares),
            is_advanced_mode: advanced,
            compute_resource_moid: self
                .selection
                .as_ref()
                .map(|s| s.moid.clone())
                .unwrap_or_default(),
        };
        debug!(moid = %model.compute_resource_moid, "capacity model projected");
        model
    }

    /// Validate everything and either commit or report the blocking errors.
    ///
    /// Re-entrant: repeated calls without input changes yield equal outcomes,
    /// and a commit with no selection fails with a required-selection error
    /// rather than panicking.
    pub fn on_commit(&mut self) -> CommitOutcome {
        self.form.mark_all_touched();

        let mut errors: Vec<FieldError> = Vec::new();
        if self.selection.is_none() {
            errors.push(FieldError::selection_required());
        }
        errors.extend(
            self.form
                .errors()
                .into_iter()
                .map(|(field, kind)| FieldError::new(field, kind)),
        );

        if !errors.is_empty() {
            info!(error_count = errors.len(), "commit blocked by validation");
            return CommitOutcome::Invalid { errors };
        }

        let compute_capacity = self.update_current_model();
        info!(moid = %compute_capacity.compute_resource_moid, "compute capacity committed");
        CommitOutcome::Committed(CommittedConfig { compute_capacity })
    }

    /// Drop all transient state and return to the configured defaults.
    pub fn on_reset(&mut self) {
        self.form = CapacityForm::new(&self.config.defaults, self.config.start_in_advanced_mode);
        self.selection = None;
        self.allocation = None;
        self.datacenter = None;
        self.clusters.clear();
        self.tree.clear();
        self.drs_status.clear();
        self.vm_groups.clear();
        // Invalidate any in-flight fetch so it cannot resurrect old bounds.
        self.selection_epoch += 1;
        self.phase = StepPhase::Initial;
        info!("compute step reset");
        let _ = self.events.send(StepEvent::Reset);
    }

    fn active_server(&self) -> VchResult<ServerInfo> {
        self.session
            .servers_info()
            .into_iter()
            .next()
            .ok_or_else(|| VchAdminError::NotInitialized {
                component: "session server list".to_string(),
            })
    }

    /// Derive the committed moid for a selected node. Nodes without an object
    /// reference (synthetic or label-less entries) fall back to the
    /// datacenter moid.
    fn resolve_moid(
        node: &ComputeResourceNode,
        datacenter_moid: Option<&str>,
    ) -> VchResult<String> {
        if node.object_ref.is_empty() {
            return Ok(datacenter_moid.unwrap_or_default().to_string());
        }
        if ManagedObjectRef::is_urn(&node.object_ref) {
            return Ok(ManagedObjectRef::parse(&node.object_ref)?.id);
        }
        // Already a bare moid such as "domain-c7".
        Ok(node.object_ref.clone())
    }
}

#[async_trait]
impl WizardStep for ComputeCapacityStep {
    async fn on_page_load(&mut self) -> VchResult<()> {
        ComputeCapacityStep::on_page_load(self).await
    }

    async fn on_commit(&mut self) -> CommitOutcome {
        ComputeCapacityStep::on_commit(self)
    }

    fn on_reset(&mut self) {
        ComputeCapacityStep::on_reset(self)
    }
}
