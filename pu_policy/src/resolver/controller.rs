use super::{context::ResolveContext, events::EnforcementAction};
use crate::types::{PuPolicy, WorkloadRuntime};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

/// Errors reported by an enforcement controller
#[derive(Debug, Error)]
pub enum EnforcementError {
    #[error("Controller rejected policy for {pu_id}: {reason}")]
    Rejected { pu_id: String, reason: String },

    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// The subsystem that installs and removes policies for workloads.
///
/// Implementations must treat a repeated `enforce` as an update and an
/// `unenforce` for an unknown workload as a no-op.
#[async_trait]
pub trait EnforcementController: Send + Sync {
    async fn enforce(
        &self,
        ctx: &ResolveContext,
        pu_id: &str,
        policy: &PuPolicy,
        runtime: &dyn WorkloadRuntime,
    ) -> Result<(), EnforcementError>;

    async fn unenforce(
        &self,
        ctx: &ResolveContext,
        pu_id: &str,
        policy: &PuPolicy,
        runtime: &dyn WorkloadRuntime,
    ) -> Result<(), EnforcementError>;
}

/// One call received by a [`DryRunController`]
#[derive(Debug, Clone, Serialize)]
pub struct DispatchRecord {
    pub action: EnforcementAction,
    pub pu_id: String,
    pub runtime_name: String,
    pub policy: PuPolicy,
}

/// Controller that records and logs calls without touching the network stack
#[derive(Debug, Default)]
pub struct DryRunController {
    records: Mutex<Vec<DispatchRecord>>,
}

impl DryRunController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls received so far, oldest first
    pub fn records(&self) -> Vec<DispatchRecord> {
        self.records.lock().clone()
    }

    fn record(
        &self,
        action: EnforcementAction,
        pu_id: &str,
        policy: &PuPolicy,
        runtime: &dyn WorkloadRuntime,
    ) {
        info!(
            pu_id,
            name = runtime.name(),
            %action,
            dependencies = policy.dependencies.len(),
            exposure_rules = policy.exposure_rules.len(),
            "Dry-run dispatch"
        );
        self.records.lock().push(DispatchRecord {
            action,
            pu_id: pu_id.to_string(),
            runtime_name: runtime.name().to_string(),
            policy: policy.clone(),
        });
    }
}

#[async_trait]
impl EnforcementController for DryRunController {
    async fn enforce(
        &self,
        _ctx: &ResolveContext,
        pu_id: &str,
        policy: &PuPolicy,
        runtime: &dyn WorkloadRuntime,
    ) -> Result<(), EnforcementError> {
        self.record(EnforcementAction::Enforce, pu_id, policy, runtime);
        Ok(())
    }

    async fn unenforce(
        &self,
        _ctx: &ResolveContext,
        pu_id: &str,
        policy: &PuPolicy,
        runtime: &dyn WorkloadRuntime,
    ) -> Result<(), EnforcementError> {
        self.record(EnforcementAction::UnEnforce, pu_id, policy, runtime);
        Ok(())
    }
}
