//! Policy resolution for protected units.
//!
//! Given a workload's lifecycle event and runtime labels, the resolver picks
//! a policy from a file-backed cache (synthesizing label-based rules for the
//! default entry) and drives an enforcement controller.

pub mod audit_log;
pub mod config;
pub mod error;
pub mod resolver;
pub mod store;
pub mod synthesizer;
pub mod types;

pub use audit_log::{AuditLog, AuditOutcome, AuditRecord};
pub use config::{ConfigError, ResolverConfig};
pub use error::{PolicyError, Result};
pub use resolver::{
    CancelHandle, DryRunController, EnforcementAction, EnforcementController, EnforcementError,
    LifecycleEvent, ObserverChain, PolicyResolver, ResolutionObserver, ResolveContext,
    TracingObserver,
};
pub use store::{LoadReport, PolicyEntry, PolicyStore, StoreError, DEFAULT_POLICY_INDEX};
pub use synthesizer::synthesize_default;
pub use types::{LabelSet, PuPolicy, PuRuntime, WorkloadRuntime};
