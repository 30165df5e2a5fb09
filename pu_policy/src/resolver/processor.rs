use super::{
    context::ResolveContext,
    controller::EnforcementController,
    events::{EnforcementAction, LifecycleEvent},
    extract_policy_index,
    observer::{DispatchOutcome, ResolutionObserver, TracingObserver},
};
use crate::config::{ConfigError, ResolverConfig, DEFAULT_INDEX_LABEL_PREFIXES};
use crate::error::{PolicyError, Result};
use crate::store::{PolicyStore, DEFAULT_POLICY_INDEX};
use crate::synthesizer::synthesize_default;
use crate::types::{PolicyMode, PuPolicy, WorkloadRuntime};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Resolves workloads to policies and drives the enforcement controller.
///
/// Stateless across calls: every event re-derives the policy from the
/// runtime it carries, so `handle_event` can run concurrently for any
/// number of workloads.
pub struct PolicyResolver {
    store: Arc<PolicyStore>,
    controller: Arc<dyn EnforcementController>,
    target_networks: Vec<String>,
    index_prefixes: Vec<String>,
    observer: Arc<dyn ResolutionObserver>,
}

impl PolicyResolver {
    /// Create a resolver over an already loaded store
    pub fn new(
        controller: Arc<dyn EnforcementController>,
        store: Arc<PolicyStore>,
        target_networks: Vec<String>,
    ) -> Self {
        Self {
            store,
            controller,
            target_networks,
            index_prefixes: DEFAULT_INDEX_LABEL_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            observer: Arc::new(TracingObserver),
        }
    }

    /// Validate `config`, load its policy file and build a resolver around it
    pub fn from_config(
        controller: Arc<dyn EnforcementController>,
        config: &ResolverConfig,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let store = PolicyStore::load(&config.policy_file);
        Ok(
            Self::new(controller, Arc::new(store), config.target_networks.clone())
                .with_index_prefixes(config.index_label_prefixes.clone()),
        )
    }

    pub fn with_observer(mut self, observer: Arc<dyn ResolutionObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_index_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.index_prefixes = prefixes;
        self
    }

    pub fn store(&self) -> &PolicyStore {
        &self.store
    }

    pub fn target_networks(&self) -> &[String] {
        &self.target_networks
    }

    /// Index selected by the workload's labels, or the default index
    pub fn policy_index(&self, pu_id: &str, runtime: &dyn WorkloadRuntime) -> String {
        match extract_policy_index(runtime.tags(), &self.index_prefixes) {
            Some(index) => {
                self.observer.index_selected(pu_id, index);
                index.to_string()
            }
            None => {
                self.observer.index_defaulted(pu_id, runtime);
                DEFAULT_POLICY_INDEX.to_string()
            }
        }
    }

    /// Build the policy for a workload without contacting the controller
    pub fn resolve(&self, pu_id: &str, runtime: &dyn WorkloadRuntime) -> Result<PuPolicy> {
        self.observer.resolving(pu_id, runtime);
        let index = self.policy_index(pu_id, runtime);
        self.build_policy(pu_id, &index, runtime)
    }

    /// Resolve the workload's policy and apply the controller call mapped
    /// from `event`. Events without a mapped call are ignored.
    ///
    /// The policy index is checked before the event: an ignored event for a
    /// workload labelled with an unknown index still fails with
    /// [`PolicyError::IndexNotFound`].
    pub async fn handle_event(
        &self,
        ctx: &ResolveContext,
        pu_id: &str,
        event: LifecycleEvent,
        runtime: &dyn WorkloadRuntime,
    ) -> Result<()> {
        self.observer.resolving(pu_id, runtime);
        let index = self.policy_index(pu_id, runtime);

        let dispatch = self.dispatch(ctx, pu_id, event, &index, runtime).await;

        self.observer.dispatched(&DispatchOutcome {
            pu_id,
            event,
            policy_index: &index,
            action: dispatch.action,
            correlation_id: ctx.correlation_id(),
            error: dispatch.result.as_ref().err(),
        });

        dispatch.result
    }

    async fn dispatch(
        &self,
        ctx: &ResolveContext,
        pu_id: &str,
        event: LifecycleEvent,
        index: &str,
        runtime: &dyn WorkloadRuntime,
    ) -> Dispatch {
        let policy = match self.build_policy(pu_id, index, runtime) {
            Ok(policy) => policy,
            Err(err) => return Dispatch::skipped(Err(err)),
        };

        let Some(action) = event.action() else {
            return Dispatch::skipped(Ok(()));
        };
        if ctx.is_cancelled() {
            return Dispatch::skipped(Err(PolicyError::Cancelled));
        }

        let call = async {
            match action {
                EnforcementAction::Enforce => {
                    self.controller.enforce(ctx, pu_id, &policy, runtime).await
                }
                EnforcementAction::UnEnforce => {
                    self.controller.unenforce(ctx, pu_id, &policy, runtime).await
                }
            }
        };

        let result = ctx
            .run(call)
            .await
            .and_then(|outcome| outcome.map_err(PolicyError::from));

        Dispatch {
            action: Some(action),
            result,
        }
    }

    fn build_policy(
        &self,
        pu_id: &str,
        index: &str,
        runtime: &dyn WorkloadRuntime,
    ) -> Result<PuPolicy> {
        let Some(entry) = self.store.get(index) else {
            self.observer.index_missing(pu_id, index);
            return Err(PolicyError::IndexNotFound(index.to_string()));
        };

        // Default rules come from the workload's own labels; the stored
        // template is only read.
        let (dependencies, exposure_rules) = if index == DEFAULT_POLICY_INDEX {
            let rules = synthesize_default(runtime.tags());
            self.observer.rules_synthesized(pu_id, runtime, &rules);
            (rules.clone(), rules)
        } else {
            (entry.dependencies.clone(), entry.exposure_rules.clone())
        };

        Ok(PuPolicy {
            pu_id: pu_id.to_string(),
            mode: PolicyMode::Police,
            application_acls: entry.application_acls.clone(),
            network_acls: entry.network_acls.clone(),
            dependencies,
            exposure_rules,
            identity: runtime.tags().clone(),
            annotations: runtime.tags().clone(),
            extended_ips: BTreeMap::new(),
            target_networks: self.target_networks.clone(),
            excluded_networks: Vec::new(),
        })
    }
}

/// Controller call attempted for an event, if any, and how handling ended
struct Dispatch {
    action: Option<EnforcementAction>,
    result: Result<()>,
}

impl Dispatch {
    fn skipped(result: Result<()>) -> Self {
        Self {
            action: None,
            result,
        }
    }
}
