//! Extension points invoked while a workload is resolved.
//!
//! The resolver never logs on its own; it reports to an injected observer.
//! [`TracingObserver`] turns those reports into `tracing` events.

use super::events::{EnforcementAction, LifecycleEvent};
use crate::error::PolicyError;
use crate::types::{RuleSet, WorkloadRuntime};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Final outcome of one `handle_event` call
#[derive(Debug)]
pub struct DispatchOutcome<'a> {
    pub pu_id: &'a str,
    pub event: LifecycleEvent,
    pub policy_index: &'a str,
    /// Controller call that was attempted; `None` when nothing reached the controller
    pub action: Option<EnforcementAction>,
    pub correlation_id: Option<Uuid>,
    pub error: Option<&'a PolicyError>,
}

/// Receives resolution progress. Every method defaults to a no-op.
#[allow(unused_variables)]
pub trait ResolutionObserver: Send + Sync {
    fn resolving(&self, pu_id: &str, runtime: &dyn WorkloadRuntime) {}

    /// No index label was found and the default index is used
    fn index_defaulted(&self, pu_id: &str, runtime: &dyn WorkloadRuntime) {}

    fn index_selected(&self, pu_id: &str, policy_index: &str) {}

    fn index_missing(&self, pu_id: &str, policy_index: &str) {}

    fn rules_synthesized(&self, pu_id: &str, runtime: &dyn WorkloadRuntime, rules: &RuleSet) {}

    fn dispatched(&self, outcome: &DispatchOutcome<'_>) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl ResolutionObserver for SilentObserver {}

/// Observer that emits structured `tracing` events
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ResolutionObserver for TracingObserver {
    fn resolving(&self, pu_id: &str, runtime: &dyn WorkloadRuntime) {
        info!(pu_id, name = runtime.name(), "Resolving policy for workload");
    }

    fn index_defaulted(&self, pu_id: &str, runtime: &dyn WorkloadRuntime) {
        info!(
            pu_id,
            name = runtime.name(),
            "No policy index label - associating default policy"
        );
    }

    fn index_selected(&self, pu_id: &str, policy_index: &str) {
        info!(pu_id, policy_index, "Using policy index from labels");
    }

    fn index_missing(&self, pu_id: &str, policy_index: &str) {
        warn!(pu_id, policy_index, "Requested policy index not in store");
    }

    fn rules_synthesized(&self, pu_id: &str, runtime: &dyn WorkloadRuntime, rules: &RuleSet) {
        for (selector, rule) in rules.iter().enumerate() {
            for (clause, kv) in rule.clause.iter().enumerate() {
                debug!(
                    pu_id,
                    name = runtime.name(),
                    selector,
                    clause,
                    key = %kv.key,
                    values = ?kv.value,
                    operator = ?kv.operator,
                    action = %rule.policy.action,
                    rule_id = %rule.policy.policy_id,
                    "Default rule for workload"
                );
            }
        }
        debug!(
            pu_id,
            name = runtime.name(),
            tags = %runtime.tags(),
            rule_count = rules.len(),
            "Synthesized default rules"
        );
    }

    fn dispatched(&self, outcome: &DispatchOutcome<'_>) {
        let action = outcome
            .action
            .map(|a| a.to_string())
            .unwrap_or_else(|| "none".to_string());

        match outcome.error {
            None => info!(
                pu_id = outcome.pu_id,
                event = %outcome.event,
                policy_index = outcome.policy_index,
                action = %action,
                "Lifecycle event handled"
            ),
            Some(PolicyError::Cancelled) => warn!(
                pu_id = outcome.pu_id,
                event = %outcome.event,
                "Lifecycle event cancelled"
            ),
            Some(err) => error!(
                pu_id = outcome.pu_id,
                event = %outcome.event,
                policy_index = outcome.policy_index,
                action = %action,
                error = %err,
                "Lifecycle event failed"
            ),
        }
    }
}

/// Fans every report out to several observers, in order
#[derive(Clone, Default)]
pub struct ObserverChain {
    observers: Vec<Arc<dyn ResolutionObserver>>,
}

impl ObserverChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, observer: Arc<dyn ResolutionObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl ResolutionObserver for ObserverChain {
    fn resolving(&self, pu_id: &str, runtime: &dyn WorkloadRuntime) {
        self.observers
            .iter()
            .for_each(|o| o.resolving(pu_id, runtime));
    }

    fn index_defaulted(&self, pu_id: &str, runtime: &dyn WorkloadRuntime) {
        self.observers
            .iter()
            .for_each(|o| o.index_defaulted(pu_id, runtime));
    }

    fn index_selected(&self, pu_id: &str, policy_index: &str) {
        self.observers
            .iter()
            .for_each(|o| o.index_selected(pu_id, policy_index));
    }

    fn index_missing(&self, pu_id: &str, policy_index: &str) {
        self.observers
            .iter()
            .for_each(|o| o.index_missing(pu_id, policy_index));
    }

    fn rules_synthesized(&self, pu_id: &str, runtime: &dyn WorkloadRuntime, rules: &RuleSet) {
        self.observers
            .iter()
            .for_each(|o| o.rules_synthesized(pu_id, runtime, rules));
    }

    fn dispatched(&self, outcome: &DispatchOutcome<'_>) {
        self.observers.iter().for_each(|o| o.dispatched(outcome));
    }
}
