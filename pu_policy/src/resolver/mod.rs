pub mod context;
pub mod controller;
pub mod events;
pub mod observer;
pub mod processor;


pub use context::{CancelHandle, ResolveContext};
pub use controller::{DispatchRecord, DryRunController, EnforcementController, EnforcementError};
pub use events::{EnforcementAction, LifecycleEvent};
pub use observer::{
    DispatchOutcome, ObserverChain, ResolutionObserver, SilentObserver, TracingObserver,
};
pub use processor::PolicyResolver;

use crate::types::LabelSet;

/// Value of the first label whose key starts with one of `prefixes`.
///
/// A matching label without a value selects the empty index.
pub fn extract_policy_index<'a>(labels: &'a LabelSet, prefixes: &[String]) -> Option<&'a str> {
    labels
        .pairs()
        .find(|(key, _)| prefixes.iter().any(|prefix| key.starts_with(prefix.as_str())))
        .map(|(_, value)| value)
}
