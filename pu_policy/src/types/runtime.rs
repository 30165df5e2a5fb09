use super::labels::LabelSet;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;

/// Read-only view of a running workload, supplied by the monitor.
///
/// `as_any` lets a controller recover its own concrete runtime type for the
/// handle data it needs.
pub trait WorkloadRuntime: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    fn tags(&self) -> &LabelSet;

    fn as_any(&self) -> &dyn Any;
}

/// Runtime record for a protected unit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuRuntime {
    name: String,
    tags: LabelSet,
    pid: Option<u32>,
    ips: BTreeMap<String, String>,
}

impl PuRuntime {
    pub fn new(name: impl Into<String>, tags: LabelSet) -> Self {
        Self {
            name: name.into(),
            tags,
            pid: None,
            ips: BTreeMap::new(),
        }
    }

    pub fn with_pid(mut self, pid: u32) -> Self {
        self.pid = Some(pid);
        self
    }

    /// Record an address under a network name (e.g. `bridge`)
    pub fn with_ip(mut self, network: impl Into<String>, address: impl Into<String>) -> Self {
        self.ips.insert(network.into(), address.into());
        self
    }

    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    pub fn ips(&self) -> &BTreeMap<String, String> {
        &self.ips
    }
}

impl WorkloadRuntime for PuRuntime {
    fn name(&self) -> &str {
        &self.name
    }

    fn tags(&self) -> &LabelSet {
        &self.tags
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
