use super::{acl::IpRuleList, labels::LabelSet, rule::RuleSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How the controller treats traffic for a workload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyMode {
    /// Enforce the attached rules
    Police,
}

/// Concrete policy for a single workload, as handed to the controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuPolicy {
    /// Workload identifier
    pub pu_id: String,

    pub mode: PolicyMode,

    pub application_acls: IpRuleList,

    pub network_acls: IpRuleList,

    /// Rules for traffic the workload sends
    pub dependencies: RuleSet,

    /// Rules for traffic the workload accepts
    pub exposure_rules: RuleSet,

    /// Labels that identify the workload
    pub identity: LabelSet,

    /// Labels the workload exposes to its peers
    pub annotations: LabelSet,

    /// Extended address map; filled in by the controller
    pub extended_ips: BTreeMap<String, String>,

    /// Networks on which the controller applies authentication
    pub target_networks: Vec<String>,

    pub excluded_networks: Vec<String>,
}
