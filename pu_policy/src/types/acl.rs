use super::rule::FlowPolicy;
use serde::{Deserialize, Serialize};

/// Network ACL clause keyed on address, port and protocol
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IpRule {
    /// CIDR or single address
    pub address: String,

    /// Single port or `min:max` range
    #[serde(default)]
    pub port: String,

    #[serde(default)]
    pub protocol: String,

    pub policy: FlowPolicy,
}

pub type IpRuleList = Vec<IpRule>;
