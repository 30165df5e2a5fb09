use crate::types::{IpRuleList, RuleSet};
use serde::{Deserialize, Deserializer, Serialize};

/// A named, cacheable policy template as read from the policy file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyEntry {
    #[serde(rename = "ApplicationACLs", default, deserialize_with = "null_as_default")]
    pub application_acls: IpRuleList,

    #[serde(rename = "NetworkACLs", default, deserialize_with = "null_as_default")]
    pub network_acls: IpRuleList,

    #[serde(rename = "Dependencies", default, deserialize_with = "null_as_default")]
    pub dependencies: RuleSet,

    #[serde(rename = "ExposureRules", default, deserialize_with = "null_as_default")]
    pub exposure_rules: RuleSet,
}

impl PolicyEntry {
    /// Built-in template stored under the default index: no ACLs, no rules
    pub fn builtin_default() -> Self {
        Self::default()
    }
}

// An explicit `null` in the file means "empty list", same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
