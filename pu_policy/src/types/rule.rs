//! Tag-selector rules handed to the enforcement controller.
//!
//! The controller owns match semantics. This crate only builds and
//! orders rules.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison applied by a single clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "=!")]
    NotEqual,
    #[serde(rename = "*")]
    KeyExists,
    #[serde(rename = "!*")]
    KeyNotExists,
}

/// Outcome of a matched rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlowAction {
    Accept,
    Reject,
}

impl fmt::Display for FlowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowAction::Accept => write!(f, "accept"),
            FlowAction::Reject => write!(f, "reject"),
        }
    }
}

/// Action and identifier attached to a rule
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlowPolicy {
    #[serde(rename = "Action")]
    pub action: FlowAction,

    #[serde(rename = "PolicyID", default)]
    pub policy_id: String,
}

/// One `(key, operator, values)` triple
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Clause {
    pub key: String,

    #[serde(default)]
    pub value: Vec<String>,

    pub operator: Operator,
}

impl Clause {
    /// Clause matching `key == value` exactly
    pub fn equals(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: vec![value.into()],
            operator: Operator::Equal,
        }
    }
}

/// A conjunction of clauses with an outcome
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Rule {
    pub clause: Vec<Clause>,
    pub policy: FlowPolicy,
}

impl Rule {
    /// Single-clause equality rule
    pub fn equals(id: usize, key: &str, value: &str, action: FlowAction) -> Self {
        Self {
            clause: vec![Clause::equals(key, value)],
            policy: FlowPolicy {
                action,
                policy_id: id.to_string(),
            },
        }
    }

    pub fn action(&self) -> FlowAction {
        self.policy.action
    }

    pub fn id(&self) -> &str {
        &self.policy.policy_id
    }
}

/// Ordered rules; order is preserved end to end
pub type RuleSet = Vec<Rule>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_equals_rule() {
        let rule = Rule::equals(3, "app", "web", FlowAction::Accept);
        assert_eq!(rule.id(), "3");
        assert_eq!(rule.action(), FlowAction::Accept);
        assert_eq!(rule.clause.len(), 1);
        assert_eq!(rule.clause[0].operator, Operator::Equal);
        assert_eq!(rule.clause[0].value, vec!["web".to_string()]);
    }

    #[test]
    fn test_rule_wire_format() {
        let raw = json!({
            "Clause": [
                { "Key": "app", "Value": ["web", "api"], "Operator": "=" },
                { "Key": "debug", "Operator": "!*" }
            ],
            "Policy": { "Action": "Reject", "PolicyID": "r-1" }
        });

        let rule: Rule = serde_json::from_value(raw).unwrap();
        assert_eq!(rule.clause[0].value.len(), 2);
        assert_eq!(rule.clause[1].operator, Operator::KeyNotExists);
        assert!(rule.clause[1].value.is_empty());
        assert_eq!(rule.action(), FlowAction::Reject);
        assert_eq!(rule.id(), "r-1");
    }
}
