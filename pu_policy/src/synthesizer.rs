//! Default rule synthesis.
//!
//! Workloads that share a label trust each other; anything labelled
//! `namespace=bad` is rejected. Label-derived rules always come first.

use crate::types::{FlowAction, LabelSet, Rule, RuleSet};

/// Key of the trailing deny rule
pub const DENY_KEY: &str = "namespace";

/// Value of the trailing deny rule
pub const DENY_VALUE: &str = "bad";

/// Build the same-label-allow / namespace-deny rule set for `labels`.
///
/// Returns `labels.len() + 1` rules with ids `0..=labels.len()`. A label
/// without a separator produces a rule with an empty value.
pub fn synthesize_default(labels: &LabelSet) -> RuleSet {
    let mut rules: RuleSet = labels
        .pairs()
        .enumerate()
        .map(|(id, (key, value))| Rule::equals(id, key, value, FlowAction::Accept))
        .collect();

    rules.push(Rule::equals(
        rules.len(),
        DENY_KEY,
        DENY_VALUE,
        FlowAction::Reject,
    ));

    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Operator;

    fn labels(raw: &[&str]) -> LabelSet {
        raw.iter().copied().collect()
    }

    #[test]
    fn test_one_accept_rule_per_label_then_deny() {
        let rules = synthesize_default(&labels(&["app=web", "env=prod"]));

        assert_eq!(rules.len(), 3);
        assert_eq!(rules[0], Rule::equals(0, "app", "web", FlowAction::Accept));
        assert_eq!(rules[1], Rule::equals(1, "env", "prod", FlowAction::Accept));
        assert_eq!(rules[2], Rule::equals(2, "namespace", "bad", FlowAction::Reject));
    }

    #[test]
    fn test_empty_labels_yield_only_deny() {
        let rules = synthesize_default(&LabelSet::new());

        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].id(), "0");
        assert_eq!(rules[0].action(), FlowAction::Reject);
    }

    #[test]
    fn test_malformed_label_gets_empty_value() {
        let rules = synthesize_default(&labels(&["orphan", "app=web"]));

        assert_eq!(rules.len(), 3);
        assert_eq!(rules[0].clause[0].key, "orphan");
        assert_eq!(rules[0].clause[0].value, vec![String::new()]);
        assert_eq!(rules[0].clause[0].operator, Operator::Equal);
        assert_eq!(rules[1].id(), "1");
    }

    #[test]
    fn test_duplicate_keys_each_produce_a_rule() {
        let rules = synthesize_default(&labels(&["env=prod", "env=dev"]));
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[1].clause[0].value, vec!["dev".to_string()]);
    }

    #[test]
    fn test_shape_holds_for_many_label_sets() {
        for n in 0..32 {
            let set: LabelSet = (0..n).map(|i| format!("k{}=v{}", i, i)).collect();
            let rules = synthesize_default(&set);

            assert_eq!(rules.len(), n + 1);
            for (i, rule) in rules.iter().enumerate() {
                assert_eq!(rule.id(), i.to_string());
            }
            let last = rules.last().unwrap();
            assert_eq!(last.action(), FlowAction::Reject);
            assert_eq!(last.clause, vec![crate::types::Clause::equals("namespace", "bad")]);
            assert!(rules[..n].iter().all(|r| r.action() == FlowAction::Accept));
        }
    }

    #[test]
    fn test_deterministic() {
        let set = labels(&["app=web", "orphan", "tier=frontend"]);
        let first = synthesize_default(&set);
        let second = synthesize_default(&set);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }
}
