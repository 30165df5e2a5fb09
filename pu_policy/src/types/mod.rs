pub mod acl;
pub mod labels;
pub mod policy;
pub mod rule;
pub mod runtime;

pub use acl::{IpRule, IpRuleList};
pub use labels::{split_label, LabelSet, LABEL_SEPARATOR};
pub use policy::{PolicyMode, PuPolicy};
pub use rule::{Clause, FlowAction, FlowPolicy, Operator, Rule, RuleSet};
pub use runtime::{PuRuntime, WorkloadRuntime};
