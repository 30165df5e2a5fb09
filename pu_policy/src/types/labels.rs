use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between a label key and its value
pub const LABEL_SEPARATOR: char = '=';

/// Ordered `key=value` labels attached to a workload when it is created.
///
/// Duplicate keys are allowed. Lookups return the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelSet(Vec<String>);

impl LabelSet {
    /// Create an empty label set
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a raw label
    pub fn push(&mut self, label: impl Into<String>) {
        self.0.push(label.into());
    }

    /// Append a label built from a key and a value
    pub fn with_pair(mut self, key: &str, value: &str) -> Self {
        self.0.push(format!("{}{}{}", key, LABEL_SEPARATOR, value));
        self
    }

    /// Raw labels in insertion order
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Labels split into `(key, value)` pairs, in order
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|label| split_label(label))
    }

    /// Value of the first label carrying `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Split a label on its first separator. A label without one has an empty value.
pub fn split_label(label: &str) -> (&str, &str) {
    label.split_once(LABEL_SEPARATOR).unwrap_or((label, ""))
}

impl<S: Into<String>> FromIterator<S> for LabelSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl From<Vec<String>> for LabelSet {
    fn from(labels: Vec<String>) -> Self {
        Self(labels)
    }
}

impl fmt::Display for LabelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}
