//! File-backed policy cache.
//!
//! The store is built once at startup and never changes afterwards. Every
//! store carries a usable entry under [`DEFAULT_POLICY_INDEX`].

mod entry;
mod error;

#[cfg(test)]
mod tests;

pub use entry::PolicyEntry;
pub use error::StoreError;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Reserved index that always resolves
pub const DEFAULT_POLICY_INDEX: &str = "default";

/// Default location of the policy file
pub const DEFAULT_POLICY_FILE: &str = "policy.json";

/// What happened while loading a policy file
#[derive(Debug)]
pub enum LoadReport {
    /// File parsed; `entries` counts the non-default indices it provided
    Loaded { path: PathBuf, entries: usize },
    /// File unusable; the store only holds the default entry
    Degraded(StoreError),
}

impl LoadReport {
    pub fn is_degraded(&self) -> bool {
        matches!(self, LoadReport::Degraded(_))
    }
}

/// Read-only mapping from policy index to policy entry
#[derive(Debug, Clone)]
pub struct PolicyStore {
    entries: HashMap<String, PolicyEntry>,
}

impl PolicyStore {
    /// Load policies from `path`, falling back to the built-in default on any failure
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        Self::load_with_report(path).0
    }

    /// Same as [`PolicyStore::load`], also reporting which degradation occurred
    pub fn load_with_report<P: AsRef<Path>>(path: P) -> (Self, LoadReport) {
        let path = path.as_ref();

        match Self::try_load(path) {
            Ok(store) => {
                let entries = store.len() - 1;
                info!(policy_file = %path.display(), entries, "Using policy from file");
                let report = LoadReport::Loaded {
                    path: path.to_path_buf(),
                    entries,
                };
                (store, report)
            }
            Err(err) => {
                match &err {
                    StoreError::FileUnavailable { .. } => {
                        warn!(error = %err, "No policy file found - using defaults")
                    }
                    StoreError::FileMalformed { .. } => {
                        error!(error = %err, "Invalid policies - using defaults")
                    }
                }
                (Self::default_only(), LoadReport::Degraded(err))
            }
        }
    }

    /// Strict load: any read or parse failure is returned to the caller
    pub fn try_load<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        debug!("Reading policy file: {:?}", path);

        // Raw bytes: undecodable content is a parse failure, not a missing file
        let content = fs::read(path).map_err(|source| StoreError::FileUnavailable {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json_slice(&content).map_err(|source| StoreError::FileMalformed {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse a policy document from raw bytes
    pub fn from_json_slice(content: &[u8]) -> Result<Self, serde_json::Error> {
        let entries: HashMap<String, PolicyEntry> = serde_json::from_slice(content)?;
        Ok(Self::from_entries(entries))
    }

    /// Build a store from entries. A caller-supplied default entry is replaced.
    pub fn from_entries(entries: HashMap<String, PolicyEntry>) -> Self {
        let mut entries = entries;
        if entries.contains_key(DEFAULT_POLICY_INDEX) {
            debug!("Overriding user-supplied default policy with the built-in template");
        }
        entries.insert(
            DEFAULT_POLICY_INDEX.to_string(),
            PolicyEntry::builtin_default(),
        );
        Self { entries }
    }

    /// Store holding only the built-in default entry
    pub fn default_only() -> Self {
        Self::from_entries(HashMap::new())
    }

    pub fn get(&self, index: &str) -> Option<&PolicyEntry> {
        self.entries.get(index)
    }

    pub fn contains(&self, index: &str) -> bool {
        self.entries.contains_key(index)
    }

    /// The built-in default template
    pub fn default_entry(&self) -> &PolicyEntry {
        // from_entries always inserts it
        &self.entries[DEFAULT_POLICY_INDEX]
    }

    /// All indices, sorted
    pub fn indices(&self) -> Vec<&str> {
        let mut indices: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        indices.sort_unstable();
        indices
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PolicyStore {
    fn default() -> Self {
        Self::default_only()
    }
}
