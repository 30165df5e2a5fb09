use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why a policy file could not be used. Both cases degrade to the default store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Policy file unavailable: {path}: {source}")]
    FileUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Policy file malformed: {path}: {source}")]
    FileMalformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub fn path(&self) -> &PathBuf {
        match self {
            StoreError::FileUnavailable { path, .. } | StoreError::FileMalformed { path, .. } => {
                path
            }
        }
    }
}
