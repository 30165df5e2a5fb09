use crate::resolver::EnforcementError;
use crate::store::StoreError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PolicyError>;

/// Errors surfaced by policy resolution
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("No policy found for index: {0}")]
    IndexNotFound(String),

    #[error("Enforcement failed: {0}")]
    EnforcementFailed(#[from] EnforcementError),

    #[error("Resolution cancelled")]
    Cancelled,

    #[error(transparent)]
    Store(#[from] StoreError),
}
