use heritage_store::StoreError;
use heritage_types::TypeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GovernanceError {
    /// Malformed input: bad vote type, blank field, out-of-range coordinates.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0} not found")]
    NotFound(String),

    /// Concurrent writers kept colliding and the retry budget ran out.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("entropy source failed: {0}")]
    EntropyUnavailable(String),
}

impl From<TypeError> for GovernanceError {
    fn from(e: TypeError) -> Self {
        GovernanceError::InvalidArgument(e.to_string())
    }
}

impl From<StoreError> for GovernanceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(what) => GovernanceError::NotFound(what),
            StoreError::Conflict(msg) | StoreError::Duplicate(msg) => {
                GovernanceError::Conflict(msg)
            }
            other => GovernanceError::StorageUnavailable(other.to_string()),
        }
    }
}
