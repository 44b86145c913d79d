//! Store error types.

use thiserror::Error;

/// Errors that can occur when talking to a backing store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store could not be reached or is otherwise unusable.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Failed to serialize or deserialize a stored value.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Expected record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A conditional write lost to an existing record.
    #[error("Conflict: {0}")]
    Conflict(String),
}
