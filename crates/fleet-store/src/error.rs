use std::path::PathBuf;

use fleet_types::TypeError;

/// Errors from shared store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error while reading or writing a shared file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The advisory lock on a shared file could not be acquired.
    #[error("failed to lock {}: {source}", .path.display())]
    Lock {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A name, plate, or record failed validation.
    #[error("{0}")]
    Type(#[from] TypeError),

    /// An in-memory store's mutex was poisoned by a panicking writer.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
