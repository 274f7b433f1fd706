use std::io;
use std::path::PathBuf;

use fleet_store::StoreError;
use fleet_types::TypeError;

/// Errors produced by the shop subsystem.
#[derive(Debug, thiserror::Error)]
pub enum ShopError {
    /// A shared store operation failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// I/O error while reading or writing shop files.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// A name or value failed validation.
    #[error("{0}")]
    Type(#[from] TypeError),

    /// Encoding the shop state failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The snapshot exists but cannot be decoded. The file is left in place
    /// for the operator.
    #[error("corrupt snapshot {}: {reason}", .path.display())]
    CorruptSnapshot { path: PathBuf, reason: String },

    /// No snapshot exists for the requested location.
    #[error("snapshot not found: {}", .0.display())]
    SnapshotNotFound(PathBuf),
}

/// Convenience alias used throughout the shop crate.
pub type ShopResult<T> = std::result::Result<T, ShopError>;
