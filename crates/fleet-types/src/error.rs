use thiserror::Error;

/// Errors produced by type parsing and validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid plate {plate:?}: {reason}")]
    InvalidPlate { plate: String, reason: String },

    #[error("unknown vehicle type: {0}")]
    UnknownVehicleType(String),

    #[error("invalid odometer reading: {0}")]
    InvalidOdometer(String),

    #[error("invalid {kind} name {name:?}: {reason}")]
    InvalidName {
        kind: &'static str,
        name: String,
        reason: String,
    },

    #[error("malformed record {line:?}: {reason}")]
    MalformedRecord { line: String, reason: String },
}
