//! Error types for faultline's own operations.
//!
//! These cover configuration and construction problems inside the library.
//! Failures *classified* by the library are [`Fault`](crate::Fault)s, not
//! these.

use thiserror::Error;

/// Errors raised by faultline itself.
#[derive(Debug, Error)]
pub enum FaultlineError {
    /// Configuration rejected by validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A custom carrier kind has no registered factory.
    #[error("no carrier factory registered for '{0}'")]
    UnregisteredCarrier(String),

    /// A carrier factory failed or broke the construction contract.
    #[error("carrier '{carrier}' violated its construction contract: {reason}")]
    CarrierContract { carrier: String, reason: String },

    /// A context record did not serialize to a set of named fields.
    #[error("context record must serialize to an object, got {0}")]
    InvalidRecord(String),

    /// JSON (de)serialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for faultline operations.
pub type FaultlineResult<T> = Result<T, FaultlineError>;
