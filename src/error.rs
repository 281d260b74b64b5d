//! Error types for the trackle change tracking library.

use thiserror::Error;

/// Configuration-time errors.
///
/// Tracking configuration is validated in full before any wrap call, so
/// these never surface during graph mutation. Wrapping itself is
/// infallible: unsupported value shapes degrade to scalar tracking, and
/// tracking-state queries on unwrapped values simply report untracked.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown type in tracking configuration: {0}")]
    UnknownType(String),

    #[error("Unknown property {property:?} on type {type_name:?}")]
    UnknownProperty { type_name: String, property: String },

    #[error("Failed to parse tracking configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Configuration I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}
