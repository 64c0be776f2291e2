//! Error types for configuration, indexing and output.
//!
//! The steering math never fails; errors only come from the edges of the
//! system (files, serialization, index setup).

use thiserror::Error;

/// Errors raised while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Errors emitted by neighbor index construction.
#[derive(Debug, Error, PartialEq)]
pub enum IndexError {
    #[error("invalid cell size {0}: must be positive and finite")]
    InvalidCellSize(f32),
}

/// Errors raised while writing snapshots.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write snapshot: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// Top-level error for a simulation run.
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Index(#[from] IndexError),
    #[error(transparent)]
    Output(#[from] OutputError),
}
