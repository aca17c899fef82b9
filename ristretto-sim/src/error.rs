//! Simulator errors

use std::path::PathBuf;

use thiserror::Error;

/// Simulator errors
#[derive(Debug, Error)]
pub enum SimError {
    /// Reading a file failed
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML or has unknown keys
    #[error("invalid configuration in {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Writing telemetry output failed
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),

    /// Serializing a telemetry record failed
    #[error("failed to encode telemetry: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result alias for simulator operations
pub type Result<T> = std::result::Result<T, SimError>;
