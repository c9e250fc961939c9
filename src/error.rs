//! Error types
//!
//! Forbidden draw positions are not errors; they are boolean policy results
//! from [`crate::sim::Constraints`].

use thiserror::Error;

/// Failure to turn a drawn path into a barrier body
#[derive(Debug, Error, PartialEq)]
pub enum BuildError {
    /// Fewer than two distinct points; the commit gate should have filtered this
    #[error("barrier path needs at least 2 distinct points, got {points}")]
    InsufficientPath { points: usize },
}

/// Failure to load or validate tuning/level data
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Read a whole JSON file into a string
pub(crate) fn read_json(path: &std::path::Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })
}
