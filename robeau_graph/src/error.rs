//! Errors raised by the script and the graph store.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("failed to read dialogue script: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid TOML dialogue script: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON dialogue script: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported dialogue script format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("unknown node label: {0}")]
    UnknownLabel(String),

    #[error("edge {edge} references undeclared node \"{node}\"")]
    UndeclaredNode { edge: String, node: String },

    /// The backing store could not answer a query. Fatal for a session.
    #[error("graph store unavailable: {0}")]
    Unavailable(String),
}
