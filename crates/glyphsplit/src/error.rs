//! Error types for the split engine.

use glyphsplit_core::{DocumentError, NodeId};

/// Result type alias for split operations.
pub type Result<T> = std::result::Result<T, SplitError>;

/// Errors that can occur when splitting text.
///
/// Only an unusable container is fatal at split time. Everything else the
/// engine can recover from is logged as a warning instead.
#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    /// The container does not exist or is not an element.
    #[error("invalid split container {node:?}: {reason}")]
    InvalidContainer {
        node: NodeId,
        reason: &'static str,
    },

    /// The document rejected a tree operation.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// A settings file could not be parsed.
    #[error("invalid split configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl SplitError {
    /// Create an invalid container error.
    pub fn invalid_container(node: NodeId, reason: &'static str) -> Self {
        Self::InvalidContainer { node, reason }
    }
}
