//! Error types for glyphsplit core.

use thiserror::Error;

/// Errors raised by node tree operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// The node ID is invalid or the node has been removed.
    #[error("invalid or removed node ID")]
    InvalidNodeId,
    /// The operation requires an element but the node is a text node.
    #[error("node is not an element")]
    NotAnElement,
    /// The operation requires a text node but the node is an element.
    #[error("node is not a text node")]
    NotAText,
    /// Attempted to insert a node into its own subtree.
    #[error("cannot insert a node into itself or one of its descendants")]
    CircularParentage,
}

/// Timer-specific errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// The timer ID is invalid or the timer has already fired or been stopped.
    #[error("invalid or expired timer ID")]
    InvalidTimerId,
}

/// Result type for node tree operations.
pub type DocumentResult<T> = std::result::Result<T, DocumentError>;

/// Result type for timer operations.
pub type TimerResult<T> = std::result::Result<T, TimerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(DocumentError::InvalidNodeId.to_string(), "invalid or removed node ID");
        assert!(DocumentError::CircularParentage.to_string().contains("descendants"));
        assert!(TimerError::InvalidTimerId.to_string().contains("timer"));
    }
}
