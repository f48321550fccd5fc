//! Error types for tola-reconcile.
//!
//! Diffing itself never fails: every input shape has a defined patch outcome.
//! Errors only come from encoding patch lists and from host primitives.

use thiserror::Error;

use crate::id::NodeId;

/// Errors from encoding or decoding patch lists.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Encoded data was produced by an incompatible schema version
    #[error("patch schema version mismatch: expected v{expected}, found v{found}")]
    VersionMismatch {
        /// Expected schema version
        expected: u32,
        /// Found schema version
        found: u32,
    },

    /// Magic bytes validation failed
    #[error("invalid patch encoding: expected magic bytes {expected:?}, found {found:?}")]
    InvalidMagic {
        /// Expected magic bytes
        expected: [u8; 4],
        /// Found magic bytes
        found: [u8; 4],
    },

    /// Encoded data is structurally invalid
    #[error("patch data corrupted: {0}")]
    Corrupted(String),

    /// Serialization/deserialization failed
    #[error("serialization error: {0}")]
    Serialize(String),
}

/// Result type alias for encoding operations.
pub type ReconcileResult<T> = Result<T, ReconcileError>;

impl ReconcileError {
    /// Create a corruption error with a message.
    pub fn corrupted(msg: impl Into<String>) -> Self {
        Self::Corrupted(msg.into())
    }

    /// Create a serialization error from any error type.
    pub fn serialize(err: impl std::error::Error) -> Self {
        Self::Serialize(err.to_string())
    }
}

#[cfg(feature = "serialize")]
impl From<rkyv::rancor::Error> for ReconcileError {
    fn from(err: rkyv::rancor::Error) -> Self {
        Self::Serialize(err.to_string())
    }
}

/// Errors raised by the [`LiveTree`](crate::tree::LiveTree) mutation primitives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// Handle does not resolve to a live node
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    /// Operation needs an element but found a text node
    #[error("node {0} is not an element")]
    NotAnElement(NodeId),

    /// `child` is not currently a child of `parent`
    #[error("node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },

    /// Insert position past the end of the child list
    #[error("index {index} out of bounds for {parent} with {len} children")]
    IndexOutOfBounds {
        parent: NodeId,
        index: usize,
        len: usize,
    },

    /// Inserting `child` under `parent` would make a node its own ancestor
    #[error("inserting {child} under {parent} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },

    /// Node must be detached for this operation
    #[error("node {0} is still attached")]
    AlreadyAttached(NodeId),
}
