//! Error types for the in-memory document.
//!
//! The reconciler itself has no error taxonomy: it propagates whatever its
//! [`Host`](crate::Host) returns. These are the errors [`MemoryDocument`]
//! raises, mirroring the exceptions a browser DOM would throw.
//!
//! [`MemoryDocument`]: crate::dom::MemoryDocument

use thiserror::Error;

use crate::dom::NodeId;

/// Errors raised by [`MemoryDocument`](crate::dom::MemoryDocument) mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// Tag name is not a valid element name
    #[error("invalid tag name: {0:?}")]
    InvalidTag(String),

    /// Attribute name is not a valid attribute name
    #[error("invalid attribute name: {0:?}")]
    InvalidAttributeName(String),

    /// Handle refers to a node that has been released
    #[error("stale node handle: {0}")]
    StaleNode(NodeId),

    /// Node is not a child of the given parent
    #[error("node {child} is not a child of {parent}")]
    NotAChild {
        /// Expected parent
        parent: NodeId,
        /// Node that was looked up
        child: NodeId,
    },

    /// Insertion would produce an invalid tree
    #[error("cannot insert {node} into {parent}")]
    HierarchyRequest {
        /// Intended parent
        parent: NodeId,
        /// Node being inserted
        node: NodeId,
    },

    /// Operation requires an element
    #[error("node {0} is not an element")]
    NotAnElement(NodeId),

    /// Operation requires a text node
    #[error("node {0} is not a text node")]
    NotAText(NodeId),

    /// Operation requires an `input` or `textarea`
    #[error("node {0} is not a text control")]
    NotATextControl(NodeId),
}

/// Result type alias for in-memory document operations.
pub type DomResult<T> = Result<T, DomError>;
