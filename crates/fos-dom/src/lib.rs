//! fOS DOM - Document Object Model
//!
//! Arena-based DOM tree used as the host of an editable root. Node ids are
//! never reused: removed nodes stay in the arena, detached, so late mutation
//! records can still refer to them.

mod node;
mod tree;
mod document;
mod observer;
mod range;
mod geometry;
mod listeners;

pub use node::{Node, NodeData, ElementData, TextData, Attribute};
pub use tree::{DomTree, Children};
pub use document::Document;
pub use observer::{MutationObserver, MutationObserverInit, MutationRecord, MutationType};
pub use range::{BoundaryPoint, Selection};
pub use geometry::{DOMRect, LayoutMap};
pub use listeners::{EventListenerRegistry, ListenerId};

use serde::{Deserialize, Serialize};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this id refers to a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("Node not found: {0:?}")]
    NotFound(NodeId),

    #[error("Hierarchy request error: cannot insert {child:?} into {parent:?}")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    #[error("Node {child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },

    #[error("Invalid node type for operation on {0:?}")]
    InvalidNodeType(NodeId),

    #[error("Offset {offset} out of bounds for node {node:?} (length {length})")]
    IndexSize { node: NodeId, offset: usize, length: usize },
}
