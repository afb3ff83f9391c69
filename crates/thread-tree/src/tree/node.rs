//! Core node types for the thread tree

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Nesting level of an item as reported by the source sequence
pub type Depth = i32;

/// Depth of the synthetic root; every real item must be deeper than this
pub const ROOT_DEPTH: Depth = -1;

/// Unique identifier for a node within a tree
///
/// Internally represented as an index into an arena-based storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeId(pub usize);

impl NodeId {
    /// The synthetic root always has ID 0
    pub const ROOT: NodeId = NodeId(0);

    /// Create a new NodeId from a usize
    pub const fn new(id: usize) -> Self {
        NodeId(id)
    }

    /// Get the inner usize value
    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl From<usize> for NodeId {
    fn from(id: usize) -> Self {
        NodeId(id)
    }
}

impl From<NodeId> for usize {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

/// A single comment or post in the discussion
///
/// Generic over the item type `T`, an opaque handle to whatever the
/// presentation layer uses to represent the comment. The tree never
/// inspects it.
#[derive(Debug, Clone)]
pub struct Node<T> {
    /// Nesting level reported by the source sequence
    pub depth: Depth,
    /// Handle to the external representation; `None` only for the root
    pub item: Option<T>,
    /// Whether the subtree rooted here is expanded
    pub is_open: bool,
    /// Parent node, `None` for the root
    pub parent: Option<NodeId>,
    /// Direct children in encounter order
    pub children: Vec<NodeId>,
    /// Number of nodes in this subtree, excluding the node itself
    pub descendant_count: usize,
}

impl<T> Node<T> {
    /// Create a new open node with no children
    pub fn new(depth: Depth, item: T, parent: NodeId) -> Self {
        Self {
            depth,
            item: Some(item),
            is_open: true,
            parent: Some(parent),
            children: Vec::new(),
            descendant_count: 0,
        }
    }

    /// Create the synthetic root
    pub fn root() -> Self {
        Self {
            depth: ROOT_DEPTH,
            item: None,
            is_open: true,
            parent: None,
            children: Vec::new(),
            descendant_count: 0,
        }
    }

    /// Returns true for the synthetic root
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Returns true if at least one node hangs below this one
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Whether the presentation layer should offer a toggle for this node
    ///
    /// Leaves and the root never get one.
    pub fn is_togglable(&self) -> bool {
        !self.is_root() && self.descendant_count > 0
    }

    /// The item handle, if this is a real node
    pub fn item(&self) -> Option<&T> {
        self.item.as_ref()
    }
}

impl<T: fmt::Display> fmt::Display for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.item {
            Some(item) => write!(f, "{} (depth {}, {} below)", item, self.depth, self.descendant_count),
            None => write!(f, "<root> ({} below)", self.descendant_count),
        }
    }
}
