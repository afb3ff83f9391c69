//! Reconstruction of a discussion tree from a pre-order depth list
//!
//! Discussion pages often render nesting as indentation on a flat list of
//! comments. Given the comments in display order together with their depth,
//! the nesting is recovered in one forward pass: the parent of each
//! item is the nearest preceding item with a strictly smaller depth.

use derive_more::Display;
use log::{debug, trace};

use crate::tree::{Depth, Node, NodeId, ThreadTree};

/// Rejected input sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum BuildError {
    /// A real item reported a depth below zero
    #[display(fmt = "item {} has negative depth {}", index, depth)]
    NegativeDepth { index: usize, depth: Depth },
}

impl std::error::Error for BuildError {}

/// Incremental stack-based tree builder
///
/// Items must be pushed in pre-order (the order a reader sees them).
/// Subtree counts are kept exact while pushing, so no second pass is
/// needed once the last item is in.
#[derive(Debug)]
pub struct TreeBuilder<T> {
    tree: ThreadTree<T>,
    /// Chain of potential parents, root at the bottom
    stack: Vec<NodeId>,
}

impl<T> Default for TreeBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TreeBuilder<T> {
    /// Start a new tree containing only the synthetic root
    pub fn new() -> Self {
        Self {
            tree: ThreadTree::new(),
            stack: vec![NodeId::ROOT],
        }
    }

    fn depth_of(&self, id: NodeId) -> Depth {
        self.tree.node(id).map(|n| n.depth).unwrap_or(crate::tree::ROOT_DEPTH)
    }

    /// Append the next item of the sequence and return its ID
    pub fn push(&mut self, depth: Depth, item: T) -> NodeId {
        // Unwind until the stack top can be the parent. The root's depth
        // sits below every valid depth, so it is never popped.
        while self.stack.len() > 1 {
            let top = self.stack[self.stack.len() - 1];
            if self.depth_of(top) < depth {
                break;
            }
            self.stack.pop();
        }
        let parent = self.stack[self.stack.len() - 1];

        let id = self.tree.push(Node::new(depth, item, parent));
        if let Some(parent_node) = self.tree.node_mut(parent) {
            parent_node.children.push(id);
        }

        for &ancestor in &self.stack {
            if let Some(node) = self.tree.node_mut(ancestor) {
                node.descendant_count += 1;
            }
        }

        if depth > self.depth_of(parent) {
            self.stack.push(id);
        }

        trace!("placed {} at depth {} under {}", id, depth, parent);
        id
    }

    /// Finish building and hand out the tree
    pub fn finish(self) -> ThreadTree<T> {
        debug!(
            "built thread tree: {} nodes, {} top-level threads",
            self.tree.len(),
            self.tree.top_level().len()
        );
        self.tree
    }
}

/// Build a tree from an ordered `(depth, item)` sequence
///
/// Total over any input. Depths are not validated; a negative depth
/// breaks the parent relation, so use [`try_build`] for untrusted input.
pub fn build<T, I>(sequence: I) -> ThreadTree<T>
where
    I: IntoIterator<Item = (Depth, T)>,
{
    let mut builder = TreeBuilder::new();
    for (depth, item) in sequence {
        builder.push(depth, item);
    }
    builder.finish()
}

/// Check that every depth is a valid real depth (non-negative)
pub fn validate_depths(depths: &[Depth]) -> Result<(), BuildError> {
    match depths.iter().position(|&depth| depth < 0) {
        Some(index) => Err(BuildError::NegativeDepth {
            index,
            depth: depths[index],
        }),
        None => Ok(()),
    }
}

/// Validate the sequence, then build it
///
/// Nothing is built when any depth is rejected.
pub fn try_build<T, I>(sequence: I) -> Result<ThreadTree<T>, BuildError>
where
    I: IntoIterator<Item = (Depth, T)>,
{
    let sequence: Vec<(Depth, T)> = sequence.into_iter().collect();
    let depths: Vec<Depth> = sequence.iter().map(|(depth, _)| *depth).collect();
    validate_depths(&depths)?;
    Ok(build(sequence))
}
