//! Arena-backed discussion tree

use std::fmt::{self, Write as _};

use crate::tree::{Node, NodeId, Tree, TreeTraversal};

/// A discussion tree produced by [`crate::tree::build`]
///
/// Nodes live in a flat arena in source order: index 0 is the synthetic
/// root and index `i + 1` holds the `i`-th item of the input sequence.
/// Parent and child links are stored as indices, so the shape can be
/// walked and the open/closed state mutated without reference cycles.
#[derive(Debug, Clone)]
pub struct ThreadTree<T> {
    nodes: Vec<Node<T>>,
}

impl<T> Default for ThreadTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ThreadTree<T> {
    /// Create a tree holding only the synthetic root
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::root()],
        }
    }

    pub(crate) fn push(&mut self, node: Node<T>) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Number of real nodes (root excluded)
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    /// True when the source sequence was empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Direct children of the root, i.e. the top-level threads
    pub fn top_level(&self) -> &[NodeId] {
        &self.nodes[NodeId::ROOT.get()].children
    }

    /// Get a node by ID
    pub fn node(&self, id: NodeId) -> Option<&Node<T>> {
        self.nodes.get(id.get())
    }

    /// Get a mutable node by ID
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<T>> {
        self.nodes.get_mut(id.get())
    }

    /// The item handle stored at `id`
    pub fn item(&self, id: NodeId) -> Option<&T> {
        self.node(id).and_then(Node::item)
    }

    /// Real items with their IDs, in source (pre-order) order
    pub fn items(&self) -> impl Iterator<Item = (NodeId, &T)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| node.item().map(|item| (NodeId::new(index), item)))
    }

    /// Pre-order walk over the strict descendants of `start` with mutable access
    ///
    /// The predicate may change node state (e.g. `is_open`) but cannot
    /// reshape the tree. Returns the first node for which it returns true.
    pub fn visit_children_mut<F>(&mut self, start: NodeId, mut predicate: F) -> Option<NodeId>
    where
        F: FnMut(NodeId, &mut Node<T>) -> bool,
    {
        let result: Result<_, std::convert::Infallible> =
            self.try_visit_children_mut(start, |id, node| Ok(predicate(id, node)));
        match result {
            Ok(found) => found,
            Err(never) => match never {},
        }
    }

    /// Fallible [`ThreadTree::visit_children_mut`]; the first error aborts the walk
    pub fn try_visit_children_mut<F, E>(
        &mut self,
        start: NodeId,
        mut predicate: F,
    ) -> Result<Option<NodeId>, E>
    where
        F: FnMut(NodeId, &mut Node<T>) -> Result<bool, E>,
    {
        let mut stack: Vec<NodeId> = match self.node(start) {
            Some(node) => node.children.iter().rev().copied().collect(),
            None => return Ok(None),
        };

        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get_mut(id.get()) else {
                continue;
            };
            if predicate(id, node)? {
                return Ok(Some(id));
            }
            stack.extend(node.children.iter().rev().copied());
        }
        Ok(None)
    }

    /// Render the tree as indented text, one real node per line
    ///
    /// Closed nodes are marked with `+`, open nodes that have children
    /// with `-`, and leaves with a blank. The subtree size follows in
    /// brackets for nodes with children.
    pub fn outline(&self) -> String
    where
        T: fmt::Display,
    {
        let mut out = String::new();
        for id in self.descendants(NodeId::ROOT) {
            let Some(node) = self.node(id) else { continue };
            let Some(item) = node.item() else { continue };
            let marker = match (node.has_children(), node.is_open) {
                (false, _) => ' ',
                (true, true) => '-',
                (true, false) => '+',
            };
            let indent = (self.level(id) - 1) * 2;
            let _ = write!(out, "{:indent$}{} {}", "", marker, item, indent = indent);
            if node.has_children() {
                let _ = write!(out, " [{}]", node.descendant_count);
            }
            out.push('\n');
        }
        out
    }
}

impl<T> Tree for ThreadTree<T> {
    type Item = T;

    fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    fn get(&self, id: NodeId) -> Option<&Node<T>> {
        self.node(id)
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    fn children(&self, id: NodeId) -> Box<dyn Iterator<Item = NodeId> + '_> {
        Box::new(
            self.node(id)
                .map(|n| n.children.iter().copied())
                .into_iter()
                .flatten(),
        )
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn child_count(&self, id: NodeId) -> usize {
        self.node(id).map(|n| n.children.len()).unwrap_or(0)
    }
}
