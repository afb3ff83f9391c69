//! Core tree traits and the pre-order traversal engine

use crate::tree::{Node, NodeId};

/// A rooted n-ary tree stored as an arena of nodes
///
/// Implementations provide the basic navigation primitives, while derived
/// methods provide convenient higher-level queries.
///
/// # Type Parameters
///
/// * `Item` - Opaque handle stored at each real node
///
/// # Example
///
/// ```ignore
/// fn print_tree<T: Tree>(tree: &T) where T::Item: std::fmt::Display {
///     for id in tree.walk() {
///         let node = tree.get(id).unwrap();
///         println!("{:indent$}{}", "", node, indent = tree.level(id) * 2);
///     }
/// }
/// ```
pub trait Tree {
    /// Opaque item handle stored at each node
    type Item;

    /// Get the root node ID (always exists)
    fn root(&self) -> NodeId;

    /// Get a node by its ID
    ///
    /// Returns `None` if the ID is invalid.
    fn get(&self, id: NodeId) -> Option<&Node<Self::Item>>;

    /// Get the parent of a node
    ///
    /// Returns `None` for the root node.
    fn parent(&self, id: NodeId) -> Option<NodeId>;

    /// Iterate over children of a node in sibling order
    ///
    /// Returns an empty iterator for leaf nodes or invalid IDs.
    fn children(&self, id: NodeId) -> Box<dyn Iterator<Item = NodeId> + '_>;

    /// Count total nodes in the tree, root included
    fn node_count(&self) -> usize;

    /// Count direct children of a node
    fn child_count(&self, id: NodeId) -> usize {
        self.children(id).count()
    }

    /// Structural level of a node (root = 0, top-level comments = 1)
    ///
    /// This is derived from the parent chain and is independent of the
    /// depth value reported by the source sequence.
    fn level(&self, id: NodeId) -> usize {
        let mut level = 0;
        let mut current = self.parent(id);
        while let Some(parent_id) = current {
            level += 1;
            current = self.parent(parent_id);
        }
        level
    }

    /// The direct child of the root whose subtree contains `id`
    ///
    /// Returns `None` for the root itself or invalid IDs.
    fn top_level_of(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        loop {
            let parent = self.parent(current)?;
            if parent == self.root() {
                return Some(current);
            }
            current = parent;
        }
    }
}

/// Extension trait providing pre-order traversal and search
///
/// This trait is automatically implemented for all types that implement `Tree`.
/// Every walk is depth-first, left to right, parent before children, and
/// visits each node at most once.
pub trait TreeTraversal: Tree {
    /// Walk the whole tree from the root, root included
    fn walk(&self) -> TreeWalker<'_, Self>
    where
        Self: Sized,
    {
        TreeWalker::new(self, self.root())
    }

    /// Walk the subtree rooted at `start`, `start` included
    fn walk_from(&self, start: NodeId) -> TreeWalker<'_, Self>
    where
        Self: Sized,
    {
        TreeWalker::new(self, start)
    }

    /// Walk the strict descendants of `start`
    fn descendants(&self, start: NodeId) -> std::iter::Skip<TreeWalker<'_, Self>>
    where
        Self: Sized,
    {
        self.walk_from(start).skip(1)
    }

    /// Test `start` and then its descendants, returning the first match
    ///
    /// Stops as soon as `predicate` returns true; nothing after the match
    /// is visited.
    fn visit<F>(&self, start: NodeId, mut predicate: F) -> Option<NodeId>
    where
        F: FnMut(NodeId, &Node<Self::Item>) -> bool,
        Self: Sized,
    {
        self.walk_from(start)
            .find(|&id| self.get(id).is_some_and(|node| predicate(id, node)))
    }

    /// Like [`TreeTraversal::visit`] but never tests `start` itself
    fn visit_children<F>(&self, start: NodeId, mut predicate: F) -> Option<NodeId>
    where
        F: FnMut(NodeId, &Node<Self::Item>) -> bool,
        Self: Sized,
    {
        self.descendants(start)
            .find(|&id| self.get(id).is_some_and(|node| predicate(id, node)))
    }

    /// Fallible [`TreeTraversal::visit`]
    ///
    /// The first error returned by `predicate` aborts the walk and is
    /// handed back unchanged.
    fn try_visit<F, E>(&self, start: NodeId, predicate: F) -> Result<Option<NodeId>, E>
    where
        F: FnMut(NodeId, &Node<Self::Item>) -> Result<bool, E>,
        Self: Sized,
    {
        try_find(self, self.walk_from(start), predicate)
    }

    /// Fallible [`TreeTraversal::visit_children`]
    fn try_visit_children<F, E>(&self, start: NodeId, predicate: F) -> Result<Option<NodeId>, E>
    where
        F: FnMut(NodeId, &Node<Self::Item>) -> Result<bool, E>,
        Self: Sized,
    {
        try_find(self, self.descendants(start), predicate)
    }
}

// Blanket implementation for all Tree types
impl<T: Tree> TreeTraversal for T {}

fn try_find<T, I, F, E>(tree: &T, ids: I, mut predicate: F) -> Result<Option<NodeId>, E>
where
    T: Tree,
    I: Iterator<Item = NodeId>,
    F: FnMut(NodeId, &Node<T::Item>) -> Result<bool, E>,
{
    for id in ids {
        if let Some(node) = tree.get(id) {
            if predicate(id, node)? {
                return Ok(Some(id));
            }
        }
    }
    Ok(None)
}

/// Lazy pre-order iterator over a subtree
pub struct TreeWalker<'a, T: Tree + ?Sized> {
    tree: &'a T,
    stack: Vec<NodeId>,
}

impl<'a, T: Tree + ?Sized> TreeWalker<'a, T> {
    /// Create a new tree walker starting from the given node
    pub fn new(tree: &'a T, start: NodeId) -> Self {
        let stack = if tree.get(start).is_some() {
            vec![start]
        } else {
            Vec::new()
        };
        Self { tree, stack }
    }
}

impl<'a, T: Tree + ?Sized> Iterator for TreeWalker<'a, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;

        // Add children in reverse order so they're popped in correct order
        let children: Vec<_> = self.tree.children(current).collect();
        for child in children.into_iter().rev() {
            self.stack.push(child);
        }

        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimal hand-wired tree, independent of the builder
    struct TestTree {
        nodes: Vec<Node<&'static str>>,
    }

    impl TestTree {
        fn new() -> Self {
            Self {
                nodes: vec![Node::root()],
            }
        }

        fn add_child(&mut self, parent: NodeId, name: &'static str) -> NodeId {
            let id = NodeId::new(self.nodes.len());
            let depth = self.nodes[parent.get()].depth + 1;
            self.nodes.push(Node::new(depth, name, parent));
            self.nodes[parent.get()].children.push(id);
            id
        }
    }

    impl Tree for TestTree {
        type Item = &'static str;

        fn root(&self) -> NodeId {
            NodeId::ROOT
        }

        fn get(&self, id: NodeId) -> Option<&Node<&'static str>> {
            self.nodes.get(id.get())
        }

        fn parent(&self, id: NodeId) -> Option<NodeId> {
            self.get(id).and_then(|n| n.parent)
        }

        fn children(&self, id: NodeId) -> Box<dyn Iterator<Item = NodeId> + '_> {
            Box::new(
                self.get(id)
                    .map(|n| n.children.iter().copied())
                    .into_iter()
                    .flatten(),
            )
        }

        fn node_count(&self) -> usize {
            self.nodes.len()
        }
    }

    fn sample() -> (TestTree, [NodeId; 4]) {
        let mut tree = TestTree::new();
        let a = tree.add_child(NodeId::ROOT, "a");
        let b = tree.add_child(a, "b");
        let c = tree.add_child(b, "c");
        let d = tree.add_child(NodeId::ROOT, "d");
        (tree, [a, b, c, d])
    }

    #[test]
    fn test_basic_tree_operations() {
        let (tree, [a, b, _, d]) = sample();
        assert_eq!(tree.node_count(), 5);
        assert_eq!(tree.child_count(NodeId::ROOT), 2);
        assert_eq!(tree.child_count(a), 1);
        assert_eq!(tree.child_count(d), 0);
        assert_eq!(tree.parent(b), Some(a));
        assert_eq!(tree.parent(NodeId::ROOT), None);
    }

    #[test]
    fn test_tree_level() {
        let (tree, [a, b, c, _]) = sample();
        assert_eq!(tree.level(NodeId::ROOT), 0);
        assert_eq!(tree.level(a), 1);
        assert_eq!(tree.level(b), 2);
        assert_eq!(tree.level(c), 3);
    }

    #[test]
    fn test_top_level_of() {
        let (tree, [a, _, c, d]) = sample();
        assert_eq!(tree.top_level_of(c), Some(a));
        assert_eq!(tree.top_level_of(d), Some(d));
        assert_eq!(tree.top_level_of(NodeId::ROOT), None);
    }

    #[test]
    fn test_tree_traversal_preorder() {
        let (tree, [a, b, c, d]) = sample();
        let nodes: Vec<_> = tree.walk().collect();
        assert_eq!(nodes, vec![NodeId::ROOT, a, b, c, d]);

        let below_a: Vec<_> = tree.descendants(a).collect();
        assert_eq!(below_a, vec![b, c]);
    }

    #[test]
    fn test_walk_from_invalid_id_is_empty() {
        let (tree, _) = sample();
        assert_eq!(tree.walk_from(NodeId(99)).count(), 0);
    }

    #[test]
    fn test_visit_short_circuits() {
        let (tree, [a, b, _, _]) = sample();
        let mut seen = Vec::new();
        let found = tree.visit_children(NodeId::ROOT, |id, _| {
            seen.push(id);
            id == b
        });
        assert_eq!(found, Some(b));
        assert_eq!(seen, vec![a, b]);
    }

    #[test]
    fn test_visit_tests_self_first() {
        let (tree, [a, _, _, _]) = sample();
        assert_eq!(tree.visit(a, |_, _| true), Some(a));
        assert_eq!(tree.visit_children(a, |id, _| id == a), None);
    }

    #[test]
    fn test_try_visit_propagates_error() {
        let (tree, [_, b, c, _]) = sample();
        let mut seen = Vec::new();
        let result: Result<Option<NodeId>, String> = tree.try_visit(NodeId::ROOT, |id, node| {
            seen.push(id);
            if node.item() == Some(&"b") {
                Err("boom".to_string())
            } else {
                Ok(false)
            }
        });
        assert_eq!(result, Err("boom".to_string()));
        assert!(seen.contains(&b));
        assert!(!seen.contains(&c));
    }
}
