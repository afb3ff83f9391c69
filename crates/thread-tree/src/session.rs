//! Interactive state layered on top of a thread tree
//!
//! A [`Session`] owns exactly one tree and the display hook that mirrors
//! it. Every operation runs to completion before returning; the host is
//! expected to deliver user events one at a time.

use anyhow::Result;
use derive_more::Display;
use log::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::display::{toggle_label, Highlight, ThreadDisplay};
use crate::tree::{NodeId, ThreadTree, TreeTraversal};

/// Faults raised by session operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SessionError {
    /// No display hook is attached, so state changes cannot be mirrored
    #[display(fmt = "no display is attached to the session")]
    DisplayDetached,

    /// The ID does not belong to this session's tree
    #[display(fmt = "unknown node {}", _0)]
    UnknownNode(NodeId),

    /// The synthetic root has no visual element to select
    #[display(fmt = "the thread root cannot be selected")]
    RootNotSelectable,
}

impl std::error::Error for SessionError {}

/// How the tree looks right after [`Session::activate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum InitialView {
    /// Every top-level thread collapsed individually
    #[default]
    #[display(fmt = "collapsed")]
    Collapsed,

    /// Everything open
    #[display(fmt = "expanded")]
    Expanded,
}

/// A discrete user action delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SessionEvent {
    /// Select a node
    Click(NodeId),
    /// Select a node and toggle its subtree
    DoubleClick(NodeId),
    /// Open every node
    ExpandAll,
    /// Collapse each top-level thread
    CollapseAll,
}

/// One discussion page: its tree, its display and the current selection
pub struct Session<T, D> {
    tree: ThreadTree<T>,
    display: Option<D>,
    selected: Option<NodeId>,
}

impl<T, D> Session<T, D> {
    /// Create a session with no display attached
    ///
    /// State-changing operations fail with [`SessionError::DisplayDetached`]
    /// until [`Session::attach_display`] is called.
    pub fn new(tree: ThreadTree<T>) -> Self {
        Self {
            tree,
            display: None,
            selected: None,
        }
    }

    pub fn with_display(tree: ThreadTree<T>, display: D) -> Self {
        Self {
            tree,
            display: Some(display),
            selected: None,
        }
    }

    /// Attach a display, returning the previous one if any
    pub fn attach_display(&mut self, display: D) -> Option<D> {
        self.display.replace(display)
    }

    pub fn display(&self) -> Option<&D> {
        self.display.as_ref()
    }

    pub fn tree(&self) -> &ThreadTree<T> {
        &self.tree
    }

    /// The most recently selected node
    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn is_open(&self, id: NodeId) -> Option<bool> {
        self.tree.node(id).map(|n| n.is_open)
    }
}

impl<T, D: ThreadDisplay<T>> Session<T, D> {
    /// Publish the initial toggle label of every node that has children
    ///
    /// Returns the nodes that received a toggle, in pre-order.
    pub fn init_toggles(&mut self) -> Result<Vec<NodeId>> {
        let Self { tree, display, .. } = self;
        let display = display.as_mut().ok_or(SessionError::DisplayDetached)?;

        let mut togglable = Vec::new();
        tree.try_visit_children(NodeId::ROOT, |id, node| {
            if let (true, Some(item)) = (node.is_togglable(), node.item()) {
                display.set_label(id, item, &toggle_label(node.is_open, node.descendant_count))?;
                togglable.push(id);
            }
            Ok::<_, anyhow::Error>(false)
        })?;

        debug!("initialised {} toggles", togglable.len());
        Ok(togglable)
    }

    /// Set the open state of `id` and broadcast it to the whole subtree
    ///
    /// With `None` the node's current state is flipped. Every strict
    /// descendant is forced to the same state (whatever it held before)
    /// and shown or hidden accordingly. Returns the state applied.
    ///
    /// The whole subtree is updated before the display hears about it, so
    /// a display fault leaves the tree consistent and only the display
    /// stale.
    pub fn toggle(&mut self, id: NodeId, new_state: Option<bool>) -> Result<bool> {
        let Self { tree, display, .. } = self;
        let display = display.as_mut().ok_or(SessionError::DisplayDetached)?;
        let node = tree.node_mut(id).ok_or(SessionError::UnknownNode(id))?;

        let state = new_state.unwrap_or(!node.is_open);
        node.is_open = state;
        debug!("toggle {} -> {}", id, if state { "open" } else { "closed" });

        tree.visit_children_mut(id, |_, child| {
            child.is_open = state;
            false
        });

        tree.try_visit_children(id, |child_id, child| {
            if let Some(item) = child.item() {
                display.set_visible(child_id, item, state)?;
                if child.is_togglable() {
                    display.set_label(child_id, item, &toggle_label(state, child.descendant_count))?;
                }
            }
            Ok::<_, anyhow::Error>(false)
        })?;

        if let Some(node) = tree.node(id) {
            if let (true, Some(item)) = (node.is_togglable(), node.item()) {
                display.set_label(id, item, &toggle_label(state, node.descendant_count))?;
            }
        }
        Ok(state)
    }

    /// Open every node in the tree
    pub fn expand_all(&mut self) -> Result<()> {
        self.toggle(NodeId::ROOT, Some(true))?;
        Ok(())
    }

    /// Collapse each top-level thread on its own
    ///
    /// The root itself is left open, so the top-level comments stay
    /// visible with their subtrees hidden.
    pub fn collapse_all(&mut self) -> Result<()> {
        let threads = self.tree.top_level().to_vec();
        for thread in threads {
            self.toggle(thread, Some(false))?;
        }
        Ok(())
    }

    /// Publish toggles and apply the initial view
    pub fn activate(&mut self, view: InitialView) -> Result<()> {
        self.init_toggles()?;
        match view {
            InitialView::Collapsed => self.collapse_all(),
            InitialView::Expanded => self.expand_all(),
        }
    }

    /// Highlight `id` and the top-level thread containing it
    ///
    /// Any earlier highlight is cleared from the whole tree first, so
    /// selecting is idempotent and never stacks. The selection is only
    /// recorded once the display has taken every update.
    pub fn select(&mut self, id: NodeId) -> Result<()> {
        if id == NodeId::ROOT {
            return Err(SessionError::RootNotSelectable.into());
        }
        let Self {
            tree,
            display,
            selected,
        } = self;
        let display = display.as_mut().ok_or(SessionError::DisplayDetached)?;
        let item = tree.item(id).ok_or(SessionError::UnknownNode(id))?;

        tree.try_visit_children(NodeId::ROOT, |node_id, node| {
            if let Some(item) = node.item() {
                display.set_highlight(node_id, item, Highlight::None)?;
            }
            Ok::<_, anyhow::Error>(false)
        })?;

        let thread = tree
            .top_level()
            .iter()
            .copied()
            .find(|&top| tree.visit(top, |candidate, _| candidate == id).is_some());

        if let Some(thread) = thread {
            trace!("painting thread {} for selection {}", thread, id);
            tree.try_visit(thread, |node_id, node| {
                if let Some(item) = node.item() {
                    display.set_highlight(node_id, item, Highlight::Context)?;
                }
                Ok::<_, anyhow::Error>(false)
            })?;
        }

        display.set_highlight(id, item, Highlight::Selected)?;
        *selected = Some(id);
        Ok(())
    }

    /// Apply one user event
    pub fn handle(&mut self, event: SessionEvent) -> Result<()> {
        trace!("handling {:?}", event);
        match event {
            SessionEvent::Click(id) => self.select(id),
            SessionEvent::DoubleClick(id) => {
                self.select(id)?;
                self.toggle(id, None)?;
                Ok(())
            }
            SessionEvent::ExpandAll => self.expand_all(),
            SessionEvent::CollapseAll => self.collapse_all(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::MemoryDisplay;
    use crate::tree::build;

    // a(1) -> [b(2) -> [c(3)], d(4)]; e(5)
    fn session() -> Session<&'static str, MemoryDisplay> {
        let tree = build(vec![(0, "a"), (1, "b"), (2, "c"), (1, "d"), (0, "e")]);
        Session::with_display(tree, MemoryDisplay::new())
    }

    fn display<'a>(session: &'a Session<&'static str, MemoryDisplay>) -> &'a MemoryDisplay {
        session.display().unwrap()
    }

    struct FailingDisplay;

    impl<T> ThreadDisplay<T> for FailingDisplay {
        fn set_visible(&mut self, _: NodeId, _: &T, _: bool) -> Result<()> {
            anyhow::bail!("surface gone")
        }

        fn set_highlight(&mut self, _: NodeId, _: &T, _: Highlight) -> Result<()> {
            anyhow::bail!("surface gone")
        }

        fn set_label(&mut self, _: NodeId, _: &T, _: &str) -> Result<()> {
            anyhow::bail!("surface gone")
        }
    }

    /// Accepts the first `budget` visibility changes, then fails
    struct FlakyDisplay {
        budget: usize,
    }

    impl<T> ThreadDisplay<T> for FlakyDisplay {
        fn set_visible(&mut self, _: NodeId, _: &T, _: bool) -> Result<()> {
            if self.budget == 0 {
                anyhow::bail!("surface gone");
            }
            self.budget -= 1;
            Ok(())
        }

        fn set_highlight(&mut self, _: NodeId, _: &T, _: Highlight) -> Result<()> {
            Ok(())
        }

        fn set_label(&mut self, _: NodeId, _: &T, _: &str) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_toggle_flips_and_cascades() {
        let mut session = session();
        assert!(!session.toggle(NodeId(1), None).unwrap());

        for id in [2, 3, 4] {
            assert_eq!(session.is_open(NodeId(id)), Some(false));
            assert!(!display(&session).is_visible(NodeId(id)));
        }
        assert!(display(&session).is_visible(NodeId(1)));
        assert_eq!(display(&session).label(NodeId(1)), Some("expand [3]"));
        assert_eq!(display(&session).label(NodeId(2)), Some("expand [1]"));
        assert_eq!(session.is_open(NodeId(5)), Some(true));

        assert!(session.toggle(NodeId(1), None).unwrap());
        assert_eq!(display(&session).label(NodeId(1)), Some("collapse [3]"));
        assert!(display(&session).is_visible(NodeId(3)));
    }

    #[test]
    fn test_reopening_ancestor_overwrites_nested_state() {
        let mut session = session();
        session.toggle(NodeId(2), Some(false)).unwrap();
        session.toggle(NodeId(1), Some(true)).unwrap();

        assert_eq!(session.is_open(NodeId(2)), Some(true));
        assert!(display(&session).is_visible(NodeId(3)));
        assert!(display(&session).is_visible(NodeId(4)));
    }

    #[test]
    fn test_activate_collapsed() {
        let mut session = session();
        session.activate(InitialView::Collapsed).unwrap();

        assert_eq!(session.is_open(NodeId::ROOT), Some(true));
        assert_eq!(session.is_open(NodeId(1)), Some(false));
        assert!(display(&session).is_visible(NodeId(1)));
        assert!(display(&session).is_visible(NodeId(5)));
        assert!(!display(&session).is_visible(NodeId(2)));
        assert_eq!(display(&session).label(NodeId(5)), None);
    }

    #[test]
    fn test_init_toggles_only_for_parents() {
        let mut session = session();
        let togglable = session.init_toggles().unwrap();
        assert_eq!(togglable, vec![NodeId(1), NodeId(2)]);
        assert_eq!(display(&session).label(NodeId(2)), Some("collapse [1]"));
    }

    #[test]
    fn test_select_marks_thread() {
        let mut session = session();
        session.select(NodeId(3)).unwrap();

        assert_eq!(display(&session).highlighted(Highlight::Selected), vec![NodeId(3)]);
        assert_eq!(
            display(&session).highlighted(Highlight::Context),
            vec![NodeId(1), NodeId(2), NodeId(4)]
        );
        assert_eq!(display(&session).highlight(NodeId(5)), Highlight::None);
        assert_eq!(session.selected(), Some(NodeId(3)));
    }

    #[test]
    fn test_double_click_selects_and_toggles() {
        let mut session = session();
        session.handle(SessionEvent::DoubleClick(NodeId(2))).unwrap();
        assert_eq!(session.selected(), Some(NodeId(2)));
        assert_eq!(session.is_open(NodeId(2)), Some(false));
    }

    #[test]
    fn test_detached_display_fails_fast() {
        let tree = build(vec![(0, "a"), (1, "b")]);
        let mut session: Session<&str, MemoryDisplay> = Session::new(tree);

        let err = session.toggle(NodeId(1), None).unwrap_err();
        assert_eq!(err.downcast_ref::<SessionError>(), Some(&SessionError::DisplayDetached));
        assert_eq!(session.is_open(NodeId(1)), Some(true));

        let err = session.select(NodeId(1)).unwrap_err();
        assert_eq!(err.downcast_ref::<SessionError>(), Some(&SessionError::DisplayDetached));
        assert_eq!(session.selected(), None);

        assert!(session.attach_display(MemoryDisplay::new()).is_none());
        assert!(session.toggle(NodeId(1), None).is_ok());
    }

    #[test]
    fn test_invalid_targets() {
        let mut session = session();
        let err = session.select(NodeId::ROOT).unwrap_err();
        assert_eq!(err.downcast_ref::<SessionError>(), Some(&SessionError::RootNotSelectable));

        let err = session.toggle(NodeId(42), None).unwrap_err();
        assert_eq!(err.downcast_ref::<SessionError>(), Some(&SessionError::UnknownNode(NodeId(42))));
        assert_eq!(err.to_string(), "unknown node NodeId(42)");
    }

    #[test]
    fn test_display_faults_propagate() {
        let tree = build(vec![(0, "a"), (1, "b")]);
        let mut session = Session::with_display(tree, FailingDisplay);
        let err = session.toggle(NodeId(1), Some(false)).unwrap_err();
        assert_eq!(err.to_string(), "surface gone");
        assert!(session.select(NodeId(2)).is_err());
        assert_eq!(session.selected(), None);
    }

    #[test]
    fn test_display_fault_leaves_subtree_consistent() {
        let tree = build(vec![(0, "a"), (1, "b"), (1, "c"), (1, "d")]);
        let mut session = Session::with_display(tree, FlakyDisplay { budget: 1 });

        assert!(session.toggle(NodeId(1), Some(false)).is_err());
        for id in 1..=4 {
            assert_eq!(session.is_open(NodeId(id)), Some(false));
        }
    }
}
