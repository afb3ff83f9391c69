//! Presentation contract between a session and whatever draws the thread

use std::collections::HashMap;

use anyhow::Result;
use derive_more::Display;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::tree::NodeId;

/// Highlight emphasis applied to a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Highlight {
    /// No emphasis
    #[default]
    #[display(fmt = "none")]
    None,

    /// Node belongs to the top-level thread of the current selection
    #[display(fmt = "context")]
    Context,

    /// Node is the current selection
    #[display(fmt = "selected")]
    Selected,
}

/// Display-update hook driven by a [`crate::Session`]
///
/// The session calls these methods whenever logical state changes and
/// never reads anything back. Errors are propagated to the caller of the
/// session operation unchanged.
pub trait ThreadDisplay<T> {
    /// Show or hide the visual element of a node
    fn set_visible(&mut self, id: NodeId, item: &T, visible: bool) -> Result<()>;

    /// Apply a highlight tier to a node
    fn set_highlight(&mut self, id: NodeId, item: &T, highlight: Highlight) -> Result<()>;

    /// Refresh the toggle label of a node that has children
    fn set_label(&mut self, id: NodeId, item: &T, label: &str) -> Result<()>;
}

impl<T, D: ThreadDisplay<T> + ?Sized> ThreadDisplay<T> for Box<D> {
    fn set_visible(&mut self, id: NodeId, item: &T, visible: bool) -> Result<()> {
        (**self).set_visible(id, item, visible)
    }

    fn set_highlight(&mut self, id: NodeId, item: &T, highlight: Highlight) -> Result<()> {
        (**self).set_highlight(id, item, highlight)
    }

    fn set_label(&mut self, id: NodeId, item: &T, label: &str) -> Result<()> {
        (**self).set_label(id, item, label)
    }
}

/// Text of the toggle affordance, e.g. `collapse [12]` or `expand [12]`
pub fn toggle_label(is_open: bool, descendant_count: usize) -> String {
    let prefix = if is_open { "collapse" } else { "expand" };
    format!("{} [{}]", prefix, descendant_count)
}

/// Last state pushed to one node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeView {
    pub visible: bool,
    pub highlight: Highlight,
    pub label: Option<String>,
}

impl Default for NodeView {
    fn default() -> Self {
        Self {
            visible: true,
            highlight: Highlight::None,
            label: None,
        }
    }
}

/// A display that keeps the latest state of every node in memory
///
/// Nodes that were never touched read as visible, unhighlighted and
/// unlabelled.
#[derive(Debug, Clone, Default)]
pub struct MemoryDisplay {
    views: HashMap<NodeId, NodeView>,
}

impl MemoryDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current view of a node
    pub fn view(&self, id: NodeId) -> NodeView {
        self.views.get(&id).cloned().unwrap_or_default()
    }

    pub fn is_visible(&self, id: NodeId) -> bool {
        self.views.get(&id).map(|v| v.visible).unwrap_or(true)
    }

    pub fn highlight(&self, id: NodeId) -> Highlight {
        self.views.get(&id).map(|v| v.highlight).unwrap_or_default()
    }

    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.views.get(&id).and_then(|v| v.label.as_deref())
    }

    /// All nodes currently carrying `highlight`, sorted by ID
    pub fn highlighted(&self, highlight: Highlight) -> Vec<NodeId> {
        let mut ids: Vec<_> = self
            .views
            .iter()
            .filter(|(_, view)| view.highlight == highlight)
            .map(|(&id, _)| id)
            .collect();
        ids.sort();
        ids
    }

    fn entry(&mut self, id: NodeId) -> &mut NodeView {
        self.views.entry(id).or_default()
    }
}

impl<T> ThreadDisplay<T> for MemoryDisplay {
    fn set_visible(&mut self, id: NodeId, _item: &T, visible: bool) -> Result<()> {
        self.entry(id).visible = visible;
        Ok(())
    }

    fn set_highlight(&mut self, id: NodeId, _item: &T, highlight: Highlight) -> Result<()> {
        self.entry(id).highlight = highlight;
        Ok(())
    }

    fn set_label(&mut self, id: NodeId, _item: &T, label: &str) -> Result<()> {
        self.entry(id).label = Some(label.to_string());
        Ok(())
    }
}
