//! Thread Tree Library
//!
//! Rebuilds a comment tree from a flat, pre-order list of items annotated
//! with their nesting depth, and layers collapse/expand and highlight state
//! on top of it. Rendering is left to a [`ThreadDisplay`] implementation
//! supplied by the caller.
//!
//! # Core Concepts
//!
//! - **ThreadTree**: Arena of nodes rebuilt from `(depth, item)` pairs
//! - **TreeTraversal**: Pre-order, short-circuiting visitors over any subtree
//! - **Session**: Owns one tree plus its display hook and applies user actions
//!
//! # Example
//!
//! ```
//! use thread_tree::prelude::*;
//!
//! let tree = build(vec![(0, "a"), (1, "b"), (2, "c"), (1, "d"), (0, "e")]);
//! assert_eq!(tree.top_level().len(), 2);
//!
//! let mut session = Session::with_display(tree, MemoryDisplay::new());
//! session.activate(InitialView::Collapsed)?;
//! session.handle(SessionEvent::ExpandAll)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

mod display;
pub mod session;
pub mod tree;

pub use display::{toggle_label, Highlight, MemoryDisplay, NodeView, ThreadDisplay};
pub use session::{InitialView, Session, SessionError, SessionEvent};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::display::{Highlight, MemoryDisplay, ThreadDisplay};
    pub use crate::session::{InitialView, Session, SessionError, SessionEvent};
    pub use crate::tree::prelude::*;
}
