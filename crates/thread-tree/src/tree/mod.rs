//! Core tree abstraction for threaded discussions
//!
//! This module turns a flat, depth-annotated comment list into an
//! arena-backed n-ary tree and provides the pre-order traversal engine
//! used by the session and by presentation code.

mod builder;
mod node;
mod thread;
mod traits;

pub use builder::{build, try_build, validate_depths, BuildError, TreeBuilder};
pub use node::{Depth, Node, NodeId, ROOT_DEPTH};
pub use thread::ThreadTree;
pub use traits::{Tree, TreeTraversal, TreeWalker};

/// Re-export common types for convenience
pub mod prelude {
    pub use super::{
        build, try_build, BuildError, Depth, Node, NodeId, ThreadTree, Tree, TreeBuilder,
        TreeTraversal,
    };
}
