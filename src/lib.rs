//! tola-reconcile - Tree reconciliation for retained-mode UI trees
//!
//! ## Core Concepts
//!
//! **Two trees**: the host owns a long-lived [`LiveTree`] arena addressed by
//! generational [`NodeId`] handles; every update cycle the caller builds a
//! fresh [`Node`] description of what the tree should look like.
//!
//! **Patches**: [`diff`] compares the two and emits a flat list of
//! [`Patch`]es. Keyed siblings are matched by an LCS over their keys, so a
//! reordered list becomes a handful of moves instead of a rebuild.
//!
//! **Apply**: [`order`] sorts patches into a safe application order and
//! [`apply`] drives them through the host's [`HostOps`] primitives, either
//! immediately or on a later tick via [`Batcher`] and a [`Scheduler`].
//!
//! ## Modules
//! - `node`: Node/Element/Text descriptions
//! - `tree`: the live arena and its host implementation
//! - `algo`: diff, keyed reconciliation, LCS, fingerprints
//! - `patch`: patch operations
//! - `batch`: ordering, batching and deferred scheduling
//! - `apply`: host interface and the patch applier
//! - `render`: markup rendering for debugging and logs
//! - `serialize`: binary patch list encoding
//!
//! ## Usage
//!
//! ```
//! use tola_reconcile::prelude::*;
//!
//! let list = |keys: &[&str]| -> Node {
//!     Element::new("ul")
//!         .children(keys.iter().map(|k| Element::new("li").with_key(*k).text(*k)))
//!         .into()
//! };
//!
//! let mut tree = LiveTree::new();
//! let root = tree.mount(&list(&["a", "b", "c"]));
//!
//! let result = diff(&tree, Some(root), Some(&list(&["c", "a", "b"])));
//! assert_eq!(result.stats.nodes_moved, 1);
//!
//! apply(order(result.patches), &mut tree).unwrap();
//! assert_eq!(tree.snapshot(root), Some(list(&["c", "a", "b"])));
//! ```

// =============================================================================
// Core modules
// =============================================================================

/// Attribute types
pub mod attr;

/// Node descriptions: Element, Node, Text
pub mod node;

/// Generational node handles
pub mod id;

/// Live tree arena
pub mod tree;

/// Patch operations
pub mod patch;

/// Algorithms: diff, keyed reconciliation, LCS, hashing
pub mod algo;

/// Patch ordering and scheduling
pub mod batch;

/// Host interface and patch application
pub mod apply;

/// Markup rendering
pub mod render;

/// Error types
pub mod error;

/// Patch list encoding
#[cfg(feature = "serialize")]
pub mod serialize;

/// Prelude for common imports
pub mod prelude;

// =============================================================================
// Re-exports
// =============================================================================

// Node types
pub use node::{Children, Element, Node, Text};

// Attribute types
pub use attr::{AttrKey, AttrValue, Attrs, AttrsExt, Key, Tag, TextContent};

// Identity
pub use id::NodeId;

// Live tree
pub use tree::{LiveElement, LiveNode, LiveText, LiveTree};

// Patches
pub use patch::{Patch, PatchKind};

// Algorithms
pub use algo::{diff, diff_many, diff_with_config, DiffConfig, DiffResult, DiffStats, StableHasher};

// Batching
pub use batch::{order, BatchConfig, Batcher, PatchBatch, Scheduler, Submission, TickQueue};

// Apply
pub use apply::{apply, reconcile, ApplyStats, HostOps, Insertion};

// Error types
pub use error::{ReconcileError, ReconcileResult, TreeError};

// Re-export rkyv for callers decoding archived patch lists themselves
#[cfg(feature = "serialize")]
pub use rkyv;

// =============================================================================
// Tests
// =============================================================================
