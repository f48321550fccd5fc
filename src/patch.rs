//! Patch operations produced by the diff engine
//!
//! Patches are plain data: handles into the live tree plus owned values.
//! Inserted and replacement subtrees are cloned out of the new description,
//! so a patch list outlives the tree it was computed from.

use std::fmt;

use crate::attr::{AttrKey, AttrValue, TextContent};
use crate::id::NodeId;
use crate::node::Node;
use crate::render::render_node;

// =============================================================================
// Patch
// =============================================================================

/// A single mutation that moves the live tree toward the new snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch {
    /// Set text content of `target`
    ///
    /// On a text node this rewrites its content; on an element it replaces
    /// all children with a single text node.
    Text { target: NodeId, content: TextContent },

    /// Set or overwrite an attribute
    Attribute {
        target: NodeId,
        name: AttrKey,
        value: AttrValue,
    },

    /// Remove an attribute
    RemoveAttribute { target: NodeId, name: AttrKey },

    /// Swap `target` for a freshly built subtree in its parent
    Replace { target: NodeId, node: Node },

    /// Insert a freshly built subtree as a child of `parent` at `index`
    Add {
        parent: NodeId,
        node: Node,
        index: usize,
    },

    /// Detach `target` from its parent and drop it
    Remove { target: NodeId },

    /// Relocate an existing node
    ///
    /// `index` is the position in `parent`'s child list once `target` has
    /// been detached, at the moment the move is applied.
    Move {
        target: NodeId,
        parent: NodeId,
        index: usize,
    },
}

/// Operation class, in application order
///
/// Removals vacate positions before moves and inserts claim them; structural
/// replacement runs before leaf-level touch-ups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PatchKind {
    Remove,
    Move,
    Add,
    Replace,
    Attribute,
    Text,
}

impl PatchKind {
    /// Short lowercase name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Remove => "remove",
            Self::Move => "move",
            Self::Add => "add",
            Self::Replace => "replace",
            Self::Attribute => "attribute",
            Self::Text => "text",
        }
    }
}

impl Patch {
    /// Operation class used for ordering
    pub fn kind(&self) -> PatchKind {
        match self {
            Self::Remove { .. } => PatchKind::Remove,
            Self::Move { .. } => PatchKind::Move,
            Self::Add { .. } => PatchKind::Add,
            Self::Replace { .. } => PatchKind::Replace,
            Self::Attribute { .. } | Self::RemoveAttribute { .. } => PatchKind::Attribute,
            Self::Text { .. } => PatchKind::Text,
        }
    }

    /// Primary node this patch touches (the parent for `Add`)
    pub fn target(&self) -> NodeId {
        match self {
            Self::Text { target, .. } => *target,
            Self::Attribute { target, .. } => *target,
            Self::RemoveAttribute { target, .. } => *target,
            Self::Replace { target, .. } => *target,
            Self::Add { parent, .. } => *parent,
            Self::Remove { target } => *target,
            Self::Move { target, .. } => *target,
        }
    }

    /// Whether this patch changes the shape of a child list
    pub fn is_structural(&self) -> bool {
        matches!(
            self.kind(),
            PatchKind::Remove | PatchKind::Move | PatchKind::Add | PatchKind::Replace
        )
    }
}

impl fmt::Display for Patch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text { target, content } => write!(f, "text {target} = {content:?}"),
            Self::Attribute {
                target,
                name,
                value,
            } => write!(f, "attr {target} {name}={value:?}"),
            Self::RemoveAttribute { target, name } => write!(f, "attr {target} -{name}"),
            Self::Replace { target, node } => write!(f, "replace {target} with {}", render_node(node)),
            Self::Add {
                parent,
                node,
                index,
            } => write!(f, "add {} to {parent} at {index}", render_node(node)),
            Self::Remove { target } => write!(f, "remove {target}"),
            Self::Move {
                target,
                parent,
                index,
            } => write!(f, "move {target} to {parent} at {index}"),
        }
    }
}
